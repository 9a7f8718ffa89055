//! File parsing, entity extraction and run orchestration

pub mod config;
pub mod coordinator;
pub mod discovery;
pub mod extractor;
pub mod languages;
pub mod node;
pub mod parser;
pub mod signature;


pub use config::{CONFIG_FILE, ConfigError, TendrilConfig};
pub use coordinator::{Analysis, AnalysisStats, Coordinator, FileFailure, RunSummary};
pub use discovery::discover;
pub use extractor::{ExtractionResult, IndexError, LanguageExtractor};
pub use languages::{extract_file, get_extractor};
pub use parser::FileType;
