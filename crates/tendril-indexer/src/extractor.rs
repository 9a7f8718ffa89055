//! Language extractor trait definition

use std::path::{Path, PathBuf};

use tendril_core::{CatalogEntry, SourceFile};

use crate::parser::ParseError;

/// Everything one file contributes to a run: its file-set view and the
/// catalog entries for its exported declarations.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub source: SourceFile,
    pub entities: Vec<CatalogEntry>,
}

/// Why a file was left out of the run.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} is not valid UTF-8")]
    NotUtf8 { path: PathBuf },
    #[error("no extractor for {path}")]
    Unsupported { path: PathBuf },
    #[error("cannot parse {path}: {source}")]
    Parse { path: PathBuf, source: ParseError },
}

pub trait LanguageExtractor: Send + Sync {
    fn extract(&self, path: &Path, content: &str) -> Result<ExtractionResult, IndexError>;
}
