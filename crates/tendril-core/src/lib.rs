//! Tendril core: usage index, content hashing and change-detection cache

pub mod cache;
pub mod error;
pub mod hasher;
pub mod model;
pub mod resolver;
pub mod syntax;
pub mod usage;

#[cfg(test)]
pub mod tests;

#[cfg(test)]
pub mod test_utils;

pub use cache::{
    AnalysisCache, CACHE_DIR, CACHE_FILE, CACHE_FORMAT_VERSION, CacheRecord, cache_dir, cache_path,
    clear_cache,
};
pub use error::CacheError;
pub use hasher::{hash_pair, implementation_hash, interface_hash};
pub use model::{
    CatalogEntry, EntityKey, EntityKind, EntityReport, FileId, FileSet, HashPair, ImportBinding,
    ImportStatement, ImportedName, Occurrence, SourceFile, UsageReference,
};
pub use resolver::ImportResolver;
pub use syntax::SyntaxNode;
pub use usage::{BarrelMatcher, UsageIndex};
