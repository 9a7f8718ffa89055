//! Error types for cache persistence

use std::path::PathBuf;

/// Failures while reading or writing the change-detection cache.
///
/// Loading never surfaces these to callers: any of them resets the cache to
/// empty. Saving returns them so the orchestrator can log and carry on.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse cache file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("cache format version mismatch in {path}: expected {expected}, found {found}")]
    VersionMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    #[error("failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),
}
