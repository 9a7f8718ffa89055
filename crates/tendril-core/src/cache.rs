//! Persisted change-detection cache
//!
//! Maps entity keys to the hash pair seen on the last run, plus whatever
//! enrichment a downstream collaborator attached. Loaded once at the start
//! of a run, updated in memory for every entity the run processes, and
//! written back once at the end.
//!
//! There is no locking: two runs sharing a cache location race and the last
//! writer wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::model::HashPair;

/// Cache directory: .tendril/
pub const CACHE_DIR: &str = ".tendril";

/// Cache file inside [`CACHE_DIR`]
pub const CACHE_FILE: &str = "analysis-cache.json";

/// Bumped whenever the on-disk schema or the hashing scheme changes.
pub const CACHE_FORMAT_VERSION: &str = "1";

/// Get cache directory path
pub fn cache_dir(root: &Path) -> PathBuf {
    root.join(CACHE_DIR)
}

/// Get cache file path
pub fn cache_path(root: &Path) -> PathBuf {
    cache_dir(root).join(CACHE_FILE)
}

/// Remove a cache directory and everything in it
pub fn clear_cache(dir: &Path) -> std::io::Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)?;
    }
    Ok(())
}

/// Last-seen state of one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheRecord {
    pub implementation_hash: String,
    pub interface_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_enhanced: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<serde_json::Value>,
}

impl CacheRecord {
    pub fn hashes(&self) -> HashPair {
        HashPair::new(self.implementation_hash.clone(), self.interface_hash.clone())
    }
}

/// Similarity of two digests. Hash comparison is all-or-nothing, so this is
/// 1.0 for equal digests and 0.0 otherwise; any threshold in (0, 1] therefore
/// means "regenerate on any change", and 0 means "only new entities".
pub fn hash_similarity(a: &str, b: &str) -> f64 {
    if a == b { 1.0 } else { 0.0 }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisCache {
    format_version: String,
    #[serde(default)]
    last_generated: Option<DateTime<Utc>>,
    #[serde(default)]
    entries: BTreeMap<String, CacheRecord>,
}

impl Default for AnalysisCache {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisCache {
    /// An empty cache at the current format version.
    pub fn new() -> Self {
        AnalysisCache {
            format_version: CACHE_FORMAT_VERSION.to_string(),
            last_generated: None,
            entries: BTreeMap::new(),
        }
    }

    /// Load the cache at `path`.
    ///
    /// A missing file yields an empty cache silently. An unreadable, corrupt
    /// or version-mismatched file yields an empty cache and a warning; no
    /// migration is attempted.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(Some(cache)) => {
                tracing::debug!(
                    "Loaded {} cache entries from {}",
                    cache.entries.len(),
                    path.display()
                );
                cache
            }
            Ok(None) => {
                tracing::debug!("No cache at {}, starting fresh", path.display());
                Self::new()
            }
            Err(e) => {
                tracing::warn!("{}; treating every entity as new", e);
                Self::new()
            }
        }
    }

    /// Like [`load`](Self::load) but reports why a present file was rejected.
    pub fn try_load(path: &Path) -> Result<Option<Self>, CacheError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CacheError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let parse_err = |source| CacheError::Parse {
            path: path.to_path_buf(),
            source,
        };
        let value: serde_json::Value = serde_json::from_str(&raw).map_err(parse_err)?;

        // Check the version before trusting the rest of the layout.
        let found = value
            .get("formatVersion")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("<missing>");
        if found != CACHE_FORMAT_VERSION {
            return Err(CacheError::VersionMismatch {
                path: path.to_path_buf(),
                expected: CACHE_FORMAT_VERSION.to_string(),
                found: found.to_string(),
            });
        }

        serde_json::from_value(value).map(Some).map_err(parse_err)
    }

    /// Whether `key` must be reprocessed given its freshly computed hashes.
    pub fn needs_regeneration(&self, key: &str, hashes: &HashPair, threshold: f64) -> bool {
        let Some(record) = self.entries.get(key) else {
            return true;
        };
        hash_similarity(&record.implementation_hash, &hashes.implementation_hash) < threshold
            || hash_similarity(&record.interface_hash, &hashes.interface_hash) < threshold
    }

    /// Record the hashes seen for `key` this run. Supplying `enrichment`
    /// replaces the stored payload and stamps it; otherwise any earlier
    /// enrichment is kept.
    pub fn update(&mut self, key: &str, hashes: HashPair, enrichment: Option<serde_json::Value>) {
        let record = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| CacheRecord {
                implementation_hash: String::new(),
                interface_hash: String::new(),
                last_enhanced: None,
                enrichment: None,
            });
        record.implementation_hash = hashes.implementation_hash;
        record.interface_hash = hashes.interface_hash;
        if let Some(payload) = enrichment {
            record.enrichment = Some(payload);
            record.last_enhanced = Some(Utc::now());
        }
    }

    /// Write the whole cache to `path`, refreshing the generation stamp.
    ///
    /// The data goes to a sibling temporary file first and is renamed into
    /// place, so an interrupted write leaves the previous cache intact.
    pub fn save(&mut self, path: &Path) -> Result<(), CacheError> {
        self.last_generated = Some(Utc::now());

        let io_err = |source| CacheError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, path).map_err(io_err)?;

        tracing::debug!("Cache saved: {} entries to {}", self.entries.len(), path.display());
        Ok(())
    }

    pub fn record(&self, key: &str) -> Option<&CacheRecord> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn format_version(&self) -> &str {
        &self.format_version
    }

    pub fn last_generated(&self) -> Option<DateTime<Utc>> {
        self.last_generated
    }
}
