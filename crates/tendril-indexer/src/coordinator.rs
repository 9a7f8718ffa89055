//! Orchestrates a full analysis run
//!
//! Files are extracted in parallel; each worker reduces its syntax tree to
//! owned catalog entries before handing them back, so everything after the
//! extraction step works on plain data.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use tendril_core::{AnalysisCache, CatalogEntry, EntityKey, EntityReport, FileSet, UsageIndex};

use crate::config::TendrilConfig;
use crate::discovery::discover;
use crate::languages::extract_file;

/// A file left out of the run, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisStats {
    pub files_discovered: usize,
    pub files_indexed: usize,
    pub files_failed: usize,
    pub entities: usize,
    pub to_regenerate: usize,
    pub usage_references: usize,
}

/// Outcome of [`Analysis::persist`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub cache_path: PathBuf,
    pub entries: usize,
    pub saved: bool,
}

pub struct Coordinator {
    root: PathBuf,
    config: TendrilConfig,
    force: bool,
}

impl Coordinator {
    pub fn new(root: impl Into<PathBuf>, config: TendrilConfig) -> Self {
        Self {
            root: root.into(),
            config,
            force: false,
        }
    }

    /// Mark every entity for regeneration regardless of the cache.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn analyze(&self) -> Result<Analysis> {
        self.config.validate()?;
        let root = self
            .root
            .canonicalize()
            .with_context(|| format!("failed to resolve root {}", self.root.display()))?;

        let files = discover(&root, &self.config)?;
        tracing::info!("Analyzing {} files under {}", files.len(), root.display());

        let extracted: Vec<_> = files.par_iter().map(|path| (path, extract_file(path))).collect();

        let mut file_set = FileSet::new();
        let mut catalog: Vec<CatalogEntry> = Vec::new();
        let mut failures = Vec::new();
        for (path, result) in extracted {
            match result {
                Ok(result) => {
                    file_set.insert(result.source);
                    catalog.extend(result.entities);
                }
                Err(err) => {
                    tracing::warn!("Skipping {}: {}", path.display(), err);
                    failures.push(FileFailure {
                        path: path.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let barrels = self.config.barrel_matcher(&root)?;
        let index = UsageIndex::build(&file_set, &barrels);
        tracing::debug!(
            "Usage index: {} entities, {} references",
            index.len(),
            index.reference_count()
        );

        catalog.sort_by(|a, b| {
            a.key
                .file
                .cmp(&b.key.file)
                .then(a.line.cmp(&b.line))
                .then_with(|| a.key.name.cmp(&b.key.name))
        });
        let mut seen = HashSet::new();
        catalog.retain(|entry| seen.insert(entry.key.clone()));

        let cache_path = self.config.cache_path(&root);
        let mut cache = AnalysisCache::load(&cache_path);
        let threshold = self.config.similarity_threshold;

        let reports: Vec<EntityReport> = catalog
            .into_iter()
            .map(|entry| {
                let cache_key = entry.key.cache_key(&root);
                let needs_regeneration =
                    self.force || cache.needs_regeneration(&cache_key, &entry.hashes, threshold);
                cache.update(&cache_key, entry.hashes.clone(), None);
                EntityReport {
                    usages: index.usages(&entry.key).to_vec(),
                    key: entry.key,
                    kind: entry.kind,
                    line: entry.line,
                    signature: entry.signature,
                    hashes: entry.hashes,
                    needs_regeneration,
                }
            })
            .collect();

        let stats = AnalysisStats {
            files_discovered: files.len(),
            files_indexed: file_set.len(),
            files_failed: failures.len(),
            entities: reports.len(),
            to_regenerate: reports.iter().filter(|r| r.needs_regeneration).count(),
            usage_references: index.reference_count(),
        };
        tracing::info!(
            "Analysis complete: {} entities, {} to regenerate, {} files failed",
            stats.entities,
            stats.to_regenerate,
            stats.files_failed
        );

        Ok(Analysis {
            root,
            cache_path,
            cache,
            reports,
            failures,
            stats,
        })
    }
}

/// Result of one run, holding the updated in-memory cache until persisted.
pub struct Analysis {
    root: PathBuf,
    cache_path: PathBuf,
    cache: AnalysisCache,
    reports: Vec<EntityReport>,
    failures: Vec<FileFailure>,
    stats: AnalysisStats,
}

impl Analysis {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    pub fn cache(&self) -> &AnalysisCache {
        &self.cache
    }

    /// Every entity in (file, line, name) order.
    pub fn entities(&self) -> &[EntityReport] {
        &self.reports
    }

    pub fn to_regenerate(&self) -> impl Iterator<Item = &EntityReport> {
        self.reports.iter().filter(|r| r.needs_regeneration)
    }

    pub fn find(&self, key: &EntityKey) -> Option<&EntityReport> {
        self.reports.iter().find(|r| &r.key == key)
    }

    pub fn failures(&self) -> &[FileFailure] {
        &self.failures
    }

    pub fn stats(&self) -> AnalysisStats {
        self.stats
    }

    /// Attach an enrichment payload to an entity seen in this run.
    /// Returns false for unknown entities.
    pub fn enrich(&mut self, key: &EntityKey, payload: serde_json::Value) -> bool {
        let Some(report) = self.reports.iter().find(|r| &r.key == key) else {
            return false;
        };
        let cache_key = key.cache_key(&self.root);
        self.cache.update(&cache_key, report.hashes.clone(), Some(payload));
        true
    }

    /// Write the cache once. A failed write is logged, not returned: the
    /// analysis itself is still valid.
    pub fn persist(mut self) -> RunSummary {
        let saved = match self.cache.save(&self.cache_path) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("Failed to save cache: {}", err);
                false
            }
        };
        RunSummary {
            cache_path: self.cache_path,
            entries: self.cache.len(),
            saved,
        }
    }
}
