//! Cross-file reverse index from exported declarations to their usages
//!
//! The index is built once per run: every file's imports are resolved and
//! its identifier stream is scanned a single time, in parallel, and the
//! per-file contributions are folded together afterwards. Looking up the
//! usages of an entity is then a hash lookup instead of a rescan of the
//! whole tree.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use rayon::prelude::*;

use crate::model::{EntityKey, FileId, FileSet, ImportedName, SourceFile, UsageReference};
use crate::resolver::ImportResolver;

/// Recognises barrel files, whose only job is re-exporting.
#[derive(Debug, Clone)]
pub struct BarrelMatcher {
    set: GlobSet,
    root: Option<PathBuf>,
}

impl BarrelMatcher {
    /// Compile `patterns`. Paths under `root` are matched relative to it;
    /// anything else is matched as given.
    pub fn new<S: AsRef<str>>(patterns: &[S], root: Option<&Path>) -> Result<Self, globset::Error> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern.as_ref())?);
        }
        Ok(Self {
            set: builder.build()?,
            root: root.map(Path::to_path_buf),
        })
    }

    /// A matcher that treats no file as a barrel.
    pub fn empty() -> Self {
        Self {
            set: GlobSet::empty(),
            root: None,
        }
    }

    pub fn is_barrel(&self, path: &Path) -> bool {
        let relative = self
            .root
            .as_deref()
            .and_then(|root| path.strip_prefix(root).ok())
            .unwrap_or(path);
        self.set.is_match(relative) || self.set.is_match(path)
    }
}

/// Immutable reverse index: entity key to ordered usage locations.
#[derive(Debug, Default, Clone)]
pub struct UsageIndex {
    usages: HashMap<EntityKey, Vec<UsageReference>>,
}

/// Usage references one file contributes, before merging.
type Contribution = Vec<(EntityKey, UsageReference)>;

impl UsageIndex {
    /// Scan every non-barrel file of `files` and build the index.
    pub fn build(files: &FileSet, barrels: &BarrelMatcher) -> Self {
        let resolver = ImportResolver::new(files);

        let contributions: Vec<Contribution> = files
            .as_slice()
            .par_iter()
            .enumerate()
            .filter(|(_, file)| {
                let barrel = barrels.is_barrel(&file.path);
                if barrel {
                    tracing::debug!("Skipping barrel file {}", file.path.display());
                }
                !barrel
            })
            .map(|(i, file)| scan_file(FileId(i as u32), file, files, &resolver))
            .collect();

        let mut merged: HashMap<EntityKey, BTreeSet<UsageReference>> = HashMap::new();
        for (key, reference) in contributions.into_iter().flatten() {
            merged.entry(key).or_default().insert(reference);
        }

        let usages: HashMap<_, _> = merged
            .into_iter()
            .map(|(key, refs)| (key, refs.into_iter().collect()))
            .collect();

        tracing::debug!("Usage index built: {} referenced entities", usages.len());
        UsageIndex { usages }
    }

    /// Usages of `key`, ordered by file then line. Empty when unreferenced.
    pub fn usages(&self, key: &EntityKey) -> &[UsageReference] {
        self.usages.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn keys(&self) -> impl Iterator<Item = &EntityKey> {
        self.usages.keys()
    }

    /// Number of entities with at least one usage.
    pub fn len(&self) -> usize {
        self.usages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.usages.is_empty()
    }

    /// Total number of usage references across all entities.
    pub fn reference_count(&self) -> usize {
        self.usages.values().map(Vec::len).sum()
    }
}

/// Emit the references of a single file. Runs once per file with no shared
/// mutable state.
fn scan_file(
    id: FileId,
    file: &SourceFile,
    files: &FileSet,
    resolver: &ImportResolver<'_>,
) -> Contribution {
    // local name -> every (definition file, exported name) it stands for
    let mut bound: HashMap<&str, Vec<EntityKey>> = HashMap::new();

    for import in &file.imports {
        let Some(target_id) = resolver.resolve(&import.specifier, &file.path) else {
            continue;
        };
        if target_id == id {
            continue;
        }
        let Some(target) = files.get(target_id) else {
            continue;
        };

        for binding in &import.bindings {
            let name = match &binding.imported {
                ImportedName::Named(name) => name.clone(),
                ImportedName::Default => target
                    .default_export
                    .clone()
                    .unwrap_or_else(|| binding.local.clone()),
            };
            bound
                .entry(binding.local.as_str())
                .or_default()
                .push(EntityKey::new(target.path.clone(), name));
        }
    }

    if bound.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    for occurrence in file.occurrences.iter().filter(|o| !o.in_import) {
        if let Some(keys) = bound.get(occurrence.text.as_str()) {
            for key in keys {
                out.push((
                    key.clone(),
                    UsageReference::new(file.path.clone(), occurrence.line),
                ));
            }
        }
    }
    out
}
