//! Source file discovery

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use ignore::WalkBuilder;

use crate::config::TendrilConfig;

/// Walk `root` honouring `.gitignore` and return the canonical paths of
/// every included, non-excluded file in sorted order.
pub fn discover(root: &Path, config: &TendrilConfig) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }
    let root = root
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", root.display()))?;
    let include = config.include_set()?;
    let exclude = config.exclude_set()?;

    let mut builder = WalkBuilder::new(&root);
    builder
        .git_ignore(true)
        .git_exclude(true)
        .require_git(false)
        .parents(true)
        .follow_links(false);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("Skipping unreadable entry: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(&root) else {
            continue;
        };
        if !include.is_match(relative) || exclude.is_match(relative) {
            continue;
        }
        match entry.path().canonicalize() {
            Ok(path) => files.push(path),
            Err(err) => tracing::warn!("Skipping {}: {}", entry.path().display(), err),
        }
    }

    files.sort();
    files.dedup();
    tracing::debug!("Discovered {} source files under {}", files.len(), root.display());
    Ok(files)
}
