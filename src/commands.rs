//! CLI command implementations

use std::path::{Path, PathBuf};

use anyhow::Context;
use tendril_indexer::{Analysis, Coordinator, TendrilConfig};

fn load_config(root: &Path, config: Option<PathBuf>) -> anyhow::Result<TendrilConfig> {
    TendrilConfig::load(root, config.as_deref()).context("invalid configuration")
}

/// Run the analysis on a blocking worker; extraction fans out over rayon.
async fn run(root: PathBuf, config: TendrilConfig, force: bool) -> anyhow::Result<Analysis> {
    tokio::task::spawn_blocking(move || Coordinator::new(root, config).with_force(force).analyze())
        .await
        .context("analysis task panicked")?
}

fn relative<'a>(root: &Path, path: &'a Path) -> std::borrow::Cow<'a, str> {
    path.strip_prefix(root).unwrap_or(path).to_string_lossy()
}

pub async fn analyze(
    root: PathBuf,
    config: Option<PathBuf>,
    force: bool,
    json: bool,
) -> anyhow::Result<()> {
    tracing::info!("Analyzing repository: {}", root.display());
    let config = load_config(&root, config)?;
    let analysis = run(root, config, force).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(analysis.entities())?);
    } else {
        let stats = analysis.stats();
        for report in analysis.to_regenerate() {
            println!(
                "{}:{}  {}  ({} usages)",
                relative(analysis.root(), &report.key.file),
                report.line,
                report.signature,
                report.usages.len()
            );
        }
        println!(
            "{} files, {} entities, {} to regenerate, {} usage references",
            stats.files_indexed, stats.entities, stats.to_regenerate, stats.usage_references
        );
        for failure in analysis.failures() {
            println!("skipped {}: {}", relative(analysis.root(), &failure.path), failure.reason);
        }
    }

    let summary = analysis.persist();
    if summary.saved {
        tracing::info!(
            "Cache saved to {} ({} entries)",
            summary.cache_path.display(),
            summary.entries
        );
    }
    Ok(())
}

/// Print usage locations of every entity named `name`. Like `analyze`, the
/// run ends by persisting the cache.
pub async fn usages(root: PathBuf, config: Option<PathBuf>, name: String) -> anyhow::Result<()> {
    let config = load_config(&root, config)?;
    let analysis = run(root, config, false).await?;

    let matches: Vec<_> = analysis
        .entities()
        .iter()
        .filter(|r| r.key.name == name)
        .collect();
    if matches.is_empty() {
        println!("No exported entity named {}", name);
    }
    for report in matches {
        println!(
            "{} ({}:{})",
            report.signature,
            relative(analysis.root(), &report.key.file),
            report.line
        );
        for usage in &report.usages {
            println!("  {}:{}", relative(analysis.root(), &usage.file), usage.line);
        }
    }

    analysis.persist();
    Ok(())
}

pub fn clear(root: PathBuf, config: Option<PathBuf>) -> anyhow::Result<()> {
    tracing::info!("Clearing cache for: {}", root.display());

    let config = load_config(&root, config)?;
    let dir = config.cache_dir(&root);
    tendril_core::clear_cache(&dir).with_context(|| format!("failed to remove {}", dir.display()))?;

    tracing::info!("Cache cleared");
    Ok(())
}
