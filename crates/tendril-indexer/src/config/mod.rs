//! Run configuration loaded from `tendril.toml`

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use tendril_core::{BarrelMatcher, CACHE_DIR};

/// File name looked up at the analysed root.
pub const CONFIG_FILE: &str = "tendril.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("similarity_threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),
    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        source: globset::Error,
    },
}

/// Analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TendrilConfig {
    /// Files considered for analysis, relative to the root
    pub include: Vec<String>,
    /// Files skipped even when included
    pub exclude: Vec<String>,
    /// Re-export-only files that never count as usages
    pub barrel_patterns: Vec<String>,
    /// Hash similarity below which an entity is regenerated
    pub similarity_threshold: f64,
    /// Cache directory, relative to the root unless absolute
    pub cache_dir: PathBuf,
}

impl Default for TendrilConfig {
    fn default() -> Self {
        Self {
            include: strings(&[
                "**/*.ts", "**/*.tsx", "**/*.js", "**/*.jsx", "**/*.mts", "**/*.cts", "**/*.mjs",
                "**/*.cjs",
            ]),
            exclude: strings(&[
                "**/node_modules/**",
                "**/dist/**",
                "**/build/**",
                "**/*.d.ts",
            ]),
            barrel_patterns: strings(&[
                "**/index.ts",
                "**/index.tsx",
                "**/index.js",
                "**/index.jsx",
            ]),
            similarity_threshold: 0.85,
            cache_dir: PathBuf::from(CACHE_DIR),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl TendrilConfig {
    /// Load `explicit` when given, otherwise `<root>/tendril.toml` if it
    /// exists, otherwise the defaults.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = root.join(CONFIG_FILE);
                if !path.is_file() {
                    tracing::debug!("No {} under {}, using defaults", CONFIG_FILE, root.display());
                    return Ok(Self::default());
                }
                path
            }
        };
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        tracing::debug!("Loading configuration from {}", path.display());
        Self::from_toml(&content)
    }

    /// Parse and validate a configuration document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.similarity_threshold;
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        glob_set(&self.include)?;
        glob_set(&self.exclude)?;
        glob_set(&self.barrel_patterns)?;
        Ok(())
    }

    pub fn include_set(&self) -> Result<GlobSet, ConfigError> {
        glob_set(&self.include)
    }

    pub fn exclude_set(&self) -> Result<GlobSet, ConfigError> {
        glob_set(&self.exclude)
    }

    pub fn barrel_matcher(&self, root: &Path) -> Result<BarrelMatcher, ConfigError> {
        BarrelMatcher::new(&self.barrel_patterns, Some(root)).map_err(|source| {
            ConfigError::InvalidGlob {
                pattern: self.barrel_patterns.join(", "),
                source,
            }
        })
    }

    pub fn cache_dir(&self, root: &Path) -> PathBuf {
        if self.cache_dir.is_absolute() {
            self.cache_dir.clone()
        } else {
            root.join(&self.cache_dir)
        }
    }

    pub fn cache_path(&self, root: &Path) -> PathBuf {
        self.cache_dir(root).join(tendril_core::CACHE_FILE)
    }
}

fn glob_set(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ConfigError::InvalidGlob {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ConfigError::InvalidGlob {
        pattern: patterns.join(", "),
        source,
    })
}
