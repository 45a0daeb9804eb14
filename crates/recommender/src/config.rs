//! Recommender configuration.
//!
//! Defaults, optionally patched by a TOML file in which every key is
//! optional:
//!
//! ```toml
//! data_dir = "data/demo"
//! default_limit = 6
//! listing_limit = 50
//! similar_limit = 4
//! seed = 42
//! log_level = "info,engine=debug"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

/// Caller-side policies around the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommenderConfig {
    /// Snapshot directory loaded into the catalog store
    pub data_dir: PathBuf,
    /// Limit used when the caller doesn't ask for one
    pub default_limit: usize,
    /// Limit for the full recommended listing page
    pub listing_limit: usize,
    /// Limit for "similar products" on a product page
    pub similar_limit: usize,
    /// Fixed seed for the scoring noise; `None` draws fresh noise per request
    pub seed: Option<u64>,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/demo"),
            default_limit: 6,
            listing_limit: 50,
            similar_limit: 4,
            seed: None,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPatch {
    data_dir: Option<PathBuf>,
    default_limit: Option<usize>,
    listing_limit: Option<usize>,
    similar_limit: Option<usize>,
    seed: Option<u64>,
    log_level: Option<String>,
}

impl RecommenderConfig {
    /// Defaults, patched by `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = path {
            let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;
            let patch: ConfigPatch =
                toml::from_str(&content).map_err(|source| ConfigError::ParseFile {
                    path: path.to_path_buf(),
                    source,
                })?;
            config.apply_patch(patch);
        }
        config.validate()?;
        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(data_dir) = patch.data_dir {
            self.data_dir = data_dir;
        }
        if let Some(default_limit) = patch.default_limit {
            self.default_limit = default_limit;
        }
        if let Some(listing_limit) = patch.listing_limit {
            self.listing_limit = listing_limit;
        }
        if let Some(similar_limit) = patch.similar_limit {
            self.similar_limit = similar_limit;
        }
        if patch.seed.is_some() {
            self.seed = patch.seed;
        }
        if let Some(log_level) = patch.log_level {
            self.log_level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_limit == 0 {
            return Err(ConfigError::Validation(
                "default_limit must be at least 1".to_string(),
            ));
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Validation(
                "log_level must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
