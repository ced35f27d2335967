use pcdview_filters::DEFAULT_MAX_POINTS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What the loader returns when decoding fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Hand the error to the caller.
    #[default]
    Propagate,
    /// Substitute [`PointCloud::placeholder`](pcdview_core::PointCloud::placeholder)
    /// and keep the error alongside it.
    Placeholder,
}

/// Loader configuration.
///
/// Deserializes from JSON; omitted keys take their defaults and
/// `"max_points": null` disables downsampling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadOptions {
    pub max_points: Option<usize>,
    pub fallback: FallbackPolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_points: Some(DEFAULT_MAX_POINTS),
            fallback: FallbackPolicy::Propagate,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("max_points must be greater than 0")]
    ZeroMaxPoints,
}

impl LoadOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_points == Some(0) {
            return Err(ConfigError::ZeroMaxPoints);
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let options: LoadOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}
