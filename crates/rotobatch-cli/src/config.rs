//! Optional JSON configuration with defaults for the `rotate` command.
//!
//! Lookup order:
//! 1. `--config <path>` (or `ROTOBATCH_CONFIG`), which must exist
//! 2. `config.json` in the platform config directory, if present
//! 3. Built-in defaults
//!
//! ```json
//! {
//!   "angles": [90, 180, 270],
//!   "background": "#ffffff",
//!   "filter": "bilinear",
//!   "jpeg_quality": 90,
//!   "keep_going": true
//! }
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rotobatch_core::{ErrorPolicy, InterpolationFilter, JobOptions, DEFAULT_JPEG_QUALITY};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Values from the config file; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub angles: Option<Vec<i32>>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub filter: Option<InterpolationFilter>,
    #[serde(default)]
    pub jpeg_quality: Option<u8>,
    #[serde(default)]
    pub keep_going: Option<bool>,
}

impl AppConfig {
    /// Load from `explicit` if given, else from the default location.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }

        match default_config_path() {
            Some(path) if path.is_file() => Self::load_from_path(&path),
            _ => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Angles as the comma-separated text the form field holds.
    pub fn angles_text(&self) -> Option<String> {
        self.angles.as_ref().map(|angles| {
            angles
                .iter()
                .map(i32::to_string)
                .collect::<Vec<_>>()
                .join(",")
        })
    }

    /// Job options after applying command-line overrides.
    pub fn job_options(
        &self,
        filter: Option<InterpolationFilter>,
        jpeg_quality: Option<u8>,
        keep_going: bool,
    ) -> JobOptions {
        let keep_going = keep_going || self.keep_going.unwrap_or(false);
        JobOptions {
            filter: filter.or(self.filter).unwrap_or_default(),
            jpeg_quality: jpeg_quality
                .or(self.jpeg_quality)
                .unwrap_or(DEFAULT_JPEG_QUALITY),
            error_policy: if keep_going {
                ErrorPolicy::ContinueOnError
            } else {
                ErrorPolicy::FailFast
            },
        }
    }
}

/// `config.json` in the platform config directory for rotobatch.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rotobatch").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
