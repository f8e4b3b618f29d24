//! TOML configuration for the CLI.
//!
//! The file lives at `<config_dir>/lexigraph/config.toml` unless a path is
//! given with `--config` or `LEXIGRAPH_CONFIG`. A missing file means
//! defaults.

use lexigraph::core::{Error, Result};
use lexigraph::ServiceConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project name used for the config directory.
pub const PROJECT_NAME: &str = "lexigraph";

/// Everything `lexigraph` reads from its config file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LexigraphConfig {
    /// Default log filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(flatten)]
    pub service: ServiceConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LexigraphConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            service: ServiceConfig::default(),
        }
    }
}

impl LexigraphConfig {
    /// `<config_dir>/lexigraph/config.toml`, if the platform has a config
    /// directory.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(PROJECT_NAME).join("config.toml"))
    }

    /// The explicit path if given, else the default one.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(PathBuf::from(path)),
            None => Self::default_config_path(),
        }
    }

    /// Loads the resolved config file, falling back to defaults when it does
    /// not exist.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let Some(path) = Self::resolve_config_path(explicit) else {
            log::debug!("no config directory on this platform; using defaults");
            return Ok(Self::default());
        };
        if !path.exists() {
            log::debug!("config file {} not found; using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }
}
