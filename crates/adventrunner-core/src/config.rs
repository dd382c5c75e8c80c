//! TOML-based client configuration.
//!
//! Stores the settings the sync layer needs to reach the AdventRunner
//! backend. Configuration is stored at `~/.config/adventrunner/config.toml`;
//! a missing file yields the defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the AdventRunner API server.
    #[serde(default = "default_server_url")]
    pub server_url: String,
}

fn default_server_url() -> String {
    "http://localhost:8085".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
        }
    }
}

impl Config {
    /// Loads the config from the default location, falling back to
    /// defaults when the file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::ReadFailed { path, source })?;
        Ok(toml::from_str(&content)?)
    }

    /// Parses a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Path of the config file: `~/.config/adventrunner/config.toml`.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("adventrunner").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_empty() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.server_url, "http://localhost:8085");
    }

    #[test]
    fn parses_server_url() {
        let config = Config::from_toml(r#"server_url = "https://adventrunner.example""#).unwrap();
        assert_eq!(config.server_url, "https://adventrunner.example");
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(Config::from_toml("server_url = ").is_err());
    }
}
