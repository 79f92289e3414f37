//! Configuration Management
//!
//! Loads client configuration from TOML files:
//! - backend endpoint
//! - history storage directory override
//! Environment variables (`STUDYDESK_*`) override file values, and CLI
//! flags override both.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the education backend.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Where the history file lives; defaults to the platform data dir.
    #[serde(default)]
    pub history_dir: Option<PathBuf>,

    /// Disable colored output.
    #[serde(default)]
    pub no_color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            history_dir: None,
            no_color: false,
        }
    }
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8000".to_string()
}

impl Config {
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)
                    .with_context(|| format!("Failed to read config from {}", p))?;
                toml::from_str::<Config>(&content).context("Failed to parse config")?
            }
            None => {
                // Try default locations
                let home_config = dirs::config_dir().map(|d| d.join("studydesk/config.toml"));

                let mut candidates: Vec<PathBuf> = vec![PathBuf::from("studydesk.toml")];
                if let Some(hc) = home_config {
                    candidates.push(hc);
                }

                let mut loaded = None;
                for candidate in &candidates {
                    if let Ok(content) = std::fs::read_to_string(candidate) {
                        loaded =
                            Some(toml::from_str(&content).context("Failed to parse config")?);
                        break;
                    }
                }
                loaded.unwrap_or_default()
            }
        };

        // Override with environment variables
        if let Ok(endpoint) = std::env::var("STUDYDESK_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Ok(dir) = std::env::var("STUDYDESK_HISTORY_DIR") {
            config.history_dir = Some(PathBuf::from(dir));
        }
        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.endpoint, "http://127.0.0.1:8000");
        assert!(config.history_dir.is_none());
        assert!(!config.no_color);
    }

    #[test]
    fn test_config_load_missing_file() {
        let result = Config::load(Some("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "endpoint = \"http://backend.test:9000\"").unwrap();
        writeln!(file, "no_color = true").unwrap();

        let config = Config::load(file.path().to_str()).unwrap();
        assert_eq!(config.endpoint, "http://backend.test:9000");
        assert!(config.no_color);
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "no_color = true").unwrap();

        let config = Config::load(file.path().to_str()).unwrap();
        assert_eq!(config.endpoint, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_config_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "endpoint = [not toml").unwrap();
        assert!(Config::load(file.path().to_str()).is_err());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = Config {
            endpoint: "http://x".to_string(),
            history_dir: Some(PathBuf::from("/tmp/h")),
            no_color: true,
        };
        let toml_str = toml::to_string(&config).unwrap();
        let back: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(back.endpoint, "http://x");
        assert_eq!(back.history_dir, Some(PathBuf::from("/tmp/h")));
    }
}
