//! Application configuration management.
//!
//! This module handles loading and saving application-wide defaults: the
//! history database location and the deletion log path. CLI flags always
//! override what the config file says, and the config file itself is
//! optional: a missing or unreadable file silently falls back to
//! built-in defaults.

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default file name for the deletion log when nothing else is configured.
pub const DEFAULT_LOG_FILE: &str = "duplicate_cleaner.log";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Override for the history database path.
    #[serde(default)]
    pub history_db: Option<PathBuf>,

    /// Override for the deletion log path.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    ///
    /// Any failure (missing file, bad JSON, unreadable directory) falls
    /// back to defaults; configuration is a convenience, not a
    /// requirement.
    #[must_use]
    pub fn load() -> Self {
        match Self::load_internal() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    fn load_internal() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save the configuration to the default platform-specific path.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// The deletion log path to use, given an optional CLI override.
    #[must_use]
    pub fn resolve_log_file(&self, cli_override: Option<PathBuf>) -> PathBuf {
        cli_override
            .or_else(|| self.log_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
    }

    /// Get the default platform-specific configuration path.
    fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "dupehist", "dupehist")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.history_db.is_none());
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_resolve_log_file_precedence() {
        let config = Config {
            log_file: Some(PathBuf::from("/from/config.log")),
            ..Config::default()
        };

        assert_eq!(
            config.resolve_log_file(Some(PathBuf::from("/from/cli.log"))),
            PathBuf::from("/from/cli.log")
        );
        assert_eq!(
            config.resolve_log_file(None),
            PathBuf::from("/from/config.log")
        );
        assert_eq!(
            Config::default().resolve_log_file(None),
            PathBuf::from(DEFAULT_LOG_FILE)
        );
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let config = Config {
            history_db: Some(PathBuf::from("/data/history.db")),
            log_file: None,
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.history_db, config.history_db);
        assert!(parsed.log_file.is_none());
    }
}
