//! Configuration loading and typed config structures for Duofarm.
//!
//! The canonical configuration lives in `duofarm-config.yaml`. This module
//! defines strongly-typed structs that mirror the YAML structure and a
//! loader that reads, overrides, and validates it. Every field has a
//! default, so an empty file is a valid configuration.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use duofarm_types::{RoomId, Species};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is not usable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level Duofarm configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DuofarmConfig {
    /// The room this process hosts.
    #[serde(default)]
    pub room: RoomConfig,

    /// Health refresh cadence.
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Where farms are persisted.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DuofarmConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `DUOFARM_DATA_DIR` overrides `storage.data_dir`
    /// - `DUOFARM_ROOM_ID` overrides `room.room_id`
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, applying env overrides.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_without_env(yaml)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string, ignoring the environment.
    pub fn parse_without_env(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml rejects a completely empty document; treat it as `{}`.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from environment variables when set.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("DUOFARM_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("DUOFARM_ROOM_ID") {
            let id = val.parse::<RoomId>().map_err(|e| ConfigError::Invalid {
                reason: format!("DUOFARM_ROOM_ID is not a UUID: {e}"),
            })?;
            self.room.room_id = Some(id);
        }
        Ok(())
    }

    /// Reject values that parse but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh.interval_secs == 0 {
            return Err(ConfigError::Invalid {
                reason: String::from("refresh.interval_secs must be at least 1"),
            });
        }
        if self.refresh.save_every == 0 {
            return Err(ConfigError::Invalid {
                reason: String::from("refresh.save_every must be at least 1"),
            });
        }
        Ok(())
    }
}

/// Room configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RoomConfig {
    /// Id of the hosted room. A fresh id is generated when absent.
    #[serde(default)]
    pub room_id: Option<RoomId>,

    /// When the duo paired up; drives shop unlock days. Defaults to now.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,

    /// Points in the wallet at startup.
    #[serde(default)]
    pub starting_points: u64,

    /// Animal adopted for free when a room has no farm yet.
    #[serde(default)]
    pub starter_species: Option<Species>,
}

/// Health refresh configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between health refreshes.
    #[serde(default = "default_refresh_interval_secs")]
    pub interval_secs: u64,

    /// Persist the farm after every N refreshes.
    #[serde(default = "default_save_every")]
    pub save_every: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_refresh_interval_secs(),
            save_every: default_save_every(),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per room.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error). `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

const fn default_refresh_interval_secs() -> u64 {
    30
}

const fn default_save_every() -> u64 {
    10
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/farms")
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = DuofarmConfig::default();
        assert_eq!(config.refresh.interval_secs, 30);
        assert_eq!(config.refresh.save_every, 10);
        assert_eq!(config.storage.data_dir, PathBuf::from("data/farms"));
        assert_eq!(config.logging.level, "info");
        assert!(config.room.room_id.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
room:
  room_id: "0190f5a2-7c1e-7a3b-9a4e-2f1d3c4b5a69"
  started_at: "2026-02-14T09:00:00Z"
  starting_points: 250
  starter_species: chicken

refresh:
  interval_secs: 60
  save_every: 5

storage:
  data_dir: "/var/lib/duofarm"

logging:
  level: "debug"
  json: true
"#;

        let config = DuofarmConfig::parse_without_env(yaml);
        assert!(config.is_ok());
        let config = config.unwrap_or_default();
        assert_eq!(
            config.room.room_id.map(|id| id.to_string()),
            Some(String::from("0190f5a2-7c1e-7a3b-9a4e-2f1d3c4b5a69"))
        );
        assert_eq!(config.room.starting_points, 250);
        assert_eq!(config.room.starter_species, Some(Species::Chicken));
        assert_eq!(
            config.room.started_at.map(|t| t.timestamp()),
            Some(1_771_059_600)
        );
        assert_eq!(config.refresh.interval_secs, 60);
        assert_eq!(config.refresh.save_every, 5);
        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/duofarm"));
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn partial_yaml_uses_defaults() {
        let config = DuofarmConfig::parse_without_env("refresh:\n  interval_secs: 45\n");
        assert!(config.is_ok());
        let config = config.unwrap_or_default();
        assert_eq!(config.refresh.interval_secs, 45);
        assert_eq!(config.refresh.save_every, 10);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn empty_yaml_is_default() {
        let config = DuofarmConfig::parse_without_env("   \n");
        assert!(config.is_ok());
        assert_eq!(config.unwrap_or_default(), DuofarmConfig::default());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = DuofarmConfig::parse_without_env("refresh:\n  interval_secs: 0\n");
        assert!(matches!(config, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn unknown_species_is_a_yaml_error() {
        let config = DuofarmConfig::parse_without_env("room:\n  starter_species: dragon\n");
        assert!(matches!(config, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = DuofarmConfig::from_file(Path::new("/nonexistent/duofarm-config.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
