//! Obscura Configuration Module
//!
//! Provides configuration file support via `obscura.toml`, environment
//! variables, and runtime overrides.
//!
//! # Priority (highest to lowest)
//!
//! 1. Environment variables (`OBSCURA_*`)
//! 2. Configuration file (`obscura.toml`)
//! 3. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue {
        /// Configuration key that failed validation.
        key: String,
        /// Validation error message.
        message: String,
    },
}

/// Batch-composition configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Fixed size of every outgoing backend read batch.
    pub batch_size: usize,
    /// Dummy decoys injected per batch in Phase 3 / topped up in Phase 5.
    pub fake_dummy_count: usize,
    /// Size of the seeded dummy keyspace (`dummy_0..dummy_{n-1}`).
    pub total_dummies: usize,
    /// Naming prefix that classifies a key as a dummy decoy.
    pub dummy_prefix: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            fake_dummy_count: 25,
            total_dummies: 100,
            dummy_prefix: "dummy_".to_string(),
        }
    }
}

/// LRU front-cache configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries held by the front cache.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 100 }
    }
}

/// Backend fanout configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Deadline, in milliseconds, covering a full read or write fanout phase.
    pub deadline_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { deadline_ms: 5_000 }
    }
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address.
    pub host: String,
    /// Port number.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace.
    pub level: String,
    /// Log format: text or json.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Main Obscura configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ObscuraConfig {
    /// Batch-composition configuration.
    pub batch: BatchConfig,
    /// Front-cache configuration.
    pub cache: CacheConfig,
    /// Backend fanout configuration.
    pub backend: BackendConfig,
    /// Server configuration.
    pub server: ServerConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl ObscuraConfig {
    /// Loads configuration from default sources.
    ///
    /// Priority: defaults < file < environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("obscura.toml")
    }

    /// Loads configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("OBSCURA_").split("_").lowercase(false));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Creates a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::string(toml_str));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "batch.batch_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        if self.batch.fake_dummy_count > self.batch.total_dummies {
            return Err(ConfigError::InvalidValue {
                key: "batch.fake_dummy_count".to_string(),
                message: format!(
                    "fake_dummy_count ({}) cannot exceed total_dummies ({})",
                    self.batch.fake_dummy_count, self.batch.total_dummies
                ),
            });
        }

        if self.batch.dummy_prefix.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "batch.dummy_prefix".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if self.cache.capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "cache.capacity".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        if self.backend.deadline_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "backend.deadline_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                message: format!(
                    "value '{}' is invalid, expected one of: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        Ok(())
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = ObscuraConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.batch.batch_size, 50);
        assert_eq!(config.batch.fake_dummy_count, 25);
        assert_eq!(config.batch.total_dummies, 100);
        assert_eq!(config.cache.capacity, 100);
        assert_eq!(config.backend.deadline_ms, 5_000);
    }

    #[test]
    fn test_fake_dummy_count_exceeding_total_is_invalid() {
        let mut config = ObscuraConfig::default();
        config.batch.fake_dummy_count = 200;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_batch_size_is_invalid() {
        let mut config = ObscuraConfig::default();
        config.batch.batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_logging_level_is_rejected() {
        let mut config = ObscuraConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_overrides_defaults() {
        let toml_str = r"
            [batch]
            batch_size = 32

            [cache]
            capacity = 10
        ";
        let config = ObscuraConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.batch.batch_size, 32);
        assert_eq!(config.cache.capacity, 10);
        // Untouched sections keep their defaults.
        assert_eq!(config.batch.total_dummies, 100);
    }

    #[test]
    fn test_load_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obscura.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[server]\nport = 9090\n").unwrap();

        let config = ObscuraConfig::load_from_path(&path).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_round_trip_toml() {
        let config = ObscuraConfig::default();
        let serialized = config.to_toml().unwrap();
        let parsed = ObscuraConfig::from_toml(&serialized).unwrap();
        assert_eq!(parsed.batch.batch_size, config.batch.batch_size);
    }
}
