//! Configuration for the study link service
//!
//! Loaded from TOML. Every field has a default, so an empty file is valid.
//!
//! ```toml
//! page_size = 50
//!
//! [store]
//! path = "studylink.db"
//! busy_timeout_ms = 5000
//! wal = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use studylink_store::StoreConfig;
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid configuration value: {0}")]
    Invalid(String),
}

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Database settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Rows fetched per page when walking request sequences
    /// Default: 50
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    50
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            page_size: default_page_size(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ServiceConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration backed by a private in-memory database
    pub fn in_memory() -> Self {
        Self {
            store: StoreConfig::in_memory(),
            ..Self::default()
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be at least 1".to_string()));
        }
        if self.store.busy_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "store.busy_timeout_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.page_size, 50);
        assert_eq!(config.store.path, PathBuf::from("studylink.db"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = ServiceConfig::from_toml("").unwrap();
        assert_eq!(config.page_size, 50);
        assert_eq!(config.store.busy_timeout_ms, 5000);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            page_size = 10

            [store]
            path = "/var/lib/studylink/links.db"
            busy_timeout_ms = 250
            wal = false
        "#;

        let config = ServiceConfig::from_toml(toml).unwrap();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.store.path, PathBuf::from("/var/lib/studylink/links.db"));
        assert_eq!(config.store.busy_timeout_ms, 250);
        assert!(!config.store.wal);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let result = ServiceConfig::from_toml("page_size = 0");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = ServiceConfig::from_file("/nonexistent/studylink.toml");
        assert!(matches!(result, Err(ConfigError::FileRead(_))));
    }
}
