//! Error types for the CLI application.

use studylink_service::{ConfigError, ServiceError};
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid service configuration values
    #[error(transparent)]
    ServiceConfig(#[from] ConfigError),

    /// Error returned by a study link operation
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// No actor given for a command that acts on someone's behalf
    #[error("No actor given. Use --as <ACTOR> or set STUDYLINK_ACTOR.")]
    NoActor,
}

impl CliError {
    /// Process exit code for this error
    ///
    /// Rejected operations exit with 1, everything else with 2.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Service(err) if err.is_domain() => 1,
            _ => 2,
        }
    }
}
