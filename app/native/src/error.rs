//! Error types for Float.
//!
//! Application-level errors surfaced by the CLI. The proxy itself reports
//! through [`crate::pip::PipError`].

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur during application execution.
#[derive(Debug, Error)]
pub enum FloatError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Output could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ConfigError> for FloatError {
    fn from(err: ConfigError) -> Self { Self::Config(err.to_string()) }
}
