//! Error types for the webhook
//!
//! Every failure the reconciler can surface falls into one of a small number
//! of kinds. The HTTP boundary collapses all of them into a generic response,
//! so the kind is what gets logged.

use thiserror::Error;

/// Result type alias for webhook operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the webhook
#[derive(Error, Debug)]
pub enum Error {
    /// The registrar did not answer a query or mutation with success
    #[error("Registrar transport error: {0}")]
    Transport(String),

    /// The registrar's answer could not be parsed into records
    #[error("Registrar format error: {0}")]
    Format(String),

    /// A caller-supplied change batch or endpoint is malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a format error
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Stable short name of the error kind, for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Transport(_) => "transport",
            Error::Format(_) => "format",
            Error::Validation(_) => "validation",
            Error::Config(_) => "config",
            Error::Json(_) => "json",
        }
    }
}
