//! Error types for the streaming harness
//!
//! Inside a scenario attempt every error is folded into an outcome by the
//! runner; these variants only surface directly for CLI-level failures.

use std::time::Duration;

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === Connection Errors ===
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Failed to connect to {endpoint}: {reason}")]
    ConnectionFailed { endpoint: String, reason: String },

    #[error("Connection timed out after {0:?}")]
    ConnectTimeout(Duration),

    #[error("Failed to send stimulus: {0}")]
    SendFailed(String),

    #[error("Failed to receive frame: {0}")]
    ReceiveFailed(String),

    #[error("Session already closed")]
    SessionClosed,

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed to parse scenario file '{path}': {reason}")]
    ScenarioParse { path: String, reason: String },

    // === REST API Errors ===
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API refused request: {0}")]
    Api(String),

    #[error("Authentication required. Log in first or pass --token")]
    AuthRequired,

    // === IO Errors ===
    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid endpoint error
    pub fn invalid_endpoint(endpoint: &str, reason: impl ToString) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a connection failed error
    pub fn connection_failed(endpoint: &str, reason: impl ToString) -> Self {
        Self::ConnectionFailed {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a scenario parse error
    pub fn scenario_parse(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::ScenarioParse {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}
