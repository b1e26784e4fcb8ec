//! Error types for the oai client.

use thiserror::Error;

/// Result type alias using the oai Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for oai operations.
///
/// Upstream API error payloads are not represented here: a response body
/// carrying an `error` object decodes like any other body and is returned
/// to the caller as a value.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure (connection refused, timeout, broken stream).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body or stream chunk is not JSON, even after repair.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Caller-supplied parameters rejected before sending.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local file I/O failed (upload sources).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(e.to_string())
    }
}

impl From<crate::config::ConfigError> for Error {
    fn from(e: crate::config::ConfigError) -> Self {
        Error::Config(e.to_string())
    }
}
