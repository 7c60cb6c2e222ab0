//! Error types for Unisearch
//!
//! Provides standardized error handling across the library.

use thiserror::Error;

/// Errors that can occur in Unisearch
#[derive(Debug, Error)]
pub enum UnisearchError {
    /// Persisted configuration could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration could not be serialized or written
    #[error("Write error: {0}")]
    Write(String),

    /// Export requested while nothing is stored
    #[error("No configuration has been saved yet")]
    NoConfiguration,

    /// Text could not be percent-encoded or percent-decoded
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Built string was rejected as a URL
    #[error("Template error: {0}")]
    Template(String),

    /// Command identifier did not resolve to a stored command
    #[error("Command error: {0}")]
    Command(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Unisearch operations
pub type UnisearchResult<T> = Result<T, UnisearchError>;
