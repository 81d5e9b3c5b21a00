//! Custom error types for Matchmaker
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for Matchmaker operations
#[derive(Error, Debug)]
pub enum MatchError {
    /// A tool with the same name is already registered
    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),

    /// The model asked for a tool that does not exist
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Model backend could not be reached or returned an error
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Model call exceeded the configured timeout
    #[error("Model call timed out after {0}s")]
    ModelTimeout(u64),

    /// Model not available
    #[error("Model '{0}' not available in Ollama. Run: ollama pull {0}")]
    ModelNotFound(String),

    /// A tool was called with missing or malformed arguments
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Profile store errors
    #[error("Store error: {0}")]
    Store(String),

    /// People directory errors
    #[error("Directory error: {0}")]
    Directory(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for Matchmaker operations
pub type Result<T> = std::result::Result<T, MatchError>;

impl MatchError {
    /// Create a model-unavailable error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::ModelUnavailable(msg.into())
    }

    /// Create an invalid-argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a directory error
    pub fn directory(msg: impl Into<String>) -> Self {
        Self::Directory(msg.into())
    }
}
