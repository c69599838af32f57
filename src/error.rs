//! Error types for vidsum.

use thiserror::Error;

/// Library-level error type for vidsum operations.
#[derive(Error, Debug)]
pub enum VidsumError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Discovery failed: {0}")]
    Discovery(String),

    #[error("Transcript unavailable: {0}")]
    Transcript(String),

    #[error("Summarization failed: {0}")]
    Summarization(String),

    #[error("Aggregation failed: {0}")]
    Aggregation(String),

    #[error("Invalid locator: {0}")]
    InvalidLocator(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for vidsum operations.
pub type Result<T> = std::result::Result<T, VidsumError>;
