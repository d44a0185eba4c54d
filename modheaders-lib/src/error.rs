use thiserror::Error;

/// Errors that can occur while loading, editing or applying header rules
#[derive(Error, Debug)]
pub enum ModHeadersError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("invalid regex pattern: '{pattern}'")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid file format")]
    InvalidFormat(#[source] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Unknown signal: {0}")]
    UnknownSignal(String),

    #[error("Rule line {index} out of range (table has {len} lines)")]
    LineOutOfRange { index: usize, len: usize },

    #[error("Watch error: {0}")]
    Watch(String),
}

pub type Result<T> = std::result::Result<T, ModHeadersError>;
