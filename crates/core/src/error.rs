//! Error types for bindfix-core

use thiserror::Error;

/// Errors that can occur in core operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid substitution pattern: {0}")]
    BadPattern(#[from] regex::Error),

    #[error("Config error in '{path}': {message}")]
    Config { path: String, message: String },

    #[error("Required pattern matched nothing: {pattern}")]
    PatternNotFound { pattern: String },

    #[error("File operation failed for '{path}': {message}")]
    FileOperation { path: String, message: String },
}
