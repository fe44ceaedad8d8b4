//! Error types for feature loading and pooling

use thiserror::Error;

/// Result type for feature operations
pub type Result<T> = std::result::Result<T, FeatureError>;

/// Feature error types
#[derive(Error, Debug)]
pub enum FeatureError {
    /// Unreadable or malformed feature file
    #[error("Format error: {0}")]
    Format(String),

    /// Zero frames or zero utterances where at least one is required
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FeatureError {
    pub fn format<S: Into<String>>(msg: S) -> Self {
        Self::Format(msg.into())
    }

    pub fn empty_input<S: Into<String>>(msg: S) -> Self {
        Self::EmptyInput(msg.into())
    }
}
