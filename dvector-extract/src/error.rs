//! Error types for batch extraction

use dvector_features::FeatureError;
use thiserror::Error;

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Extraction error types
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Delimiter/index mismatch while deriving a speaker id
    #[error("Grouping error: {0}")]
    Grouping(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Feature loading or pooling failure
    #[error("Feature error: {0}")]
    Feature(#[from] FeatureError),

    /// Output serialization failure
    #[error("Encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Output deserialization failure
    #[error("Decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    pub fn grouping<S: Into<String>>(msg: S) -> Self {
        Self::Grouping(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }
}
