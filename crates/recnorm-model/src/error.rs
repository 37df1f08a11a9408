//! Error types for configuration loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing configuration documents.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Failed to read a configuration file.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid JSON or has the wrong shape.
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An in-memory configuration document could not be (de)serialized.
    #[error("invalid config document: {0}")]
    ConfigJson(#[from] serde_json::Error),
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
