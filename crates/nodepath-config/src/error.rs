//! Configuration error types.

use thiserror::Error;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors produced while loading a configuration snapshot.
///
/// None of these ever touch the snapshot already held by a
/// [`ConfigStore`](crate::ConfigStore).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Malformed(String),

    #[error("configuration document {namespace}/{name} not found")]
    MissingDocument { namespace: String, name: String },

    #[error("configuration document {namespace}/{name} does not contain key {key}")]
    MissingKey {
        namespace: String,
        name: String,
        key: String,
    },

    #[error("failed to fetch configuration document: {0}")]
    Fetch(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Malformed(e.to_string())
    }
}
