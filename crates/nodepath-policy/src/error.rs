//! Policy construction errors.

use nodepath_config::ConfigError;
use thiserror::Error;

/// Errors that prevent a [`PathPolicy`](crate::PathPolicy) from being built.
///
/// Once constructed the policy never fails as a whole; per-pod problems
/// surface as [`Decision::Error`](crate::Decision::Error).
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("invalid plugin arguments: {0}")]
    InvalidArgs(String),

    #[error("failed to load initial config: {0}")]
    InitialLoad(#[from] ConfigError),
}

pub type PolicyResult<T> = Result<T, PolicyError>;
