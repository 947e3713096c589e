//! Runtime error types.

use quarry_core::{RequestError, ResolveError, StrategyError};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur during runtime operations.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The plugin request could not be parsed.
    #[error("Invalid plugin request: {0}")]
    Request(#[from] RequestError),

    /// The resolution chain could not be built.
    #[error("Failed to build resolution chain: {0}")]
    Chain(#[from] StrategyError),

    /// A strategy failed while resolving.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The working directory could not be determined.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
