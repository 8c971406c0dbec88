//! Engine error types.

use thiserror::Error;
use zonewise_domain::DomainError;

/// Errors raised while configuring the engine.
///
/// Zone lookups never fail: a missing zone is an empty result.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Domain error
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
