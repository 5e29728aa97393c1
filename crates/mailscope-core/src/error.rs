//! Error types for the cache core.

use mailscope_engine::{EngineError, LabelScope};
use thiserror::Error;

/// Errors that can occur in cache operations.
///
/// The logged-out state is not an error: page requests for a user without a
/// session resolve to `Ok(None)`.
#[derive(Debug, Error)]
pub enum Error {
    /// The engine reported a failure during switch, creation, or fetch.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// The operation raced a lease teardown (label switch or explicit
    /// disconnect). Retryable: the next request builds a fresh lease.
    #[error("paginator lease for label {label} was disconnected mid-operation")]
    LeaseInvalidated {
        /// Label whose lease was torn down underneath the operation.
        label: LabelScope,
    },
}

/// Result type alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
