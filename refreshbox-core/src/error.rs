//! Error types for refresh-time computation.

use thiserror::Error;

/// Error type for refresh-time computation.
///
/// Policies never retry or sanitize: every error surfaces to the cache
/// engine, which decides whether a failed computation aborts the population
/// attempt or falls back to the previous value.
#[derive(Debug, Error)]
pub enum RefreshError {
    /// A required argument was absent.
    ///
    /// Raised when a transition is built without a new value.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The value's own refresh-time accessor failed.
    #[error(transparent)]
    Capability(Box<dyn std::error::Error + Send + Sync>),
}

impl RefreshError {
    /// Wraps an accessor failure.
    pub fn capability<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        RefreshError::Capability(error.into())
    }
}
