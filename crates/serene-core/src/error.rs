//! Error types raised at the HTTP boundary.

use thiserror::Error;

/// Result type alias using [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur before a request reaches a handler.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The request body could not be read.
    #[error("Failed to read request body: {0}")]
    BodyCollection(String),
}
