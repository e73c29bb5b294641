//! Shared primitives for all Rust crates in the datasource permission reconciler.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Result type used across reconciler crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
///
/// Remote adapters translate transport failures into these variants so that
/// callers match on the discriminant instead of the rendered message.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Caller is not authenticated against the remote server.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is authenticated but blocked by remote policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns whether this error reports a missing remote resource.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
