//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in store operations.
///
/// Operations that target rows already removed by a concurrent path are
/// not errors: repositories report them as `false`/`None`/zero-row
/// results so callers can treat them as idempotent no-ops.
#[derive(Debug, Error)]
pub enum Error {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An internal invariant was violated.
    ///
    /// The surrounding unit of work must be aborted; the condition is
    /// never silently repaired.
    #[error("Integrity violation: {0}")]
    Integrity(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
