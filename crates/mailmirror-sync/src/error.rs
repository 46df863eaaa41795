//! Error types for the sync passes.

use thiserror::Error;

/// Errors that can occur while running a sync pass.
#[derive(Debug, Error)]
pub enum Error {
    /// The durable store failed.
    #[error("Store error: {0}")]
    Store(#[from] mailmirror_core::Error),
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self::Store(mailmirror_core::Error::from(err))
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
