//! Error types for the live writer.

use std::io;
use thiserror::Error;

/// Errors surfaced by [`LiveWriter`](crate::LiveWriter) operations.
///
/// Erase failures and terminal metadata lookups never show up here: they
/// degrade to "no erase" / "no wrap accounting" and are only logged.
#[derive(Debug, Error)]
pub enum LiveError {
    /// Writing the painted frame to the output sink failed.
    ///
    /// The frame is dropped; it will not be resubmitted on the next flush.
    #[error("failed to write to the output sink: {0}")]
    Sink(#[from] io::Error),

    /// The OS refused to spawn the refresh thread.
    #[error("failed to spawn the refresh thread: {0}")]
    Spawn(#[source] io::Error),

    /// The refresh interval was zero.
    #[error("refresh interval must be non-zero")]
    InvalidInterval,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LiveError>;

impl From<LiveError> for io::Error {
    fn from(err: LiveError) -> Self {
        match err {
            LiveError::Sink(e) | LiveError::Spawn(e) => e,
            LiveError::InvalidInterval => Self::new(io::ErrorKind::InvalidInput, err),
        }
    }
}
