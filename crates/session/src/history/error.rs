//! Error types for the [`history`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A history error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for history operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The scenario name cannot be used as a history file name.
    #[display("scenario name `{_0}` cannot be used for a history file")]
    InvalidScenario(#[error(not(source))] String),
    /// Reading or rewriting a history file failed.
    #[display("history file I/O failed: {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
