//! Transfer Tool Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A transfer tool error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for transfer tool operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The external executable could not be located.
    #[display("rclone not detected on your system")]
    NotFound,
    /// The executable exists but could not be started.
    #[display("failed to run {}", _0.display())]
    Spawn(#[error(not(source))] PathBuf),
    /// The listing exited unsuccessfully; `None` when killed by a signal.
    #[display("listing exited with code: {}", _0.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    Exited(#[error(not(source))] Option<i32>),
    /// A listing line did not have the `timestamp;path` shape.
    #[display("malformed listing line: {_0:?}")]
    MalformedLine(#[error(not(source))] String),
    /// A listing line carried a timestamp that could not be parsed.
    #[display("unparseable modification time in listing line: {_0:?}")]
    InvalidTimestamp(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Retrying is the operator's call, never ours.
        false
    }
}
