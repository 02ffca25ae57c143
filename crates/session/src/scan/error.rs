//! Error types for the [`scan`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A scan error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for scan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a scan failure.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The source location does not exist (or cannot be inspected).
    #[display("source unavailable: {}", _0.display())]
    SourceUnavailable(#[error(not(source))] PathBuf),
    /// The tool's listing failed or could not be fully understood.
    #[display("could not list source files")]
    Listing,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_is_retryable() {
        assert!(!ErrorKind::SourceUnavailable(PathBuf::from("/media/sd")).is_retryable());
        assert!(!ErrorKind::Listing.is_retryable());
    }
}
