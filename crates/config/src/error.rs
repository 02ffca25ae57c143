//! Configuration Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction, in the same shape as every other crate in the workspace.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// No home directory could be determined, so there are no default paths.
    #[display("could not determine the configuration directory for this user")]
    NoConfigDirectory,
    /// A configuration file that must exist does not.
    #[display("configuration file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// The configuration sources could not be read or deserialized.
    #[display("could not read configuration: {_0}")]
    Parse(#[error(not(source))] String),
    /// The configuration was readable but breaks a rule.
    #[display("invalid configuration: {_0}")]
    Invalid(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Configuration has to be fixed by a human first.
        false
    }
}
