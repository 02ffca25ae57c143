//! Session Error Types
//!
//! Every failure that reaches the session boundary names the scenario it
//! happened in. Module-level errors (scan, tool, history) hang below these in
//! the [`exn`] error tree, so the full chain is still available for debugging.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A session error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The requested scenario is not configured.
    #[display("unknown scenario `{scenario}` (configured: {})", known.join(", "))]
    UnknownScenario { scenario: String, known: Vec<String> },
    /// The scenario's source location does not exist under the chosen root.
    #[display("scenario `{scenario}`: source unavailable: {}", path.display())]
    SourceUnavailable { scenario: String, path: PathBuf },
    /// Listing the source failed or produced output that could not be understood.
    #[display("scenario `{scenario}`: scanning the source failed")]
    Scan { scenario: String },
    /// The copy did not finish successfully; history was left untouched.
    #[display("scenario `{scenario}`: transfer failed ({})", code.map_or_else(|| "terminated or not started".to_string(), |code| format!("exit code {code}")))]
    TransferFailed { scenario: String, code: Option<i32> },
    /// The session history could not be read or written.
    #[display("scenario `{scenario}`: session history unavailable")]
    History { scenario: String },
}

impl ErrorKind {
    /// The scenario this error belongs to.
    pub fn scenario(&self) -> &str {
        match self {
            Self::UnknownScenario { scenario, .. }
            | Self::SourceUnavailable { scenario, .. }
            | Self::Scan { scenario }
            | Self::TransferFailed { scenario, .. }
            | Self::History { scenario } => scenario,
        }
    }

    /// Returns `true` if retrying might succeed.
    ///
    /// Nothing is retried automatically; recovery is always left to the operator.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
