//! The port to the external listing/transfer tool.
//!
//! Everything the session needs from the outside world boils down to two
//! operations: list the files under a source, and run a prepared copy. Keeping
//! that behind [`TransferTool`] means sessions can be driven end-to-end in
//! tests without spawning processes.

pub mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod rclone;

#[cfg(any(test, feature = "mock"))]
pub use self::mock::{ListCall, MockTool};
pub use self::rclone::Rclone;
use self::error::{ErrorKind, Result};
use crate::command::TransferCommand;
use crate::timestamp::Timestamp;
use exn::ResultExt;
use std::path::Path;

/// A single file reported by [`TransferTool::list_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedFile {
    /// Path relative to the listed source, as printed by the tool.
    pub path: String,
    pub modified: Timestamp,
}
impl ListedFile {
    /// Parses one `timestamp;path` listing line.
    ///
    /// Anything else is an error rather than a skipped line: a partially
    /// understood listing would silently skew the derived time window.
    pub fn parse_line(line: &str) -> Result<Self> {
        let Some((timestamp, path)) = line.split_once(';') else {
            exn::bail!(ErrorKind::MalformedLine(line.to_string()));
        };
        if path.is_empty() {
            exn::bail!(ErrorKind::MalformedLine(line.to_string()));
        }
        let modified = timestamp.parse::<Timestamp>().or_raise(|| ErrorKind::InvalidTimestamp(line.to_string()))?;
        Ok(Self { path: path.to_string(), modified })
    }
}

/// Exit status of a copy run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferStatus {
    /// Process exit code; `None` if the process was terminated by a signal.
    pub code: Option<i32>,
}
impl TransferStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Narrow interface to the external file-synchronisation tool.
pub trait TransferTool {
    /// Executable used to run commands; also shown to the operator when
    /// rendering a command for review.
    fn program(&self) -> &Path;

    /// Recursively list regular files under `source`, optionally restricted to
    /// modification times inside `[from, to]`.
    ///
    /// Implementations may filter loosely (or not at all); callers must not
    /// rely on the bounds being applied exactly.
    fn list_files(&self, source: &Path, from: Option<Timestamp>, to: Option<Timestamp>) -> Result<Vec<ListedFile>>;

    /// Run a prepared copy to completion.
    ///
    /// A non-zero exit is *not* an error at this level; it is reported through
    /// the returned [`TransferStatus`]. Errors mean the copy never ran.
    fn copy_files(&self, command: &TransferCommand) -> Result<TransferStatus>;
}
