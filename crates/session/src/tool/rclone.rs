use super::error::{ErrorKind, Result};
use super::{ListedFile, TransferStatus, TransferTool};
use crate::command::TransferCommand;
use crate::timestamp::Timestamp;
use exn::ResultExt;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::instrument;

/// The rclone executable.
#[derive(Debug, Clone)]
pub struct Rclone {
    path: PathBuf,
}
impl Rclone {
    /// Locate rclone on `PATH`.
    pub fn discover() -> Result<Self> {
        match which::which("rclone") {
            Ok(path) => {
                tracing::trace!(rclone = %path.display(), "Discovered rclone on system");
                Ok(Self { path })
            },
            Err(_) => {
                tracing::info!("rclone executable not found in PATH");
                exn::bail!(ErrorKind::NotFound);
            },
        }
    }

    /// Use an explicitly configured executable (a bare name is looked up on
    /// `PATH`, anything with a separator is checked directly).
    pub fn at(path: impl AsRef<Path>) -> Result<Self> {
        let path = which::which(path.as_ref()).or_raise(|| ErrorKind::NotFound)?;
        Ok(Self { path })
    }

    /// Arguments for a recursive, files-only listing in `timestamp;path`
    /// format. Bounds become rclone's age filters, which take absolute
    /// timestamps as well as durations.
    pub fn list_args(source: &Path, from: Option<Timestamp>, to: Option<Timestamp>) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["--ignore-case", "--files-only", "--recursive"].map(OsString::from).into();
        if let Some(from) = from {
            args.extend([OsString::from("--max-age"), OsString::from(from.to_string())]);
        }
        if let Some(to) = to {
            args.extend([OsString::from("--min-age"), OsString::from(to.to_string())]);
        }
        args.extend(["--format", "tp", "lsf"].map(OsString::from));
        args.push(source.as_os_str().to_os_string());
        args
    }
}

impl TransferTool for Rclone {
    fn program(&self) -> &Path {
        &self.path
    }

    #[instrument(skip_all, fields(source = %source.display()))]
    fn list_files(&self, source: &Path, from: Option<Timestamp>, to: Option<Timestamp>) -> Result<Vec<ListedFile>> {
        let output = Command::new(&self.path)
            .args(Self::list_args(source, from, to))
            .output()
            .or_raise(|| ErrorKind::Spawn(self.path.clone()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(code = ?output.status.code(), stderr = %stderr.trim(), "rclone listing failed");
            exn::bail!(ErrorKind::Exited(output.status.code()));
        }
        // Non-UTF-8 file names only lose fidelity in the path, never in the
        // timestamp or the extension that the scan actually looks at.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let files = stdout
            .lines()
            .map(ListedFile::parse_line)
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(files = files.len(), "rclone listing complete");
        Ok(files)
    }

    /// Runs with inherited stdio so the operator sees rclone's own progress.
    #[instrument(skip_all, fields(source = %command.source().display(), destination = %command.destination().display()))]
    fn copy_files(&self, command: &TransferCommand) -> Result<TransferStatus> {
        let status = Command::new(&self.path)
            .args(command.args())
            .status()
            .or_raise(|| ErrorKind::Spawn(self.path.clone()))?;
        tracing::debug!(code = ?status.code(), "rclone copy finished");
        Ok(TransferStatus { code: status.code() })
    }
}
