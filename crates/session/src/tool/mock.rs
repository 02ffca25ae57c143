//! In-memory transfer tool for testing.

use super::error::Result;
use super::{ListedFile, TransferStatus, TransferTool};
use crate::command::TransferCommand;
use crate::timestamp::Timestamp;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// Arguments of one recorded [`TransferTool::list_files`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCall {
    pub source: PathBuf,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}

/// Transfer tool that serves a canned listing and records every call.
///
/// Listing lines go through the same parser as real tool output, so
/// malformed lines fail exactly the way they would in production. Bounds are
/// recorded but not applied; filtering is left to the caller.
///
/// Exit codes for copies are configurable with
/// [`exiting_with`](Self::exiting_with); every copy is recorded, so tests can
/// assert that nothing ran at all.
pub struct MockTool {
    program: PathBuf,
    listing: Vec<String>,
    exit_code: Option<i32>,
    list_calls: RefCell<Vec<ListCall>>,
    copies: RefCell<Vec<TransferCommand>>,
}

impl MockTool {
    pub fn with_listing(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: PathBuf::from("rclone"),
            listing: lines.into_iter().map(Into::into).collect(),
            exit_code: Some(0),
            list_calls: RefCell::new(Vec::new()),
            copies: RefCell::new(Vec::new()),
        }
    }

    /// Make every copy finish with the given exit code (`None` = killed).
    pub fn exiting_with(mut self, code: Option<i32>) -> Self {
        self.exit_code = code;
        self
    }

    pub fn list_calls(&self) -> Vec<ListCall> {
        self.list_calls.borrow().clone()
    }

    pub fn copies(&self) -> Vec<TransferCommand> {
        self.copies.borrow().clone()
    }
}
impl Default for MockTool {
    fn default() -> Self {
        let lines: [&str; 0] = [];
        Self::with_listing(lines)
    }
}

impl TransferTool for MockTool {
    fn program(&self) -> &Path {
        &self.program
    }

    fn list_files(&self, source: &Path, from: Option<Timestamp>, to: Option<Timestamp>) -> Result<Vec<ListedFile>> {
        self.list_calls.borrow_mut().push(ListCall { source: source.to_path_buf(), from, to });
        self.listing.iter().map(|line| ListedFile::parse_line(line)).collect()
    }

    fn copy_files(&self, command: &TransferCommand) -> Result<TransferStatus> {
        self.copies.borrow_mut().push(command.clone());
        Ok(TransferStatus { code: self.exit_code })
    }
}
