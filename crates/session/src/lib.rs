//! Core of photo-import: everything between "the operator picked a scenario"
//! and "the files are copied and the session is recorded".
//!
//! The external transfer tool is reached only through [`tool::TransferTool`];
//! the interactive front-end only through [`session::Operator`]. Everything
//! else in here is plain data in, plain data out.

pub mod classify;
pub mod command;
pub mod error;
pub mod history;
pub mod scan;
pub mod session;
pub mod timestamp;
pub mod tool;
pub mod window;

pub use crate::classify::classify;
pub use crate::command::TransferCommand;
pub use crate::history::{HistoryLog, HistoryRecord, HistoryStore};
pub use crate::scan::ScanResult;
pub use crate::session::{Gate, Operator, Outcome, Plan, ScanReport, Session, SessionRequest, Summary};
pub use crate::timestamp::Timestamp;
pub use crate::tool::{Rclone, TransferTool};
pub use crate::window::{Bound, Provenance, TimeWindow};
