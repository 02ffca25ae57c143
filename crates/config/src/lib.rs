//! Configuration loading and validation for photo-import.
//!
//! Two files are involved: the per-machine [`AppConfig`] (where things live)
//! and the [`ImportConfig`] it points to (what gets imported, and where to).
//! Both are validated once when loaded and treated as read-only afterwards.

mod app;
pub mod error;
mod extension;
mod import;

pub use crate::app::{APP_NAME, AppConfig, DEFAULT_HISTORY_ENTRIES, ENV_PREFIX, HistorySettings};
pub use crate::extension::normalize as normalize_extension;
pub use crate::import::{ImportConfig, Scenario};
