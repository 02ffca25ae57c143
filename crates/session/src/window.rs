//! Effective time window resolution.
//!
//! Each bound is either supplied by the operator or derived from the scan.
//! The provenance travels with the value because it is persisted into the
//! session history alongside the timestamp itself.

use crate::timestamp::Timestamp;
use derive_more::Display;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// Explicitly supplied for this session.
    #[display("user")]
    User,
    /// Derived from the oldest/newest file seen by the scan.
    #[display("auto")]
    Auto,
}

/// One side of a [`TimeWindow`]. An absent value means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bound {
    pub value: Option<Timestamp>,
    pub provenance: Provenance,
}
impl Bound {
    pub fn user(value: Timestamp) -> Self {
        Self { value: Some(value), provenance: Provenance::User }
    }

    pub fn auto(value: Option<Timestamp>) -> Self {
        Self { value, provenance: Provenance::Auto }
    }
}

/// Inclusive `[from, to]` window bounding which files are copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    pub from: Bound,
    pub to: Bound,
}
impl TimeWindow {
    /// Whether `at` falls inside the window. Absent bounds never exclude.
    pub fn contains(&self, at: Timestamp) -> bool {
        self.from.value.is_none_or(|from| from <= at) && self.to.value.is_none_or(|to| at <= to)
    }
}

/// Determines the effective window: operator bounds win, scan bounds fill in.
pub fn resolve(
    user_from: Option<Timestamp>,
    user_to: Option<Timestamp>,
    scan_oldest: Option<Timestamp>,
    scan_newest: Option<Timestamp>,
) -> TimeWindow {
    TimeWindow {
        from: user_from.map_or_else(|| Bound::auto(scan_oldest), Bound::user),
        to: user_to.map_or_else(|| Bound::auto(scan_newest), Bound::user),
    }
}
