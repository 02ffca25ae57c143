//! Zone-less timestamps.
//!
//! The listing tool reports modification times as local wall-clock time
//! without an offset, and operators type bounds the same way, so timestamps
//! here are naive on purpose and only ever compared with each other.

use derive_more::{Display, Error};
use std::fmt;
use std::str::FromStr;
use time::macros::format_description;
use time::{Date, Duration, PrimitiveDateTime};

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
#[display("invalid timestamp `{_0}`, expected YYYY-MM-DD, YYYY-MM-DDTHH:MM:SS or YYYY-MM-DD HH:MM:SS")]
pub struct InvalidTimestamp(#[error(not(source))] pub String);

/// A point in (local, naive) time with ISO-8601 rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(PrimitiveDateTime);

impl Timestamp {
    pub fn datetime(&self) -> PrimitiveDateTime {
        self.0
    }

    /// Start of the following whole second.
    ///
    /// Listings report whole seconds, so this is the earliest instant that
    /// is strictly later than every file reported within this timestamp's
    /// second.
    pub fn next_second(&self) -> Self {
        let truncated = self.0 - Duration::nanoseconds(i64::from(self.0.nanosecond()));
        truncated.checked_add(Duration::SECOND).map_or(*self, Self)
    }
}

impl From<PrimitiveDateTime> for Timestamp {
    fn from(value: PrimitiveDateTime) -> Self {
        Self(value)
    }
}

impl FromStr for Timestamp {
    type Err = InvalidTimestamp;

    /// Accepts a date (midnight is assumed) or a date and time separated by
    /// either `T` or a space, with optional fractional seconds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        PrimitiveDateTime::parse(s, format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"))
            .or_else(|_| PrimitiveDateTime::parse(s, format_description!("[year]-[month]-[day] [hour]:[minute]:[second]")))
            .or_else(|_| {
                PrimitiveDateTime::parse(s, format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"))
            })
            .or_else(|_| {
                PrimitiveDateTime::parse(s, format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"))
            })
            .or_else(|_| Date::parse(s, format_description!("[year]-[month]-[day]")).map(Date::midnight))
            .map(Self)
            .map_err(|_| InvalidTimestamp(s.to_string()))
    }
}

impl fmt::Display for Timestamp {
    /// ISO-8601 without offset; sub-second precision only when present.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = match self.0.nanosecond() {
            0 => self.0.format(format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]")),
            _ => self.0.format(format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]")),
        };
        f.write_str(&rendered.map_err(|_| fmt::Error)?)
    }
}
