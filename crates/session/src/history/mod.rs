//! Per-scenario session history.
//!
//! Each scenario keeps a small plain-text file with one line per completed
//! session, oldest first. The file behaves like a ring buffer: once it holds
//! `max_entries` lines, every new session pushes the oldest one out. Updates
//! rewrite the whole file through a temporary file in the same directory
//! followed by a rename, so a reader never observes a half-written history.

pub mod error;

use self::error::{ErrorKind, Result};
use crate::window::{Bound, TimeWindow};
use exn::ResultExt;
use photo_import_config::DEFAULT_HISTORY_ENTRIES;
use std::collections::VecDeque;
use std::fmt;
use std::io::{ErrorKind as IoErrorKind, Write};
use std::path::{Component, Path, PathBuf};
use tracing::instrument;

/// Summary of one completed session: the window that was copied, with the
/// provenance of each bound.
///
/// Rendered as `from: <ISO-8601|null> (<user|auto>); to: <ISO-8601|null> (<user|auto>)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryRecord {
    pub window: TimeWindow,
}
impl From<TimeWindow> for HistoryRecord {
    fn from(window: TimeWindow) -> Self {
        Self { window }
    }
}
impl fmt::Display for HistoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn field(f: &mut fmt::Formatter<'_>, name: &str, bound: &Bound) -> fmt::Result {
            match bound.value {
                Some(value) => write!(f, "{name}: {value} ({})", bound.provenance),
                None => write!(f, "{name}: null ({})", bound.provenance),
            }
        }
        field(f, "from", &self.window.from)?;
        f.write_str("; ")?;
        field(f, "to", &self.window.to)
    }
}

/// Bounded, chronologically ordered sequence of history lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLog {
    entries: VecDeque<String>,
    capacity: usize,
}
impl HistoryLog {
    /// A capacity of zero is treated as one; a history that can hold nothing
    /// is never useful.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { entries: VecDeque::with_capacity(capacity), capacity }
    }

    /// Appends an entry, returning whatever got evicted to make room.
    pub fn push(&mut self, entry: impl Into<String>) -> Option<String> {
        let evicted = match self.entries.len() >= self.capacity {
            true => self.entries.pop_front(),
            false => None,
        };
        self.entries.push_back(entry.into());
        evicted
    }

    /// Entries, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn from_text(text: &str, capacity: usize) -> Self {
        let mut log = Self::new(capacity);
        for line in text.lines().filter(|line| !line.trim().is_empty()) {
            log.push(line);
        }
        log
    }

    fn to_text(&self) -> String {
        self.entries.iter().fold(String::new(), |mut text, entry| {
            text.push_str(entry);
            text.push('\n');
            text
        })
    }
}

/// Directory of history files, one per scenario.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    dir: PathBuf,
    max_entries: usize,
}
impl HistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), max_entries: DEFAULT_HISTORY_ENTRIES }
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Location of the history file for `scenario`.
    pub fn path_for(&self, scenario: &str) -> Result<PathBuf> {
        let mut components = Path::new(scenario).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) if name == scenario => Ok(self.dir.join(format!("{scenario}.log"))),
            _ => exn::bail!(ErrorKind::InvalidScenario(scenario.to_string())),
        }
    }

    /// Past sessions for `scenario`, oldest first. A scenario that was never
    /// imported simply has an empty history.
    #[instrument(skip(self))]
    pub fn read(&self, scenario: &str) -> Result<HistoryLog> {
        let path = self.path_for(scenario)?;
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(HistoryLog::from_text(&text, self.max_entries)),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(HistoryLog::new(self.max_entries)),
            Err(e) => Err(e).or_raise(|| ErrorKind::Io(path)),
        }
    }

    /// Records a session, evicting the oldest entries beyond `max_entries`.
    ///
    /// Not safe against concurrent sessions for the same scenario; the last
    /// writer wins.
    #[instrument(skip(self, record))]
    pub fn append(&self, scenario: &str, record: &HistoryRecord) -> Result<()> {
        let path = self.path_for(scenario)?;
        let mut log = self.read(scenario)?;
        if let Some(evicted) = log.push(record.to_string()) {
            tracing::debug!(evicted = %evicted, "History full; dropped oldest entry");
        }
        std::fs::create_dir_all(&self.dir).or_raise(|| ErrorKind::Io(self.dir.clone()))?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).or_raise(|| ErrorKind::Io(self.dir.clone()))?;
        tmp.write_all(log.to_text().as_bytes()).or_raise(|| ErrorKind::Io(tmp.path().to_path_buf()))?;
        tmp.as_file().sync_all().or_raise(|| ErrorKind::Io(tmp.path().to_path_buf()))?;
        tmp.persist(&path).map_err(|e| e.error).or_raise(|| ErrorKind::Io(path.clone()))?;
        tracing::info!(entries = log.len(), path = %path.display(), "Session recorded in history");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::Timestamp;
    use crate::window::resolve;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn record(day: u32) -> HistoryRecord {
        let from = ts(&format!("2024-05-{day:02}"));
        HistoryRecord::from(resolve(Some(from), None, None, None))
    }

    #[test]
    fn test_record_format() {
        let window = resolve(Some(ts("2024-05-01")), None, None, Some(ts("2024-05-03 18:30:00")));
        assert_eq!(
            HistoryRecord::from(window).to_string(),
            "from: 2024-05-01T00:00:00 (user); to: 2024-05-03T18:30:00 (auto)"
        );
    }

    #[test]
    fn test_record_format_with_nulls() {
        let window = resolve(None, None, None, None);
        assert_eq!(HistoryRecord::from(window).to_string(), "from: null (auto); to: null (auto)");
    }

    #[test]
    fn test_log_evicts_oldest_first() {
        let mut log = HistoryLog::new(2);
        assert_eq!(log.push("a"), None);
        assert_eq!(log.push("b"), None);
        assert_eq!(log.push("c"), Some("a".to_string()));
        assert_eq!(log.iter().collect::<Vec<_>>(), ["b", "c"]);
    }

    #[test]
    fn test_read_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history"));
        let log = store.read("kitten-import").unwrap();
        assert!(log.is_empty());
        assert_eq!(log.capacity(), DEFAULT_HISTORY_ENTRIES);
    }

    #[test]
    fn test_append_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("nested/history"));
        store.append("kitten-import", &record(1)).unwrap();
        let text = std::fs::read_to_string(store.path_for("kitten-import").unwrap()).unwrap();
        assert_eq!(text, "from: 2024-05-01T00:00:00 (user); to: null (auto)\n");
    }

    #[test]
    fn test_ring_buffer_keeps_last_entries_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path()).with_max_entries(10);
        for day in 1..=13 {
            store.append("kitten-import", &record(day)).unwrap();
        }
        let log = store.read("kitten-import").unwrap();
        let expected: Vec<String> = (4..=13).map(|day| record(day).to_string()).collect();
        assert_eq!(log.iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_scenarios_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path());
        store.append("kittens", &record(1)).unwrap();
        store.append("puppies", &record(2)).unwrap();
        store.append("puppies", &record(3)).unwrap();
        assert_eq!(store.read("kittens").unwrap().len(), 1);
        assert_eq!(store.read("puppies").unwrap().len(), 2);
    }

    #[test]
    fn test_shrinking_max_entries_truncates_on_next_write() {
        let dir = tempfile::tempdir().unwrap();
        let wide = HistoryStore::new(dir.path()).with_max_entries(5);
        for day in 1..=5 {
            wide.append("kittens", &record(day)).unwrap();
        }
        let narrow = HistoryStore::new(dir.path()).with_max_entries(2);
        narrow.append("kittens", &record(6)).unwrap();
        let log = wide.read("kittens").unwrap();
        assert_eq!(log.iter().collect::<Vec<_>>(), [record(5).to_string(), record(6).to_string()]);
    }

    #[test]
    fn test_no_temporary_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path());
        store.append("kittens", &record(1)).unwrap();
        store.append("kittens", &record(2)).unwrap();
        let names: Vec<_> = std::fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().file_name()).collect();
        assert_eq!(names, ["kittens.log"]);
    }

    #[test]
    fn test_rejects_unsafe_scenario_names() {
        let store = HistoryStore::new("/tmp/history");
        for name in ["", "..", "a/b", "/etc/passwd"] {
            let err = store.path_for(name).unwrap_err();
            assert!(matches!(&*err, ErrorKind::InvalidScenario(_)));
        }
    }
}
