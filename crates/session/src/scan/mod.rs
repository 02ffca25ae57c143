//! Source scanning.
//!
//! Produces per-extension counts and the oldest/newest modification time
//! inside an optional inclusive window. The time bounds are taken across every
//! file, whatever its extension, since they later seed the copy window.

pub mod error;

use self::error::{ErrorKind, Result};
use crate::timestamp::Timestamp;
use crate::tool::TransferTool;
use exn::ResultExt;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::instrument;

/// What a scan found. Both bounds are `None` exactly when no file was counted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    found_extensions: BTreeMap<String, usize>,
    oldest: Option<Timestamp>,
    newest: Option<Timestamp>,
}
impl ScanResult {
    /// Occurrences per normalised extension (`""` for files without one).
    pub fn found_extensions(&self) -> &BTreeMap<String, usize> {
        &self.found_extensions
    }

    pub fn oldest(&self) -> Option<Timestamp> {
        self.oldest
    }

    pub fn newest(&self) -> Option<Timestamp> {
        self.newest
    }

    /// Number of files counted.
    pub fn total(&self) -> usize {
        self.found_extensions.values().sum()
    }

    fn record(&mut self, extension: String, modified: Timestamp) {
        *self.found_extensions.entry(extension).or_default() += 1;
        self.oldest = Some(self.oldest.map_or(modified, |oldest| oldest.min(modified)));
        self.newest = Some(self.newest.map_or(modified, |newest| newest.max(modified)));
    }
}

/// Normalised extension of a listed path: the suffix after the last `.` of
/// the file name, lower-cased, without the dot. Dot-files such as `.nomedia`
/// have no extension.
pub fn extension_of(path: &str) -> String {
    Path::new(path)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Scans `source` for files modified within `[from, to]` (absent bounds are
/// unbounded).
///
/// The bounds are handed to the tool so it can filter at the source, and
/// applied again here so the window is always exactly inclusive.
#[instrument(skip_all, fields(source = %source.display(), from = ?from, to = ?to))]
pub fn scan(
    tool: &dyn TransferTool,
    source: &Path,
    from: Option<Timestamp>,
    to: Option<Timestamp>,
) -> Result<ScanResult> {
    if !source.try_exists().unwrap_or(false) {
        exn::bail!(ErrorKind::SourceUnavailable(source.to_path_buf()));
    }
    let files = tool.list_files(source, from, to).or_raise(|| ErrorKind::Listing)?;
    let listed = files.len();
    let mut result = ScanResult::default();
    for file in files {
        let inside = from.is_none_or(|from| from <= file.modified) && to.is_none_or(|to| file.modified <= to);
        if inside {
            result.record(extension_of(&file.path), file.modified);
        }
    }
    tracing::info!(listed, counted = result.total(), "Source scan complete");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::MockTool;
    use rstest::rstest;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    const LISTING: [&str; 6] = [
        "2024-05-02 09:00:00;100CANON/IMG_0002.JPG",
        "2024-05-01 08:00:00;100CANON/IMG_0001.jpg",
        "2024-05-03 10:00:00;100CANON/IMG_0003.CR2",
        "2024-04-30 23:59:59;MISC/.nomedia",
        "2024-05-04 12:00:00;MISC/index.db",
        "2024-05-02 12:00:00;MISC/README",
    ];

    #[rstest]
    #[case("IMG_0001.JPG", "jpg")]
    #[case("dir/IMG_0001.jpeg", "jpeg")]
    #[case("archive.tar.GZ", "gz")]
    #[case("README", "")]
    #[case("dir/.nomedia", "")]
    #[case("dir.d/file", "")]
    fn test_extension_of(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(extension_of(path), expected);
    }

    #[test]
    fn test_counts_and_bounds() {
        let source = tempfile::tempdir().unwrap();
        let tool = MockTool::with_listing(LISTING);
        let result = scan(&tool, source.path(), None, None).unwrap();

        let expected: BTreeMap<String, usize> =
            [("jpg", 2), ("cr2", 1), ("", 2), ("db", 1)].map(|(e, c)| (e.to_string(), c)).into();
        assert_eq!(result.found_extensions(), &expected);
        assert_eq!(result.total(), 6);
        assert_eq!(result.oldest(), Some(ts("2024-04-30 23:59:59")));
        assert_eq!(result.newest(), Some(ts("2024-05-04 12:00:00")));
    }

    #[test]
    fn test_window_is_inclusive_and_passed_to_tool() {
        let source = tempfile::tempdir().unwrap();
        let tool = MockTool::with_listing(LISTING);
        let (from, to) = (ts("2024-05-01 08:00:00"), ts("2024-05-03 10:00:00"));
        let result = scan(&tool, source.path(), Some(from), Some(to)).unwrap();

        assert_eq!(result.total(), 4);
        assert_eq!(result.oldest(), Some(from));
        assert_eq!(result.newest(), Some(to));
        assert!(!result.found_extensions().contains_key("db"));

        let calls = tool.list_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!((calls[0].from, calls[0].to), (Some(from), Some(to)));
    }

    #[test]
    fn test_open_ended_window() {
        let source = tempfile::tempdir().unwrap();
        let tool = MockTool::with_listing(LISTING);
        let result = scan(&tool, source.path(), Some(ts("2024-05-03")), None).unwrap();
        assert_eq!(result.total(), 2);
        assert!(result.oldest() <= result.newest());
    }

    #[test]
    fn test_empty_source() {
        let source = tempfile::tempdir().unwrap();
        let result = scan(&MockTool::default(), source.path(), None, None).unwrap();
        assert!(result.found_extensions().is_empty());
        assert_eq!((result.oldest(), result.newest()), (None, None));
    }

    #[test]
    fn test_nothing_inside_window_is_empty() {
        let source = tempfile::tempdir().unwrap();
        let tool = MockTool::with_listing(LISTING);
        let result = scan(&tool, source.path(), Some(ts("2025-01-01")), None).unwrap();
        assert_eq!(result, ScanResult::default());
    }

    #[test]
    fn test_missing_source_fails_before_listing() {
        let dir = tempfile::tempdir().unwrap();
        let tool = MockTool::with_listing(LISTING);
        let err = scan(&tool, &dir.path().join("DCIM"), None, None).unwrap_err();
        assert!(matches!(&*err, ErrorKind::SourceUnavailable(_)));
        assert!(tool.list_calls().is_empty());
    }

    #[rstest]
    #[case("not a listing line")]
    #[case("2024-05-01 25:61:00;IMG_0009.JPG")]
    fn test_bad_line_fails_whole_scan(#[case] bad: &str) {
        let source = tempfile::tempdir().unwrap();
        let mut lines = LISTING.to_vec();
        lines.insert(2, bad);
        let err = scan(&MockTool::with_listing(lines), source.path(), None, None).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Listing));
    }
}
