//! Transfer command construction.
//!
//! Building the copy invocation is kept apart from running it: the operator
//! reviews the exact rendered command before anything touches the disk, and
//! the same inputs must always produce the same arguments.

use crate::window::{Provenance, TimeWindow};
use photo_import_config::normalize_extension;
use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Arguments for a single copy invocation (without the program itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCommand {
    args: Vec<OsString>,
    source: PathBuf,
    destination: PathBuf,
    dry_run: bool,
}
impl TransferCommand {
    /// Full ordered argument list, ending with the two endpoints.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Shell-quoted, single-line rendering for the operator to review.
    pub fn render(&self, program: &Path) -> String {
        std::iter::once(program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(quote)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Builds the copy command for the given endpoints and window.
///
/// Matching is always case-insensitive. Each present bound becomes an age
/// filter; absent bounds add nothing. An `auto` upper bound comes from a
/// listing truncated to whole seconds, so the copy cutoff is moved to the
/// start of the next second to keep the newest scanned files. Include filters are de-duplicated and
/// emitted in lexicographic order so identical inputs give identical output.
pub fn build(
    source: impl Into<PathBuf>,
    destination: impl Into<PathBuf>,
    window: &TimeWindow,
    include: impl IntoIterator<Item: AsRef<str>>,
    dry_run: bool,
) -> TransferCommand {
    let source = source.into();
    let destination = destination.into();
    let mut args: Vec<OsString> = ["--ignore-case", "copy", "-vv"].map(OsString::from).into();
    if dry_run {
        args.push(OsString::from("--dry-run"));
    }
    // rclone ages are relative to "now": files *newer* than `--max-age` and
    // *older* than `--min-age` are kept.
    if let Some(from) = window.from.value {
        args.extend([OsString::from("--max-age"), OsString::from(from.to_string())]);
    }
    if let Some(to) = window.to.value {
        let cutoff = match window.to.provenance {
            Provenance::Auto => to.next_second(),
            Provenance::User => to,
        };
        args.extend([OsString::from("--min-age"), OsString::from(cutoff.to_string())]);
    }
    let include: BTreeSet<String> = include
        .into_iter()
        .map(|ext| normalize_extension(ext.as_ref()))
        .filter(|ext| !ext.is_empty())
        .collect();
    for ext in include {
        args.extend([OsString::from("--include"), OsString::from(format!("*.{ext}"))]);
    }
    args.extend([source.clone().into_os_string(), destination.clone().into_os_string()]);
    TransferCommand { args, source, destination, dry_run }
}

/// POSIX-shell quoting: safe words pass through, everything else is wrapped
/// in single quotes.
fn quote(arg: &OsStr) -> String {
    let arg = arg.to_string_lossy();
    let safe = |c: char| c.is_ascii_alphanumeric() || "@%+=:,./-_".contains(c);
    if !arg.is_empty() && arg.chars().all(safe) {
        return arg.into_owned();
    }
    format!("'{}'", arg.replace('\'', r#"'"'"'"#))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::Timestamp;
    use crate::window::{Bound, resolve};
    use rstest::rstest;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn strings(command: &TransferCommand) -> Vec<String> {
        command.args().iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_full_command() {
        let window = resolve(Some(ts("2024-05-01")), None, None, Some(ts("2024-05-03T18:30:00")));
        let command = build("/media/sd/DCIM", "/srv/photos/kittens", &window, ["raw", "jpg"], false);
        assert_eq!(
            strings(&command),
            [
                "--ignore-case",
                "copy",
                "-vv",
                "--max-age",
                "2024-05-01T00:00:00",
                "--min-age",
                "2024-05-03T18:30:01",
                "--include",
                "*.jpg",
                "--include",
                "*.raw",
                "/media/sd/DCIM",
                "/srv/photos/kittens",
            ]
        );
        assert!(!command.is_dry_run());
        assert_eq!(command.source(), Path::new("/media/sd/DCIM"));
        assert_eq!(command.destination(), Path::new("/srv/photos/kittens"));
    }

    #[test]
    fn test_unbounded_window_has_no_age_filters() {
        let window = resolve(None, None, None, None);
        let command = build("/a", "/b", &window, ["jpg"], false);
        let args = strings(&command);
        assert!(!args.iter().any(|a| a == "--max-age" || a == "--min-age"));
    }

    #[test]
    fn test_only_present_bound_is_emitted() {
        let window = TimeWindow { from: Bound::auto(None), to: Bound::user(ts("2024-01-01")) };
        let args = strings(&build("/a", "/b", &window, ["jpg"], false));
        assert!(!args.contains(&"--max-age".to_string()));
        assert_eq!(args[3..5], ["--min-age", "2024-01-01T00:00:00"]);
    }

    #[test]
    fn test_auto_upper_bound_keeps_newest_scanned_second() {
        // A file modified at 18:30:00.450 is listed as 18:30:00.
        let newest = ts("2024-05-03 18:30:00");
        let window = resolve(None, None, Some(ts("2024-05-01")), Some(newest));
        let args = strings(&build("/sd", "/b", &window, ["jpg"], false));
        assert_eq!(args[5..7], ["--min-age", "2024-05-03T18:30:01"]);

        let explicit = resolve(None, Some(newest), Some(ts("2024-05-01")), None);
        let args = strings(&build("/sd", "/b", &explicit, ["jpg"], false));
        assert_eq!(args[5..7], ["--min-age", "2024-05-03T18:30:00"]);
    }

    #[test]
    fn test_dry_run_flag() {
        let window = resolve(None, None, None, None);
        let command = build("/a", "/b", &window, ["jpg"], true);
        assert!(command.is_dry_run());
        assert_eq!(strings(&command)[..4], ["--ignore-case", "copy", "-vv", "--dry-run"]);
    }

    #[rstest]
    #[case(&["jpg", "raw", "mp4"])]
    #[case(&["mp4", "jpg", "raw"])]
    #[case(&["raw", "mp4", "jpg", "JPG", ".jpg"])]
    fn test_deterministic_across_insertion_order(#[case] include: &[&str]) {
        let window = resolve(Some(ts("2024-05-01")), Some(ts("2024-05-02")), None, None);
        let expected = build("/a", "/b", &window, ["jpg", "mp4", "raw"], false);
        assert_eq!(build("/a", "/b", &window, include, false), expected);
    }

    #[test]
    fn test_render_quotes_globs_and_spaces() {
        let window = resolve(None, None, None, None);
        let command = build("/media/My Card/DCIM", "/srv/photos/it's", &window, ["jpg"], true);
        assert_eq!(
            command.render(Path::new("/usr/bin/rclone")),
            r#"/usr/bin/rclone --ignore-case copy -vv --dry-run --include '*.jpg' '/media/My Card/DCIM' '/srv/photos/it'"'"'s'"#
        );
    }
}
