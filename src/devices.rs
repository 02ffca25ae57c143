//! Candidate source roots: mounted disks, removable ones first.

use dialoguer::Select;
use dialoguer::console::Term;
use indicatif::HumanBytes;
use std::fmt;
use std::path::PathBuf;
use sysinfo::Disks;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRoot {
    pub label: String,
    pub path: PathBuf,
    pub removable: bool,
    pub used: u64,
    pub total: u64,
}
impl fmt::Display for SourceRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())?;
        if !self.label.is_empty() {
            write!(f, " [{}]", self.label)?;
        }
        write!(f, " {} of {} used", HumanBytes(self.used), HumanBytes(self.total))?;
        if self.removable {
            f.write_str(", removable")?;
        }
        Ok(())
    }
}

pub fn list() -> Vec<SourceRoot> {
    let disks = Disks::new_with_refreshed_list();
    let mut roots: Vec<SourceRoot> = disks
        .list()
        .iter()
        .filter(|disk| disk.total_space() > 0)
        .map(|disk| SourceRoot {
            label: disk.name().to_string_lossy().into_owned(),
            path: disk.mount_point().to_path_buf(),
            removable: disk.is_removable(),
            used: disk.total_space().saturating_sub(disk.available_space()),
            total: disk.total_space(),
        })
        .collect();
    sort(&mut roots);
    tracing::debug!(count = roots.len(), "Enumerated source roots");
    roots
}

fn sort(roots: &mut [SourceRoot]) {
    roots.sort_by(|a, b| b.removable.cmp(&a.removable).then_with(|| a.path.cmp(&b.path)));
}

/// Lets the operator pick a source root. Returns `None` without a terminal,
/// without any candidates, or when the selection is cancelled.
pub fn choose() -> Option<PathBuf> {
    let term = Term::stderr();
    if !term.is_term() {
        tracing::debug!("Not a terminal; cannot offer a device selection");
        return None;
    }
    let mut roots = list();
    if roots.is_empty() {
        return None;
    }
    let labels: Vec<String> = roots.iter().map(ToString::to_string).collect();
    match Select::new().with_prompt("Import from which device?").items(&labels).default(0).interact_on_opt(&term) {
        Ok(Some(index)) if index < roots.len() => Some(roots.swap_remove(index).path),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(error = %e, "Device selection failed");
            None
        },
    }
}
