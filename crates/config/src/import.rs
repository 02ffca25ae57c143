//! Import configuration: where photos go and which scenarios exist.
//!
//! This is the "user" configuration file, kept separate from the application
//! settings so that it can live next to the photo library (or in a synced
//! folder) while the application settings stay per-machine.
//!
//! ```yaml
//! target_root: /srv/photos
//! include: [jpg, raw, mp4]
//! exclude: [db, thm]
//! scenarios:
//!   kitten-import:
//!     source: DCIM/100CANON
//!   phone:
//!     source: Android/DCIM/Camera
//!     folder: phone-camera
//! ```

use crate::error::{ErrorKind, Result};
use crate::extension::normalize;
use figment::Figment;
use figment::providers::{Format, Yaml};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};
use tracing::instrument;

/// A named import profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    source: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    folder: Option<String>,
}
impl Scenario {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self { source: source.into(), folder: None }
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    /// Source location, relative to whichever root (device) the operator
    /// picks. An absolute source ignores the chosen root entirely.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Destination sub-folder under the target root, if it differs from the
    /// scenario name.
    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }
}

#[derive(Deserialize)]
struct RawImportConfig {
    target_root: PathBuf,
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    scenarios: BTreeMap<String, Scenario>,
}

/// Validated import configuration.
///
/// Only constructible through [`new`](Self::new) or the loaders, all of which
/// validate; once built it is never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    target_root: PathBuf,
    include: BTreeSet<String>,
    exclude: BTreeSet<String>,
    scenarios: BTreeMap<String, Scenario>,
}
impl ImportConfig {
    pub fn new(
        target_root: impl Into<PathBuf>,
        include: impl IntoIterator<Item: AsRef<str>>,
        exclude: impl IntoIterator<Item: AsRef<str>>,
        scenarios: impl IntoIterator<Item = (impl Into<String>, Scenario)>,
    ) -> Result<Self> {
        let include: BTreeSet<String> = include.into_iter().map(|ext| normalize(ext.as_ref())).collect();
        let exclude: BTreeSet<String> = exclude.into_iter().map(|ext| normalize(ext.as_ref())).collect();
        let scenarios: BTreeMap<String, Scenario> =
            scenarios.into_iter().map(|(name, scenario)| (name.into(), scenario)).collect();

        if include.is_empty() {
            exn::bail!(ErrorKind::Invalid("`include` must list at least one extension".to_string()));
        }
        if include.contains("") {
            exn::bail!(ErrorKind::Invalid("`include` cannot contain an empty extension".to_string()));
        }
        if scenarios.is_empty() {
            exn::bail!(ErrorKind::Invalid("no scenarios configured".to_string()));
        }
        for (name, scenario) in &scenarios {
            validate_scenario(name, scenario)?;
        }
        let overlap: Vec<&String> = include.intersection(&exclude).collect();
        if !overlap.is_empty() {
            tracing::warn!(extensions = ?overlap, "Extensions listed in both include and exclude are treated as included");
        }

        Ok(Self { target_root: target_root.into(), include, exclude, scenarios })
    }

    /// Load and validate the import configuration from a YAML file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
        }
        Self::from_figment(&Figment::from(Yaml::file(path)))
    }

    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let raw: RawImportConfig = figment.extract().map_err(|e| ErrorKind::Parse(e.to_string()))?;
        Self::new(raw.target_root, raw.include, raw.exclude, raw.scenarios)
    }

    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    /// Extensions that are always expected, and always copied.
    pub fn include(&self) -> &BTreeSet<String> {
        &self.include
    }

    /// Extensions that are never copied but also never warned about.
    pub fn exclude(&self) -> &BTreeSet<String> {
        &self.exclude
    }

    pub fn scenarios(&self) -> &BTreeMap<String, Scenario> {
        &self.scenarios
    }

    pub fn scenario(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.get(name)
    }

    /// Where files for the named scenario end up.
    pub fn destination(&self, name: &str, scenario: &Scenario) -> PathBuf {
        self.target_root.join(scenario.folder().unwrap_or(name))
    }
}

/// Scenario names double as history file names, and folders as a single
/// directory under the target root: neither may contain path separators.
fn validate_scenario(name: &str, scenario: &Scenario) -> Result<()> {
    if !is_single_component(name) {
        exn::bail!(ErrorKind::Invalid(format!("scenario name `{name}` must be a plain name without separators")));
    }
    if scenario.source.as_os_str().is_empty() {
        exn::bail!(ErrorKind::Invalid(format!("scenario `{name}` has an empty source")));
    }
    if let Some(folder) = scenario.folder()
        && !is_single_component(folder)
    {
        exn::bail!(ErrorKind::Invalid(format!("scenario `{name}` folder `{folder}` must be a single directory name")));
    }
    Ok(())
}

fn is_single_component(value: &str) -> bool {
    let mut components = Path::new(value).components();
    matches!((components.next(), components.next()), (Some(Component::Normal(c)), None) if c == value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    const KITTENS: &str = r#"
target_root: /srv/photos
include: [JPG, .raw]
exclude: [db]
scenarios:
  kitten-import:
    source: DCIM/100CANON
  phone:
    source: /media/phone/DCIM
    folder: phone-camera
"#;

    fn kittens() -> ImportConfig {
        ImportConfig::from_figment(&Figment::from(Yaml::string(KITTENS))).unwrap()
    }

    #[test]
    fn test_loads_and_normalizes_extensions() {
        let config = kittens();
        assert_eq!(config.target_root(), Path::new("/srv/photos"));
        assert_eq!(config.include().iter().collect::<Vec<_>>(), ["jpg", "raw"]);
        assert_eq!(config.exclude().iter().collect::<Vec<_>>(), ["db"]);
        assert_eq!(config.scenarios().len(), 2);
    }

    #[test]
    fn test_destination_defaults_to_scenario_name() {
        let config = kittens();
        let kitten = config.scenario("kitten-import").unwrap();
        assert_eq!(config.destination("kitten-import", kitten), Path::new("/srv/photos/kitten-import"));
        let phone = config.scenario("phone").unwrap();
        assert_eq!(config.destination("phone", phone), Path::new("/srv/photos/phone-camera"));
    }

    #[test]
    fn test_unknown_scenario_is_none() {
        assert!(kittens().scenario("puppy-import").is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(KITTENS.as_bytes()).unwrap();
        let config = ImportConfig::load(file.path()).unwrap();
        assert_eq!(config, kittens());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImportConfig::load(dir.path().join("nope.yml")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[test]
    fn test_missing_target_root_is_parse_error() {
        let err = ImportConfig::from_figment(&Figment::from(Yaml::string("include: [jpg]"))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Parse(_)));
    }

    #[test]
    fn test_requires_a_scenario() {
        let scenarios: [(&str, Scenario); 0] = [];
        let err = ImportConfig::new("/srv", ["jpg"], ["db"], scenarios).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid(_)));
    }

    #[test]
    fn test_rejects_empty_include_extension() {
        let err = ImportConfig::new("/srv", ["."], [""; 0], [("a", Scenario::new("DCIM"))]).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid(_)));
    }

    #[test]
    fn test_rejects_empty_include() {
        let err = ImportConfig::new("/srv", [""; 0], ["db"], [("a", Scenario::new("DCIM"))]).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid(_)));
        let yaml = "target_root: /srv\nexclude: [db]\nscenarios:\n  a:\n    source: DCIM\n";
        let err = ImportConfig::from_figment(&Figment::from(Yaml::string(yaml))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid(_)));
    }

    #[test]
    fn test_overlap_is_allowed() {
        let config = ImportConfig::new("/srv", ["jpg", "db"], ["db"], [("a", Scenario::new("DCIM"))]).unwrap();
        assert!(config.include().contains("db"));
        assert!(config.exclude().contains("db"));
    }

    #[rstest]
    #[case("kittens", true)]
    #[case("kitten-import", true)]
    #[case("", false)]
    #[case(".", false)]
    #[case("..", false)]
    #[case("a/b", false)]
    #[case("/abs", false)]
    fn test_scenario_names(#[case] name: &str, #[case] valid: bool) {
        let result = ImportConfig::new("/srv", ["jpg"], [""; 0], [(name, Scenario::new("DCIM"))]);
        assert_eq!(result.is_ok(), valid);
    }

    #[rstest]
    #[case("camera", true)]
    #[case("../escape", false)]
    #[case("nested/folder", false)]
    fn test_scenario_folders(#[case] folder: &str, #[case] valid: bool) {
        let scenario = Scenario::new("DCIM").with_folder(folder);
        let result = ImportConfig::new("/srv", ["jpg"], [""; 0], [("cam", scenario)]);
        assert_eq!(result.is_ok(), valid);
    }
}
