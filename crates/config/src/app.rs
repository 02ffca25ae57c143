//! Per-machine application settings.
//!
//! Layered with [`figment`]: built-in defaults (derived from the platform's
//! standard directories), then the YAML settings file, then `PHOTO_IMPORT_*`
//! environment variables (`__` separates nested keys, so
//! `PHOTO_IMPORT_HISTORY__MAX_ENTRIES=20` sets `history.max_entries`).

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::instrument;

pub const APP_NAME: &str = "photo-import";
pub const ENV_PREFIX: &str = "PHOTO_IMPORT_";
pub const DEFAULT_HISTORY_ENTRIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Directory holding one history file per scenario.
    pub dir: PathBuf,
    /// How many past sessions to remember per scenario.
    pub max_entries: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the import configuration (see [`ImportConfig`](crate::ImportConfig)).
    pub user_config: PathBuf,
    /// Explicit path to the rclone executable; looked up on `PATH` otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rclone: Option<PathBuf>,
    pub history: HistorySettings,
}
impl AppConfig {
    /// Default location of the application settings file.
    pub fn default_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.yml"))
    }

    /// Defaults rooted at the given configuration and data directories.
    pub fn defaults(config_dir: &Path, data_dir: &Path) -> Self {
        Self {
            user_config: config_dir.join("import.yml"),
            rclone: None,
            history: HistorySettings {
                dir: data_dir.join("history"),
                max_entries: DEFAULT_HISTORY_ENTRIES,
            },
        }
    }

    /// Load settings from `path` (or the default location). A missing
    /// settings file is fine: defaults and the environment still apply.
    #[instrument(skip_all)]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let dirs = project_dirs()?;
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => dirs.config_dir().join("config.yml"),
        };
        tracing::debug!(path = %path.display(), exists = path.is_file(), "Loading application settings");
        let figment = Figment::from(Serialized::defaults(Self::defaults(dirs.config_dir(), dirs.data_dir())))
            .merge(Yaml::file(&path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::from_figment(&figment)
    }

    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let config: Self = figment.extract().map_err(|e| ErrorKind::Parse(e.to_string()))?;
        if config.history.max_entries == 0 {
            exn::bail!(ErrorKind::Invalid("history.max_entries must be at least 1".to_string()));
        }
        Ok(config)
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    match ProjectDirs::from("", "", APP_NAME) {
        Some(dirs) => Ok(dirs),
        None => exn::bail!(ErrorKind::NoConfigDirectory),
    }
}
