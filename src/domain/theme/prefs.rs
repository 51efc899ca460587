//! Persisted user preferences. One JSON file, one key: `theme`.

use super::Theme;
use crate::error::PrefsError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const PREFS_FILE: &str = "preferences.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
}

impl Preferences {
    /// Platform config location, e.g. `~/.config/market-calendar/preferences.json`.
    pub fn default_path() -> Result<PathBuf, PrefsError> {
        let dirs = ProjectDirs::from("", "", "market-calendar").ok_or(PrefsError::NoConfigDir)?;
        Ok(dirs.config_dir().join(PREFS_FILE))
    }

    /// Load from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, PrefsError> {
        match fs::read(path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no preferences file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Like [`Preferences::load_from`], but a corrupt file is logged and replaced by defaults.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable preferences");
            Self::default()
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PrefsError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_vec_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        tracing::debug!(path = %path.display(), theme = self.theme.as_str(), "preferences saved");
        Ok(())
    }
}
