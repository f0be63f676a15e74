//! Persistent application settings (flat JSON file, human-editable).
//!
//! Three keys are interpreted: `language`, `interval`, `muted`. Anything else
//! found in the file is carried in [`Settings::extra`] and written back
//! verbatim, so a newer build's keys survive a round-trip through an older
//! one.
//!
//! A corrupt or missing file is never fatal: the store falls back to the
//! baseline defaults and rewrites the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{error, info, warn};

/// Baseline language code (asset subdirectory name).
pub const DEFAULT_LANGUAGE: &str = "en";
/// Baseline announcement cadence in minutes.
pub const DEFAULT_INTERVAL_MINUTES: u32 = 60;

/// The persisted settings record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Spoken language — an opaque asset-directory code ("en", "bn").
    pub language: String,
    /// Announcement cadence in minutes. The configuration surface offers
    /// 15/30/60; the engine tolerates any positive divisor of 60.
    pub interval: u32,
    /// Suppresses announcements without stopping the tick source.
    pub muted: bool,
    /// Keys this build does not interpret, preserved across load/save.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.into(),
            interval: DEFAULT_INTERVAL_MINUTES,
            muted: false,
            extra: Map::new(),
        }
    }
}

/// Settings bound to their file on disk.
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

/// Shared handle used by the announcer and the host's control surface.
/// All parties run on (or marshal onto) the same control thread, so the
/// mutex is uncontended in practice.
pub type SharedSettings = Arc<Mutex<SettingsStore>>;

impl SettingsStore {
    /// Load settings from `path`, creating the file with defaults if it does
    /// not exist. A file that fails to parse is logged, discarded, and
    /// overwritten with defaults — configuration corruption is recoverable,
    /// never fatal.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let settings = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Settings>(&raw) {
                Ok(settings) => {
                    info!("settings loaded from {}", path.display());
                    return Self { path, settings };
                }
                Err(e) => {
                    warn!(
                        "settings file {} is corrupt ({e}), resetting to defaults",
                        path.display()
                    );
                    Settings::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("no settings file, creating defaults at {}", path.display());
                Settings::default()
            }
            Err(e) => {
                warn!(
                    "could not read settings file {} ({e}), using defaults",
                    path.display()
                );
                Settings::default()
            }
        };

        let store = Self { path, settings };
        store.save();
        store
    }

    /// Wrap an in-memory record without touching disk. Used by hosts that
    /// manage persistence themselves, and by tests.
    pub fn with_settings(path: impl Into<PathBuf>, settings: Settings) -> Self {
        Self {
            path: path.into(),
            settings,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn language(&self) -> &str {
        &self.settings.language
    }

    pub fn interval_minutes(&self) -> u32 {
        self.settings.interval
    }

    pub fn muted(&self) -> bool {
        self.settings.muted
    }

    /// Set the spoken language. With `persist`, the full record is written
    /// to disk immediately; without, the change stays in memory until
    /// [`save`](Self::save) — the settings dialog batches its fields this way
    /// to avoid partial writes.
    pub fn set_language(&mut self, language: impl Into<String>, persist: bool) -> bool {
        self.settings.language = language.into();
        !persist || self.save()
    }

    pub fn set_interval(&mut self, minutes: u32, persist: bool) -> bool {
        self.settings.interval = minutes;
        !persist || self.save()
    }

    pub fn set_muted(&mut self, muted: bool, persist: bool) -> bool {
        self.settings.muted = muted;
        !persist || self.save()
    }

    /// Write the full current record to disk, creating parent directories as
    /// needed. The write is a whole-file overwrite with a stable field order
    /// so diffs stay readable. Returns `false` (and logs) on failure; the
    /// in-memory record remains authoritative either way.
    pub fn save(&self) -> bool {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("could not create {} ({e})", parent.display());
                return false;
            }
        }

        let json = match serde_json::to_string_pretty(&self.settings) {
            Ok(json) => json,
            Err(e) => {
                error!("could not serialize settings ({e})");
                return false;
            }
        };

        match fs::write(&self.path, json) {
            Ok(()) => {
                info!("settings saved to {}", self.path.display());
                true
            }
            Err(e) => {
                error!("could not save settings to {} ({e})", self.path.display());
                false
            }
        }
    }
}
