//! # Preferences
//!
//! Two string preferences survive restarts: the color mode and the
//! display mode. Views never touch storage directly; they get a
//! `&mut dyn PreferenceStore` through the routing environment so tests can
//! hand in a [`MemoryPreferences`].
//!
//! | key            | default    | values                  |
//! |----------------|------------|-------------------------|
//! | `color-mode`   | `auto`     | `auto`, `light`, `dark` |
//! | `display-mode` | `consumer` | `consumer`, `maintainer`|

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use log::{debug, warn};

pub const COLOR_MODE: &str = "color-mode";
pub const DISPLAY_MODE: &str = "display-mode";

pub const COLOR_MODES: &[&str] = &["auto", "light", "dark"];
pub const DISPLAY_MODES: &[&str] = &["consumer", "maintainer"];

/// Documented default for a preference key.
pub fn default_value(key: &str) -> Option<&'static str> {
    match key {
        COLOR_MODE => Some("auto"),
        DISPLAY_MODE => Some("consumer"),
        _ => None,
    }
}

#[derive(Debug)]
pub enum PrefsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for PrefsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefsError::Io(e) => write!(f, "preferences I/O error: {e}"),
            PrefsError::Parse(e) => write!(f, "preferences parse error: {e}"),
        }
    }
}

impl std::error::Error for PrefsError {}

/// String key-value store for user preferences.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store, used by tests and when no home directory exists.
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferences {
    values: BTreeMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// JSON file store at `~/.bcr/preferences.json`.
///
/// Writes go through a `.tmp` file and `rename()`. A failed write is
/// logged; the in-memory value still updates.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePreferences {
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".bcr").join("preferences.json"))
    }

    /// Open the store, starting empty if the file does not exist yet.
    pub fn open(path: PathBuf) -> Result<Self, PrefsError> {
        let values = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(PrefsError::Io)?;
            serde_json::from_str(&contents).map_err(PrefsError::Parse)?
        } else {
            BTreeMap::new()
        };
        debug!("Loaded {} preferences from {}", values.len(), path.display());
        Ok(Self { path, values })
    }

    fn save(&self) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(PrefsError::Io)?;
        }
        let json = serde_json::to_string_pretty(&self.values).map_err(PrefsError::Parse)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(PrefsError::Io)?;
        fs::rename(&tmp, &self.path).map_err(PrefsError::Io)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        if let Err(e) = self.save() {
            warn!("Failed to persist preference {}: {}", key, e);
        }
    }
}

/// The value after `current` in `values`, wrapping around.
pub fn next_value<'a>(values: &[&'a str], current: &str) -> &'a str {
    let idx = values.iter().position(|v| *v == current).unwrap_or(0);
    values[(idx + 1) % values.len()]
}
