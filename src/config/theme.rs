//! Persisted light/dark preference.
//!
//! Settings live in a flat JSON object of string keys and string values, so other
//! display preferences can share the file without a schema change.

use std::{
    collections::BTreeMap,
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::core::utils::{app_data_dir, settings_file_in, write_json_atomic};
use crate::errors::{ExpenseError, Result};

pub const THEME_MODE_KEY: &str = "theme_mode";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThemeMode {
    #[default]
    System,
    Light,
    Dark,
}

impl ThemeMode {
    pub const ALL: [ThemeMode; 3] = [ThemeMode::System, ThemeMode::Light, ThemeMode::Dark];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::System => "System",
            ThemeMode::Light => "Light",
            ThemeMode::Dark => "Dark",
        }
    }

    /// Missing or unrecognised stored values read as `System`.
    pub fn from_stored(value: Option<&str>) -> Self {
        value.and_then(|raw| raw.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = ExpenseError;

    fn from_str(s: &str) -> Result<Self> {
        ThemeMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ExpenseError::Config(format!("unknown theme mode `{s}`")))
    }
}

pub struct ThemePreferences {
    path: PathBuf,
    current: watch::Sender<ThemeMode>,
}

impl ThemePreferences {
    pub fn new() -> Result<Self> {
        Self::open(settings_file_in(&app_data_dir()))
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = read_settings(&path)?;
        let mode = ThemeMode::from_stored(settings.get(THEME_MODE_KEY).map(String::as_str));
        let (current, _) = watch::channel(mode);
        Ok(Self { path, current })
    }

    pub fn mode(&self) -> ThemeMode {
        *self.current.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemeMode> {
        self.current.subscribe()
    }

    /// Persists `mode`, keeping any other keys in the settings file.
    pub fn set_mode(&self, mode: ThemeMode) -> Result<()> {
        let mut settings = read_settings(&self.path)?;
        settings.insert(THEME_MODE_KEY.to_string(), mode.as_str().to_string());
        write_json_atomic(&self.path, &serde_json::to_string_pretty(&settings)?)?;
        tracing::info!(%mode, "theme preference saved");
        self.current.send_replace(mode);
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_settings(path: &Path) -> Result<BTreeMap<String, String>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let data = fs::read_to_string(path)?;
    match serde_json::from_str(&data) {
        Ok(settings) => Ok(settings),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable settings file");
            Ok(BTreeMap::new())
        }
    }
}
