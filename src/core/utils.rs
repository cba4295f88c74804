use dirs::home_dir;
use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::errors::ExpenseError;

const DEFAULT_DIR_NAME: &str = ".expense_core";
const DATA_DIR: &str = "data";
const CONFIG_DIR: &str = "config";
const EXPENSES_FILE: &str = "expenses.json";
const CONFIG_FILE: &str = "config.json";
const SETTINGS_FILE: &str = "settings.json";
const EXPORTS_DIR: &str = "exports";
const TMP_SUFFIX: &str = "tmp";

/// Environment variable overriding the application data directory.
pub const HOME_ENV: &str = "EXPENSE_CORE_HOME";

/// Returns the application-specific data directory, defaulting to `~/.expense_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Path of the expense document inside `base`.
pub fn expenses_file_in(base: &Path) -> PathBuf {
    base.join(DATA_DIR).join(EXPENSES_FILE)
}

pub fn expenses_file() -> PathBuf {
    expenses_file_in(&app_data_dir())
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Key-value preferences (theme and similar display settings).
pub fn settings_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_DIR).join(SETTINGS_FILE)
}

pub fn exports_dir_in(base: &Path) -> PathBuf {
    base.join(EXPORTS_DIR)
}

pub fn ensure_dir(path: &Path) -> Result<(), ExpenseError> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Writes `data` next to `path` and renames it into place.
pub fn write_json_atomic(path: &Path, data: &str) -> Result<(), ExpenseError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}
