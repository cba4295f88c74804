pub mod theme;

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration as StdDuration,
};

use chrono::Duration;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::core::services::{
    DEFAULT_DUPLICATE_WINDOW_SECS, DEFAULT_REPORT_WINDOW_DAYS, DEFAULT_SYNC_DELAY_MS,
    MAX_REPORT_WINDOW_DAYS,
};
use crate::core::utils::{app_data_dir, config_file_in, ensure_dir, write_json_atomic};
use crate::currency::LocaleConfig;
use crate::errors::{ExpenseError, Result};

pub use theme::{ThemeMode, ThemePreferences, THEME_MODE_KEY};

const DEFAULT_TIME_ZONE: &str = "Asia/Kolkata";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    pub time_zone: String,
    pub duplicate_window_secs: i64,
    pub report_window_days: u32,
    pub sync_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        let locale = LocaleConfig::default();
        Self {
            locale: locale.language_tag,
            currency: locale.currency_code,
            time_zone: DEFAULT_TIME_ZONE.into(),
            duplicate_window_secs: DEFAULT_DUPLICATE_WINDOW_SECS,
            report_window_days: DEFAULT_REPORT_WINDOW_DAYS,
            sync_delay_ms: DEFAULT_SYNC_DELAY_MS,
        }
    }
}

impl Config {
    /// Parses the configured IANA zone name.
    pub fn zone(&self) -> Result<Tz> {
        self.time_zone
            .parse::<Tz>()
            .map_err(|_| ExpenseError::Config(format!("unknown time zone `{}`", self.time_zone)))
    }

    pub fn duplicate_window(&self) -> Duration {
        Duration::seconds(self.duplicate_window_secs.max(0))
    }

    pub fn report_window(&self) -> Result<u32> {
        if self.report_window_days > MAX_REPORT_WINDOW_DAYS {
            return Err(ExpenseError::Config(format!(
                "report_window_days must be at most {MAX_REPORT_WINDOW_DAYS}, got {}",
                self.report_window_days
            )));
        }
        Ok(self.report_window_days)
    }

    pub fn sync_delay(&self) -> StdDuration {
        StdDuration::from_millis(self.sync_delay_ms)
    }

    /// Only the en-IN rupee layout ships; other tags are refused.
    pub fn locale_config(&self) -> Result<LocaleConfig> {
        let locale = LocaleConfig::default();
        if !self.locale.eq_ignore_ascii_case(&locale.language_tag)
            || !self.currency.eq_ignore_ascii_case(&locale.currency_code)
        {
            return Err(ExpenseError::Config(format!(
                "unsupported locale `{}` / currency `{}`",
                self.locale, self.currency
            )));
        }
        Ok(locale)
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    /// Defaults are returned when no file exists yet; nothing is written.
    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.zone()?;
        config.report_window()?;
        let json = serde_json::to_string_pretty(config)?;
        write_json_atomic(&self.path, &json)?;
        tracing::debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
