//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Daily reminder toggle and time
//! - Supported calendar year range
//! - Loader batch limit
//! - Day colors for favorable and unfavorable days
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, Result, ValidationError};

/// Daily reminder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemindersConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Local time of day, `HH:MM`.
    #[serde(default = "default_reminder_time")]
    pub time: String,
}

/// Range of years the calendar accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_min_year")]
    pub min_year: i32,
    #[serde(default = "default_max_year")]
    pub max_year: i32,
}

/// Year loader configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Stop a year load after this many new records. Unlimited when unset.
    #[serde(default)]
    pub batch_limit: Option<u32>,
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_favorable_color")]
    pub favorable_color: String,
    #[serde(default = "default_unfavorable_color")]
    pub unfavorable_color: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reminders: RemindersConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

fn default_reminder_time() -> String {
    "07:30".into()
}
fn default_min_year() -> i32 {
    1900
}
fn default_max_year() -> i32 {
    2050
}
fn default_favorable_color() -> String {
    "#4CAF50".into()
}
fn default_unfavorable_color() -> String {
    "#F44336".into()
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            time: default_reminder_time(),
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            min_year: default_min_year(),
            max_year: default_max_year(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            favorable_color: default_favorable_color(),
            unfavorable_color: default_unfavorable_color(),
        }
    }
}

impl CalendarConfig {
    /// Reject years outside `min_year..=max_year`.
    pub fn check_year(&self, year: i32) -> Result<(), ValidationError> {
        if (self.min_year..=self.max_year).contains(&year) {
            Ok(())
        } else {
            Err(ValidationError::YearOutOfRange {
                year,
                min: self.min_year,
                max: self.max_year,
            })
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                // Optional numeric fields are null when unset.
                serde_json::Value::Number(_) | serde_json::Value::Null => match value {
                    "" | "none" | "null" => serde_json::Value::Null,
                    _ => value
                        .parse::<i64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                },
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                serde_json::Value::String(_) => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the
    /// defaults cannot be written.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// or fails validation. The config is unchanged on error.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Parsed reminder time.
    pub fn reminder_time(&self) -> Result<NaiveTime, ConfigError> {
        NaiveTime::parse_from_str(&self.reminders.time, "%H:%M").map_err(|e| {
            ConfigError::InvalidValue {
                key: "reminders.time".into(),
                message: format!("'{}': {e}", self.reminders.time),
            }
        })
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.reminder_time()?;
        if self.calendar.min_year > self.calendar.max_year {
            return Err(ConfigError::InvalidValue {
                key: "calendar.min_year".into(),
                message: format!(
                    "min_year {} is after max_year {}",
                    self.calendar.min_year, self.calendar.max_year
                ),
            });
        }
        for (key, color) in [
            ("ui.favorable_color", &self.ui.favorable_color),
            ("ui.unfavorable_color", &self.ui.unfavorable_color),
        ] {
            if !is_hex_color(color) {
                return Err(ConfigError::InvalidValue {
                    key: key.into(),
                    message: format!("'{color}' is not a #RRGGBB color"),
                });
            }
        }
        Ok(())
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}
