mod config;
pub mod database;
pub mod memory;
pub mod migrations;

pub use config::{CalendarConfig, Config, LoaderConfig, RemindersConfig, UiConfig};
pub use database::MoonDb;
pub use memory::MemoryStore;

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::Result;
use crate::record::DayAstroRecord;

/// Write-once, date-keyed record storage.
///
/// Implementations never update or delete a record once inserted.
pub trait RecordStore {
    /// Look up the record for `date`.
    fn get(&self, date: NaiveDate) -> Result<Option<DayAstroRecord>>;

    /// Insert a record. Returns `false` and leaves the existing row
    /// untouched when the date already has one.
    fn insert(&self, record: &DayAstroRecord) -> Result<bool>;

    /// All records whose key starts with `prefix` (e.g. `2024-03`), ordered
    /// by date.
    fn get_by_month_prefix(&self, prefix: &str) -> Result<Vec<DayAstroRecord>>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn get(&self, date: NaiveDate) -> Result<Option<DayAstroRecord>> {
        (**self).get(date)
    }

    fn insert(&self, record: &DayAstroRecord) -> Result<bool> {
        (**self).insert(record)
    }

    fn get_by_month_prefix(&self, prefix: &str) -> Result<Vec<DayAstroRecord>> {
        (**self).get_by_month_prefix(prefix)
    }
}

/// Returns the data directory, creating it if needed.
///
/// `TRIMMOON_DATA_DIR` wins when set; otherwise `~/.config/trimmoon`, or
/// `~/.config/trimmoon-dev` with `TRIMMOON_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("TRIMMOON_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("TRIMMOON_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("trimmoon-dev")
            } else {
                base_dir.join("trimmoon")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
