//! SQLite-backed record store.
//!
//! One row per calendar date in `moon_info`, plus a small key-value table
//! for application state such as the last reminder sent.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{data_dir, migrations, RecordStore};
use crate::error::{DatabaseError, Result};
use crate::record::{date_key, DayAstroRecord, StoredRecord, DATE_FORMAT};
use crate::scoring::DayStatus;

const SELECT_COLUMNS: &str =
    "SELECT date, phase_name, is_waxing, illumination, lunar_day, zodiac_sign, status FROM moon_info";

/// Raw column values, converted to a record outside the rusqlite closure.
struct RawRecord {
    date: String,
    phase_name: String,
    is_waxing: bool,
    illumination: f64,
    lunar_day: u8,
    zodiac_sign: String,
    status: i8,
}

impl RawRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            date: row.get(0)?,
            phase_name: row.get(1)?,
            is_waxing: row.get(2)?,
            illumination: row.get(3)?,
            lunar_day: row.get(4)?,
            zodiac_sign: row.get(5)?,
            status: row.get(6)?,
        })
    }

    fn into_record(self) -> Result<DayAstroRecord, DatabaseError> {
        let corrupt = |message: String| DatabaseError::CorruptRecord {
            date: self.date.clone(),
            message,
        };

        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
            .map_err(|e| corrupt(e.to_string()))?;
        let phase_name = self.phase_name.parse().map_err(corrupt)?;
        let zodiac_sign = self.zodiac_sign.parse().map_err(corrupt)?;
        let status = DayStatus::try_from(self.status).map_err(corrupt)?;

        DayAstroRecord::try_from(StoredRecord {
            date,
            phase_name,
            is_waxing: self.is_waxing,
            illumination: self.illumination,
            lunar_day: self.lunar_day,
            zodiac_sign,
            status,
        })
        .map_err(corrupt)
    }
}

/// SQLite database holding day records.
pub struct MoonDb {
    conn: Connection,
}

impl MoonDb {
    /// Open the database at `<data_dir>/trimmoon.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("trimmoon.db"))
    }

    /// Open (or create) a database file at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Number of stored records.
    pub fn count(&self) -> Result<u64> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM moon_info", [], |row| row.get(0))?;
        Ok(n as u64)
    }

    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

impl RecordStore for MoonDb {
    fn get(&self, date: NaiveDate) -> Result<Option<DayAstroRecord>> {
        let raw = self
            .conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE date = ?1"),
                params![date_key(date)],
                RawRecord::from_row,
            )
            .optional()?;

        match raw {
            Some(raw) => Ok(Some(raw.into_record()?)),
            None => Ok(None),
        }
    }

    fn insert(&self, record: &DayAstroRecord) -> Result<bool> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO moon_info
                (date, phase_name, is_waxing, illumination, lunar_day, zodiac_sign, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.date_key(),
                record.phase_name().name(),
                record.is_waxing(),
                record.illumination(),
                record.lunar_day(),
                record.zodiac_sign().name(),
                record.status().as_i8(),
            ],
        )?;
        Ok(changed == 1)
    }

    fn get_by_month_prefix(&self, prefix: &str) -> Result<Vec<DayAstroRecord>> {
        // Literal match: `_` and `%` in the prefix are not wildcards.
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE substr(date, 1, length(?1)) = ?1 ORDER BY date"
        ))?;
        let rows = stmt.query_map(params![prefix], RawRecord::from_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record()?);
        }
        Ok(records)
    }
}
