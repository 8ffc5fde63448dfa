//! Populates the record store for requested dates.
//!
//! Records are a write-once cache: a date that already has a record is never
//! recomputed.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::record::DayAstroRecord;
use crate::storage::{CalendarConfig, RecordStore};

/// Outcome of a range load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    /// Records computed and inserted.
    pub created: u32,
    /// Dates that already had a record.
    pub skipped: u32,
    /// True when the batch limit stopped the load early.
    pub truncated: bool,
}

/// Computes and stores records on demand.
pub struct DataLoader<S> {
    store: S,
    calendar: CalendarConfig,
}

impl<S: RecordStore> DataLoader<S> {
    pub fn new(store: S, calendar: CalendarConfig) -> Self {
        Self { store, calendar }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Return the record for `date`, computing and storing it first if
    /// missing. The flag is true when a new record was created.
    pub fn load_date(&self, date: NaiveDate) -> Result<(DayAstroRecord, bool)> {
        self.calendar.check_year(date.year())?;

        if let Some(existing) = self.store.get(date)? {
            return Ok((existing, false));
        }

        let record = DayAstroRecord::compute(date);
        let created = self.store.insert(&record)?;
        tracing::debug!(date = %record.date_key(), status = record.status().as_i8(), "computed day record");
        Ok((record, created))
    }

    /// Fill every day of `year`, stopping after `limit` new records when a
    /// limit is given.
    pub fn load_year(&self, year: i32, limit: Option<u32>) -> Result<LoadSummary> {
        self.calendar.check_year(year)?;
        let start = first_of_month(year, 1)?;
        let end = first_of_month(year + 1, 1)?;
        let summary = self.load_range(start, end, limit)?;
        tracing::info!(
            year,
            created = summary.created,
            skipped = summary.skipped,
            truncated = summary.truncated,
            "year load finished"
        );
        Ok(summary)
    }

    /// Fill every day of one month.
    pub fn load_month(&self, year: i32, month: u32) -> Result<LoadSummary> {
        self.calendar.check_year(year)?;
        let start = first_of_month(year, month)?;
        let end = next_month(start)?;
        self.load_range(start, end, None)
    }

    /// Load `[start, end)` in date order.
    fn load_range(&self, start: NaiveDate, end: NaiveDate, limit: Option<u32>) -> Result<LoadSummary> {
        let mut summary = LoadSummary::default();

        for date in start.iter_days().take_while(|d| *d < end) {
            if limit.is_some_and(|limit| summary.created >= limit) {
                summary.truncated = true;
                break;
            }
            if self.store.get(date)?.is_some() {
                summary.skipped += 1;
                continue;
            }
            let record = DayAstroRecord::compute(date);
            if self.store.insert(&record)? {
                summary.created += 1;
            } else {
                summary.skipped += 1;
            }
        }

        Ok(summary)
    }
}

/// First day of `year`-`month`, validating the month.
pub fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, ValidationError> {
    if !(1..=12).contains(&month) {
        return Err(ValidationError::InvalidMonth(month));
    }
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| ValidationError::InvalidValue {
        field: "year".into(),
        message: format!("{year} is not a representable year"),
    })
}

/// First day of the month after `first`.
pub fn next_month(first: NaiveDate) -> Result<NaiveDate, ValidationError> {
    if first.month() == 12 {
        first_of_month(first.year() + 1, 1)
    } else {
        first_of_month(first.year(), first.month() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::storage::MemoryStore;

    fn loader() -> DataLoader<MemoryStore> {
        DataLoader::new(MemoryStore::new(), CalendarConfig::default())
    }

    #[test]
    fn load_date_creates_once() {
        let loader = loader();
        let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();

        let (first, created) = loader.load_date(date).unwrap();
        assert!(created);
        let (second, created) = loader.load_date(date).unwrap();
        assert!(!created);
        assert_eq!(first, second);
        assert_eq!(loader.store().len(), 1);
    }

    #[test]
    fn load_year_fills_every_day() {
        let loader = loader();
        let summary = loader.load_year(2024, None).unwrap();
        assert_eq!(summary.created, 366);
        assert_eq!(summary.skipped, 0);
        assert!(!summary.truncated);

        let again = loader.load_year(2024, None).unwrap();
        assert_eq!(again.created, 0);
        assert_eq!(again.skipped, 366);
    }

    #[test]
    fn batch_limit_resumes_where_it_stopped() {
        let loader = loader();
        let first = loader.load_year(2025, Some(30)).unwrap();
        assert_eq!(first.created, 30);
        assert!(first.truncated);
        assert_eq!(loader.store().get_by_month_prefix("2025-01").unwrap().len(), 30);

        let second = loader.load_year(2025, Some(30)).unwrap();
        assert_eq!(second.created, 30);
        assert_eq!(second.skipped, 30);
        assert_eq!(loader.store().len(), 60);
    }

    #[test]
    fn load_month_handles_december() {
        let loader = loader();
        let summary = loader.load_month(2024, 12).unwrap();
        assert_eq!(summary.created, 31);
        assert_eq!(loader.store().get_by_month_prefix("2025").unwrap().len(), 0);
    }

    #[test]
    fn rejects_out_of_range_input() {
        let loader = loader();
        assert!(matches!(
            loader.load_year(1850, None),
            Err(CoreError::Validation(ValidationError::YearOutOfRange { year: 1850, .. }))
        ));
        assert!(matches!(
            loader.load_month(2024, 13),
            Err(CoreError::Validation(ValidationError::InvalidMonth(13)))
        ));
        let date = NaiveDate::from_ymd_opt(2099, 1, 1).unwrap();
        assert!(loader.load_date(date).is_err());
        assert!(loader.store().is_empty());
    }
}
