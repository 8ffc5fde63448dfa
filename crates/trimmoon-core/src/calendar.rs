//! Month views over stored records.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::loader::{first_of_month, next_month};
use crate::record::DayAstroRecord;
use crate::scoring::DayStatus;
use crate::storage::{RecordStore, UiConfig};

/// Everything needed to color one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    /// Stored records for the month, ordered by date. Days with no record
    /// yet are absent.
    pub records: Vec<DayAstroRecord>,
    /// Day-of-month numbers classified favorable.
    pub favorable_days: BTreeSet<u32>,
    /// Day-of-month numbers classified unfavorable.
    pub unfavorable_days: BTreeSet<u32>,
    pub favorable_color: String,
    pub unfavorable_color: String,
}

impl MonthView {
    /// Read the month's records from `store`.
    pub fn build<S: RecordStore>(store: &S, year: i32, month: u32, ui: &UiConfig) -> Result<Self> {
        first_of_month(year, month)?;
        let records = store.get_by_month_prefix(&format!("{year:04}-{month:02}"))?;

        let days_with = |status: DayStatus| -> BTreeSet<u32> {
            records
                .iter()
                .filter(|r| r.status() == status)
                .map(|r| r.date().day())
                .collect()
        };
        let favorable_days = days_with(DayStatus::Favorable);
        let unfavorable_days = days_with(DayStatus::Unfavorable);

        Ok(Self {
            year,
            month,
            records,
            favorable_days,
            unfavorable_days,
            favorable_color: ui.favorable_color.clone(),
            unfavorable_color: ui.unfavorable_color.clone(),
        })
    }

    /// Status for a day of the month, if a record exists.
    pub fn status_of(&self, day: u32) -> Option<DayStatus> {
        self.records
            .iter()
            .find(|r| r.date().day() == day)
            .map(DayAstroRecord::status)
    }

    /// Monday-first text grid. Each day is followed by `+` (favorable),
    /// `-` (unfavorable), `.` (neutral) or a blank when not yet loaded.
    pub fn render(&self) -> String {
        let (Ok(first), Ok(days)) = (
            first_of_month(self.year, self.month),
            days_in_month(self.year, self.month),
        ) else {
            return String::new();
        };

        let mut out = String::new();
        let _ = writeln!(out, "{:^28}", first.format("%B %Y").to_string());
        out.push_str(" Mo  Tu  We  Th  Fr  Sa  Su\n");

        let offset = first.weekday().num_days_from_monday() as usize;
        out.push_str(&"    ".repeat(offset));

        for day in 1..=days {
            let marker = match self.status_of(day) {
                Some(DayStatus::Favorable) => '+',
                Some(DayStatus::Unfavorable) => '-',
                Some(DayStatus::Neutral) => '.',
                None => ' ',
            };
            let _ = write!(out, "{day:>3}{marker}");
            if (offset + day as usize) % 7 == 0 {
                out.push('\n');
            }
        }
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    }
}

/// Human-readable summary of one record.
pub fn day_info(record: &DayAstroRecord) -> String {
    format!(
        "Date: {}\nStatus: {}\nPhase: {}\nWaxing: {}\nIllumination: {:.0}%\nLunar day: {}\nZodiac sign: {}",
        record.date_key(),
        record.status(),
        record.phase_name(),
        if record.is_waxing() { "yes" } else { "no" },
        record.illumination() * 100.0,
        record.lunar_day(),
        record.zodiac_sign(),
    )
}

/// Number of days in `year`-`month`.
pub fn days_in_month(year: i32, month: u32) -> Result<u32> {
    let first = first_of_month(year, month)?;
    let next = next_month(first)?;
    Ok(next.signed_duration_since(first).num_days() as u32)
}
