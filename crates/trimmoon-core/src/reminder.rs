//! Daily favorable-day reminder.
//!
//! Once a day at the configured time the reminder looks up today's record
//! and produces a notification only when the day is favorable.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::DayAstroRecord;
use crate::scoring::DayStatus;
use crate::storage::RecordStore;

/// Key under which the last reminder date is kept.
pub const LAST_REMINDER_KEY: &str = "last_reminder_date";

/// A notification to show the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub date: NaiveDate,
    pub title: String,
    pub body: String,
}

impl Reminder {
    fn favorable(record: &DayAstroRecord) -> Self {
        Self {
            date: record.date(),
            title: "Favorable day".to_string(),
            body: format!(
                "{} is a favorable day: {}, lunar day {}, moon in {}.",
                record.date_key(),
                record.phase_name(),
                record.lunar_day(),
                record.zodiac_sign()
            ),
        }
    }
}

/// Next time the reminder should fire.
///
/// Today at `at`, unless `now` is already past it, in which case tomorrow.
pub fn next_reminder_at(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let target = now.date().and_time(at);
    if now > target {
        target + Duration::days(1)
    } else {
        target
    }
}

/// Wall-clock delay from `now` until the next reminder.
pub fn delay_until_next(now: NaiveDateTime, at: NaiveTime) -> std::time::Duration {
    (next_reminder_at(now, at) - now)
        .to_std()
        .unwrap_or_default()
}

/// Reminder for `today`, if its stored record is favorable.
///
/// Missing records produce no reminder; callers load the day first.
pub fn check_today<S: RecordStore>(store: &S, today: NaiveDate) -> Result<Option<Reminder>> {
    let Some(record) = store.get(today)? else {
        tracing::debug!(%today, "no record for today, skipping reminder");
        return Ok(None);
    };

    if record.status() == DayStatus::Favorable {
        tracing::info!(%today, "favorable day, sending reminder");
        Ok(Some(Reminder::favorable(&record)))
    } else {
        tracing::debug!(%today, status = record.status().as_i8(), "not a favorable day");
        Ok(None)
    }
}

/// Whether a reminder for `today` is still due given the last one sent.
pub fn is_due(last_sent: Option<NaiveDate>, today: NaiveDate) -> bool {
    last_sent.map_or(true, |last| last < today)
}
