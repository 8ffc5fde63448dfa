//! The per-date record persisted by the store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::lunar::{self, MoonEstimate, MoonPhase, ZodiacSign};
use crate::scoring::{self, DayStatus, ScoreBreakdown, ScoreInput};

/// Date format used for record keys.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Lunar and astrological data for one calendar date.
///
/// Records are immutable once computed; `status` is always the scorer's
/// verdict over the other fields and the date's weekday. Values read back
/// from storage or JSON go through [`StoredRecord`] and are rejected when
/// that no longer holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredRecord")]
pub struct DayAstroRecord {
    date: NaiveDate,
    phase_name: MoonPhase,
    is_waxing: bool,
    illumination: f64,
    lunar_day: u8,
    zodiac_sign: ZodiacSign,
    status: DayStatus,
}

/// Field values of a record as persisted, before consistency checks.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredRecord {
    pub date: NaiveDate,
    pub phase_name: MoonPhase,
    pub is_waxing: bool,
    pub illumination: f64,
    pub lunar_day: u8,
    pub zodiac_sign: ZodiacSign,
    pub status: DayStatus,
}

impl TryFrom<StoredRecord> for DayAstroRecord {
    type Error = String;

    fn try_from(stored: StoredRecord) -> Result<Self, Self::Error> {
        if !(1..=30).contains(&stored.lunar_day) {
            return Err(format!("lunar day {} out of range", stored.lunar_day));
        }

        let record = Self {
            date: stored.date,
            phase_name: stored.phase_name,
            is_waxing: stored.is_waxing,
            illumination: stored.illumination,
            lunar_day: stored.lunar_day,
            zodiac_sign: stored.zodiac_sign,
            status: stored.status,
        };
        let expected = record.breakdown().status;
        if record.status != expected {
            return Err(format!(
                "stored status {} does not match computed status {}",
                record.status.as_i8(),
                expected.as_i8()
            ));
        }
        Ok(record)
    }
}

impl DayAstroRecord {
    /// Estimate and score `date`.
    pub fn compute(date: NaiveDate) -> Self {
        Self::from_estimate(&lunar::estimate(date))
    }

    pub fn from_estimate(estimate: &MoonEstimate) -> Self {
        let status = scoring::score(&ScoreInput::from_estimate(estimate));
        Self {
            date: estimate.date,
            phase_name: estimate.phase,
            is_waxing: estimate.is_waxing,
            illumination: estimate.illumination,
            lunar_day: estimate.lunar_day,
            zodiac_sign: estimate.zodiac_sign,
            status,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn phase_name(&self) -> MoonPhase {
        self.phase_name
    }

    pub fn is_waxing(&self) -> bool {
        self.is_waxing
    }

    /// Illuminated fraction, 0.0 to 1.0.
    pub fn illumination(&self) -> f64 {
        self.illumination
    }

    pub fn lunar_day(&self) -> u8 {
        self.lunar_day
    }

    pub fn zodiac_sign(&self) -> ZodiacSign {
        self.zodiac_sign
    }

    pub fn status(&self) -> DayStatus {
        self.status
    }

    /// `YYYY-MM-DD` store key.
    pub fn date_key(&self) -> String {
        date_key(self.date)
    }

    pub fn score_input(&self) -> ScoreInput {
        use chrono::Datelike;

        ScoreInput {
            phase: self.phase_name,
            is_waxing: self.is_waxing,
            lunar_day: self.lunar_day,
            zodiac_sign: self.zodiac_sign,
            weekday: self.date.weekday(),
        }
    }

    /// Re-derive the score breakdown from the stored fields.
    pub fn breakdown(&self) -> ScoreBreakdown {
        scoring::explain(&self.score_input())
    }
}

/// Format a date as a store key.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` string from user input.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_scores_the_estimate() {
        let date = NaiveDate::from_ymd_opt(2000, 1, 6).unwrap();
        let record = DayAstroRecord::compute(date);
        assert_eq!(record.phase_name(), MoonPhase::LastQuarter);
        assert_eq!(record.lunar_day(), 1);
        assert_eq!(record.zodiac_sign(), ZodiacSign::Capricorn);
        // Capricorn +2, waning 0, day 1 0, Thursday +1
        assert_eq!(record.breakdown().total, 3);
        assert_eq!(record.status(), DayStatus::Favorable);
    }

    #[test]
    fn status_matches_breakdown() {
        let mut date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        for _ in 0..365 {
            let record = DayAstroRecord::compute(date);
            assert_eq!(record.status(), record.breakdown().status);
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn date_keys() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(date_key(date), "2024-03-05");
        assert_eq!(parse_date("2024-03-05"), Ok(date));
        assert_eq!(
            parse_date("2024-02-30"),
            Err(ValidationError::InvalidDate("2024-02-30".into()))
        );
        assert!(parse_date("05.03.2024").is_err());
    }

    #[test]
    fn json_uses_stored_column_names() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let json = serde_json::to_value(DayAstroRecord::compute(date)).unwrap();
        assert_eq!(json["date"], "2024-03-15");
        assert_eq!(json["phase_name"], "New Moon");
        assert_eq!(json["zodiac_sign"], "Taurus");
        assert_eq!(json["lunar_day"], 6);
        assert_eq!(json["status"], 1);
    }

    #[test]
    fn json_round_trip_keeps_record() {
        let record = DayAstroRecord::compute(NaiveDate::from_ymd_opt(2025, 1, 8).unwrap());
        let json = serde_json::to_string(&record).unwrap();
        let back: DayAstroRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn inconsistent_status_is_rejected() {
        // 2025-01-08 scores favorable.
        let record = DayAstroRecord::compute(NaiveDate::from_ymd_opt(2025, 1, 8).unwrap());
        assert_eq!(record.status(), DayStatus::Favorable);

        let mut json = serde_json::to_value(&record).unwrap();
        json["status"] = serde_json::json!(-1);
        let err = serde_json::from_value::<DayAstroRecord>(json).unwrap_err();
        assert!(err.to_string().contains("does not match computed status 1"));
    }

    #[test]
    fn lunar_day_out_of_range_is_rejected() {
        let stored = StoredRecord {
            date: NaiveDate::from_ymd_opt(2025, 1, 8).unwrap(),
            phase_name: MoonPhase::WaxingCrescent,
            is_waxing: true,
            illumination: 0.5,
            lunar_day: 31,
            zodiac_sign: ZodiacSign::Leo,
            status: DayStatus::Favorable,
        };
        assert_eq!(
            DayAstroRecord::try_from(stored),
            Err("lunar day 31 out of range".to_string())
        );
    }
}
