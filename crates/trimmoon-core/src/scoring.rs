//! Day favorability scoring.
//!
//! An additive rule score over four independent terms:
//!
//! | Term      | +2                                   | +1                 | 0          | -1                                       | -2         |
//! |-----------|--------------------------------------|--------------------|------------|------------------------------------------|------------|
//! | sign      | Leo, Virgo, Taurus, Capricorn, Libra | any other sign     |            | Cancer, Pisces, Scorpio, Aries, Aquarius |            |
//! | phase     |                                      | waxing             | waning     | New or Full Moon                         |            |
//! | lunar day | 5 6 8 11 13 14 19 21 22 27 28        |                    | other days |                                          | 9 15 23 29 |
//! | weekday   |                                      | Thursday, Saturday | other days | Sunday                                   |            |
//!
//! A total of 2 or more is favorable, -2 or less unfavorable, anything in
//! between neutral.

use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::lunar::{MoonEstimate, MoonPhase, ZodiacSign};

const FAVORABLE_SIGNS: [ZodiacSign; 5] = [
    ZodiacSign::Leo,
    ZodiacSign::Virgo,
    ZodiacSign::Taurus,
    ZodiacSign::Capricorn,
    ZodiacSign::Libra,
];

const UNFAVORABLE_SIGNS: [ZodiacSign; 5] = [
    ZodiacSign::Cancer,
    ZodiacSign::Pisces,
    ZodiacSign::Scorpio,
    ZodiacSign::Aries,
    ZodiacSign::Aquarius,
];

/// The four "satanic" lunar days.
const SATANIC_LUNAR_DAYS: [u8; 4] = [9, 15, 23, 29];

const FAVORABLE_LUNAR_DAYS: [u8; 11] = [5, 6, 8, 11, 13, 14, 19, 21, 22, 27, 28];

const FAVORABLE_THRESHOLD: i32 = 2;
const UNFAVORABLE_THRESHOLD: i32 = -2;

/// Favorability classification of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum DayStatus {
    Unfavorable,
    Neutral,
    Favorable,
}

impl DayStatus {
    pub fn as_i8(self) -> i8 {
        match self {
            DayStatus::Unfavorable => -1,
            DayStatus::Neutral => 0,
            DayStatus::Favorable => 1,
        }
    }

    pub fn from_total(total: i32) -> Self {
        if total >= FAVORABLE_THRESHOLD {
            DayStatus::Favorable
        } else if total <= UNFAVORABLE_THRESHOLD {
            DayStatus::Unfavorable
        } else {
            DayStatus::Neutral
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DayStatus::Unfavorable => "Unfavorable day",
            DayStatus::Neutral => "Neutral day",
            DayStatus::Favorable => "Favorable day",
        }
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<DayStatus> for i8 {
    fn from(status: DayStatus) -> Self {
        status.as_i8()
    }
}

impl TryFrom<i8> for DayStatus {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(DayStatus::Unfavorable),
            0 => Ok(DayStatus::Neutral),
            1 => Ok(DayStatus::Favorable),
            other => Err(format!("invalid day status: {other}")),
        }
    }
}

/// Inputs to the scorer.
///
/// `is_waxing` is taken as given rather than derived from `phase`, so every
/// combination of the two can be scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreInput {
    pub phase: MoonPhase,
    pub is_waxing: bool,
    pub lunar_day: u8,
    pub zodiac_sign: ZodiacSign,
    pub weekday: Weekday,
}

impl ScoreInput {
    pub fn from_estimate(estimate: &MoonEstimate) -> Self {
        use chrono::Datelike;

        Self {
            phase: estimate.phase,
            is_waxing: estimate.is_waxing,
            lunar_day: estimate.lunar_day,
            zodiac_sign: estimate.zodiac_sign,
            weekday: estimate.date.weekday(),
        }
    }
}

/// Per-rule contributions for explaining a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub sign: i32,
    pub phase: i32,
    pub lunar_day: i32,
    pub weekday: i32,
    pub total: i32,
    pub status: DayStatus,
}

/// Classify a day.
pub fn score(input: &ScoreInput) -> DayStatus {
    explain(input).status
}

/// Score a day and keep each rule's contribution.
pub fn explain(input: &ScoreInput) -> ScoreBreakdown {
    let sign = sign_score(input.zodiac_sign);
    let phase = phase_score(input.phase, input.is_waxing);
    let lunar_day = lunar_day_score(input.lunar_day);
    let weekday = weekday_score(input.weekday);
    let total = sign + phase + lunar_day + weekday;

    ScoreBreakdown {
        sign,
        phase,
        lunar_day,
        weekday,
        total,
        status: DayStatus::from_total(total),
    }
}

fn sign_score(sign: ZodiacSign) -> i32 {
    if FAVORABLE_SIGNS.contains(&sign) {
        2
    } else if UNFAVORABLE_SIGNS.contains(&sign) {
        -1
    } else {
        1
    }
}

fn phase_score(phase: MoonPhase, is_waxing: bool) -> i32 {
    let name = phase.name().to_ascii_lowercase();
    if name.contains("new") || name.contains("full") {
        -1
    } else if is_waxing {
        1
    } else {
        0
    }
}

fn lunar_day_score(lunar_day: u8) -> i32 {
    if SATANIC_LUNAR_DAYS.contains(&lunar_day) {
        -2
    } else if FAVORABLE_LUNAR_DAYS.contains(&lunar_day) {
        2
    } else {
        0
    }
}

fn weekday_score(weekday: Weekday) -> i32 {
    match weekday {
        Weekday::Sun => -1,
        Weekday::Thu | Weekday::Sat => 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(
        zodiac_sign: ZodiacSign,
        phase: MoonPhase,
        is_waxing: bool,
        lunar_day: u8,
        weekday: Weekday,
    ) -> ScoreInput {
        ScoreInput {
            phase,
            is_waxing,
            lunar_day,
            zodiac_sign,
            weekday,
        }
    }

    #[test]
    fn favorable_example() {
        let b = explain(&input(
            ZodiacSign::Leo,
            MoonPhase::WaxingCrescent,
            true,
            6,
            Weekday::Thu,
        ));
        assert_eq!((b.sign, b.phase, b.lunar_day, b.weekday), (2, 1, 2, 1));
        assert_eq!(b.total, 6);
        assert_eq!(b.status, DayStatus::Favorable);
    }

    #[test]
    fn unfavorable_example() {
        let b = explain(&input(
            ZodiacSign::Cancer,
            MoonPhase::FullMoon,
            false,
            9,
            Weekday::Sun,
        ));
        assert_eq!((b.sign, b.phase, b.lunar_day, b.weekday), (-1, -1, -2, -1));
        assert_eq!(b.total, -5);
        assert_eq!(b.status, DayStatus::Unfavorable);
    }

    #[test]
    fn neutral_example() {
        let b = explain(&input(
            ZodiacSign::Gemini,
            MoonPhase::LastQuarter,
            false,
            17,
            Weekday::Tue,
        ));
        assert_eq!((b.sign, b.phase, b.lunar_day, b.weekday), (1, 0, 0, 0));
        assert_eq!(b.total, 1);
        assert_eq!(b.status, DayStatus::Neutral);
    }

    #[test]
    fn new_moon_penalized_even_when_waxing() {
        assert_eq!(phase_score(MoonPhase::NewMoon, true), -1);
        assert_eq!(phase_score(MoonPhase::FullMoon, false), -1);
        assert_eq!(phase_score(MoonPhase::FirstQuarter, true), 1);
        assert_eq!(phase_score(MoonPhase::WaningGibbous, false), 0);
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(DayStatus::from_total(2), DayStatus::Favorable);
        assert_eq!(DayStatus::from_total(1), DayStatus::Neutral);
        assert_eq!(DayStatus::from_total(-1), DayStatus::Neutral);
        assert_eq!(DayStatus::from_total(-2), DayStatus::Unfavorable);
    }

    #[test]
    fn every_sign_lands_in_exactly_one_bucket() {
        let scores: Vec<i32> = ZodiacSign::ALL.into_iter().map(sign_score).collect();
        assert_eq!(scores.iter().filter(|s| **s == 2).count(), 5);
        assert_eq!(scores.iter().filter(|s| **s == -1).count(), 5);
        assert_eq!(scores.iter().filter(|s| **s == 1).count(), 2);
        assert_eq!(sign_score(ZodiacSign::Sagittarius), 1);
    }

    #[test]
    fn lunar_day_sets() {
        for day in [9, 15, 23, 29] {
            assert_eq!(lunar_day_score(day), -2);
        }
        for day in [5, 6, 8, 11, 13, 14, 19, 21, 22, 27, 28] {
            assert_eq!(lunar_day_score(day), 2);
        }
        for day in [1, 2, 3, 4, 7, 10, 30] {
            assert_eq!(lunar_day_score(day), 0);
        }
    }

    #[test]
    fn status_integer_conversion() {
        for status in [DayStatus::Unfavorable, DayStatus::Neutral, DayStatus::Favorable] {
            assert_eq!(DayStatus::try_from(status.as_i8()), Ok(status));
        }
        assert!(DayStatus::try_from(2).is_err());
        assert_eq!(serde_json::to_string(&DayStatus::Unfavorable).unwrap(), "-1");
    }

    #[test]
    fn total_over_full_domain() {
        let weekdays = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];
        let mut seen = std::collections::HashSet::new();
        for phase in MoonPhase::ALL {
            for is_waxing in [true, false] {
                for lunar_day in 1..=30 {
                    for sign in ZodiacSign::ALL {
                        for weekday in weekdays {
                            let i = input(sign, phase, is_waxing, lunar_day, weekday);
                            let b = explain(&i);
                            assert_eq!(b.total, b.sign + b.phase + b.lunar_day + b.weekday);
                            assert_eq!(score(&i), b.status);
                            seen.insert(b.status);
                        }
                    }
                }
            }
        }
        assert_eq!(seen.len(), 3);
    }
}
