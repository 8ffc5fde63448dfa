//! Mean-element moon estimator.
//!
//! Uses linear mean longitudes from the J2000.0 epoch. The constants below
//! must stay exact: stored records and their statuses are derived from them
//! and are never recomputed once persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::julian::{julian_day, J2000};
use super::{normalize_degrees, MoonPhase, ZodiacSign};

/// Length of the synodic month in days.
pub const SYNODIC_MONTH: f64 = 29.530588;

/// Julian Day of the reference new moon used for lunar-day counting.
const REFERENCE_NEW_MOON: f64 = 2_451_549.0;

const MOON_MEAN_LONGITUDE_AT_EPOCH: f64 = 218.3164477;
const MOON_MEAN_LONGITUDE_RATE: f64 = 13.176396464;
const MOON_MEAN_ANOMALY_AT_EPOCH: f64 = 134.9633964;
const MOON_MEAN_ANOMALY_RATE: f64 = 13.064992950;
const SUN_MEAN_ANOMALY_AT_EPOCH: f64 = 357.5291092;
const SUN_MEAN_ANOMALY_RATE: f64 = 0.985600281;

/// Everything known about the moon for a date, before scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonEstimate {
    pub date: NaiveDate,
    pub julian_day: f64,
    pub days_since_2000: f64,
    /// Moon mean longitude, degrees in `[0, 360)`.
    pub moon_longitude: f64,
    /// Moon mean anomaly, degrees in `[0, 360)`. Informational only.
    pub moon_anomaly: f64,
    /// Sun mean anomaly, degrees in `[0, 360)`.
    pub sun_anomaly: f64,
    /// Phase angle, degrees in `[0, 360)`.
    pub phase_degrees: f64,
    pub phase: MoonPhase,
    pub is_waxing: bool,
    /// Illuminated fraction in `[0, 1]`.
    pub illumination: f64,
    /// Day within the synodic month, `1..=30`.
    pub lunar_day: u8,
    pub zodiac_sign: ZodiacSign,
}

/// Estimate the moon's state on `date`.
///
/// Pure and total over every date chrono can represent.
pub fn estimate(date: NaiveDate) -> MoonEstimate {
    let jd = julian_day(date);
    let days_since_2000 = jd - J2000;

    let moon_longitude =
        normalize_degrees(MOON_MEAN_LONGITUDE_AT_EPOCH + MOON_MEAN_LONGITUDE_RATE * days_since_2000);
    let moon_anomaly =
        normalize_degrees(MOON_MEAN_ANOMALY_AT_EPOCH + MOON_MEAN_ANOMALY_RATE * days_since_2000);
    let sun_anomaly =
        normalize_degrees(SUN_MEAN_ANOMALY_AT_EPOCH + SUN_MEAN_ANOMALY_RATE * days_since_2000);

    let phase_angle = moon_longitude - sun_anomaly;
    let phase_degrees = normalize_degrees(phase_angle);
    let illumination = ((1.0 + phase_angle.to_radians().cos()) / 2.0).clamp(0.0, 1.0);

    let phase = MoonPhase::from_degrees(phase_degrees);

    MoonEstimate {
        date,
        julian_day: jd,
        days_since_2000,
        moon_longitude,
        moon_anomaly,
        sun_anomaly,
        phase_degrees,
        phase,
        is_waxing: phase.is_waxing(),
        illumination,
        lunar_day: lunar_day(jd),
        zodiac_sign: ZodiacSign::from_longitude(moon_longitude),
    }
}

fn lunar_day(jd: f64) -> u8 {
    let age = (jd - REFERENCE_NEW_MOON).rem_euclid(SYNODIC_MONTH);
    (age.floor() as i64 + 1).clamp(1, 30) as u8
}
