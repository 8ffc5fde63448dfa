//! Moon-data estimation.
//!
//! A self-contained approximation of the moon's state for a calendar date:
//! mean longitudes from Julian-day arithmetic, an eight-bin phase, a 1..=30
//! lunar day, and the zodiac sign under the moon's mean longitude.

pub mod estimator;
pub mod julian;
pub mod phase;
pub mod zodiac;

pub use estimator::{estimate, MoonEstimate, SYNODIC_MONTH};
pub use julian::{date_from_julian_day_number, julian_day, julian_day_number, J2000};
pub use phase::MoonPhase;
pub use zodiac::ZodiacSign;

/// Reduce an angle in degrees to `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}
