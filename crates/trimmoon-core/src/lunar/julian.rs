//! Gregorian date <-> Julian Day conversions.

use chrono::NaiveDate;

/// Julian Day of the J2000.0 epoch (2000-01-01 12:00 UTC).
pub const J2000: f64 = 2_451_545.0;

/// Julian Day Number of a Gregorian date (Fliegel–Van Flandern).
///
/// All divisions truncate toward zero, matching the integer formula as
/// published. The result is the day number of the date's noon.
pub fn julian_day_number(date: NaiveDate) -> i64 {
    use chrono::Datelike;

    let y = i64::from(date.year());
    let m = i64::from(date.month());
    let d = i64::from(date.day());
    let a = (m - 14) / 12;

    d - 32_075 + 1_461 * (y + 4_800 + a) / 4 + 367 * (m - 2 - a * 12) / 12
        - 3 * ((y + 4_900 + a) / 100) / 4
}

/// Inverse of [`julian_day_number`].
///
/// Returns `None` when the day number falls outside chrono's date range.
pub fn date_from_julian_day_number(jdn: i64) -> Option<NaiveDate> {
    let mut l = jdn + 68_569;
    let n = 4 * l / 146_097;
    l -= (146_097 * n + 3) / 4;
    let i = 4_000 * (l + 1) / 1_461_001;
    l = l - 1_461 * i / 4 + 31;
    let j = 80 * l / 2_447;
    let day = l - 2_447 * j / 80;
    l = j / 11;
    let month = j + 2 - 12 * l;
    let year = 100 * (n - 49) + i + l;

    NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day).ok()?,
    )
}

/// Julian Day at 00:00 UTC of `date`.
///
/// Dates carry no time of day, so they are pinned to midnight: half a day
/// before the noon-based day number.
pub fn julian_day(date: NaiveDate) -> f64 {
    julian_day_number(date) as f64 - 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn j2000_epoch_day_number() {
        assert_eq!(julian_day_number(ymd(2000, 1, 1)), 2_451_545);
    }

    #[test]
    fn known_day_numbers() {
        // Gregorian calendar reform and a unix-epoch reference.
        assert_eq!(julian_day_number(ymd(1582, 10, 15)), 2_299_161);
        assert_eq!(julian_day_number(ymd(1970, 1, 1)), 2_440_588);
        assert_eq!(julian_day_number(ymd(2024, 2, 29)), 2_460_370);
    }

    #[test]
    fn midnight_is_half_a_day_before_epoch() {
        assert_eq!(julian_day(ymd(2000, 1, 1)) - J2000, -0.5);
    }

    #[test]
    fn consecutive_dates_are_consecutive_numbers() {
        let mut date = ymd(1999, 12, 25);
        let mut prev = julian_day_number(date);
        for _ in 0..800 {
            date = date.succ_opt().unwrap();
            let next = julian_day_number(date);
            assert_eq!(next, prev + 1, "gap at {date}");
            prev = next;
        }
    }

    #[test]
    fn inverse_round_trips() {
        for date in [ymd(1900, 1, 1), ymd(2000, 1, 1), ymd(2024, 2, 29), ymd(2050, 12, 31)] {
            assert_eq!(date_from_julian_day_number(julian_day_number(date)), Some(date));
        }
    }
}
