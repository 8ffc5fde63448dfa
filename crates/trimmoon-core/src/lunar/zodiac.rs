//! Tropical zodiac signs as 30° slices of ecliptic longitude.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    /// Signs in ecliptic order, Aries at 0°.
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Sign for an ecliptic longitude, using the whole degree below it.
    pub fn from_longitude(longitude: f64) -> Self {
        let degree = super::normalize_degrees(longitude).floor() as usize;
        // rem_euclid rounds tiny negative inputs up to exactly 360.0
        Self::ALL[(degree / 30).min(11)]
    }

    pub fn name(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ZodiacSign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|sign| sign.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown zodiac sign: {s}"))
    }
}

impl From<ZodiacSign> for String {
    fn from(sign: ZodiacSign) -> Self {
        sign.name().to_string()
    }
}

impl TryFrom<String> for ZodiacSign {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longitude_bins() {
        assert_eq!(ZodiacSign::from_longitude(0.0), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(29.99), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(30.0), ZodiacSign::Taurus);
        assert_eq!(ZodiacSign::from_longitude(128.2), ZodiacSign::Leo);
        assert_eq!(ZodiacSign::from_longitude(330.0), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::from_longitude(359.999), ZodiacSign::Pisces);
    }

    #[test]
    fn longitude_wraps() {
        assert_eq!(ZodiacSign::from_longitude(-15.0), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::from_longitude(400.0), ZodiacSign::Taurus);
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for sign in ZodiacSign::ALL {
            assert_eq!(sign.name().parse::<ZodiacSign>(), Ok(sign));
        }
        assert_eq!("capricorn".parse::<ZodiacSign>(), Ok(ZodiacSign::Capricorn));
        assert!("Ophiuchus".parse::<ZodiacSign>().is_err());
    }
}
