//! The eight named moon phases.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Named phase of the moon, in cycle order starting at New Moon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    /// All phases in cycle order.
    pub const ALL: [MoonPhase; 8] = [
        MoonPhase::NewMoon,
        MoonPhase::WaxingCrescent,
        MoonPhase::FirstQuarter,
        MoonPhase::WaxingGibbous,
        MoonPhase::FullMoon,
        MoonPhase::WaningGibbous,
        MoonPhase::LastQuarter,
        MoonPhase::WaningCrescent,
    ];

    /// Upper bin edges in degrees; anything at or above the last edge wraps
    /// back to New Moon.
    const BIN_EDGES: [f64; 8] = [22.5, 67.5, 112.5, 157.5, 202.5, 247.5, 292.5, 337.5];

    /// Map a phase angle to one of eight 45° bins centered on the principal
    /// phases.
    pub fn from_degrees(degrees: f64) -> Self {
        let degrees = super::normalize_degrees(degrees);
        Self::BIN_EDGES
            .iter()
            .position(|edge| degrees < *edge)
            .map(|i| Self::ALL[i])
            .unwrap_or(MoonPhase::NewMoon)
    }

    /// Display name as persisted and shown to users.
    pub fn name(self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::FullMoon => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }

    /// New Moon through Waxing Gibbous.
    pub fn is_waxing(self) -> bool {
        matches!(
            self,
            MoonPhase::NewMoon
                | MoonPhase::WaxingCrescent
                | MoonPhase::FirstQuarter
                | MoonPhase::WaxingGibbous
        )
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MoonPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|phase| phase.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown moon phase: {s}"))
    }
}

impl From<MoonPhase> for String {
    fn from(phase: MoonPhase) -> Self {
        phase.name().to_string()
    }
}

impl TryFrom<String> for MoonPhase {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
