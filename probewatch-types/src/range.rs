//! Relative time windows accepted by the history endpoint.

use core::fmt;
use core::str::FromStr;
use core::time::Duration;

/// Relative window token bounding a history query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeRange {
    /// Last hour.
    #[cfg_attr(feature = "serde", serde(rename = "1h"))]
    OneHour,
    /// Last six hours.
    #[cfg_attr(feature = "serde", serde(rename = "6h"))]
    SixHours,
    /// Last day.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "1d"))]
    OneDay,
    /// Last three days.
    #[cfg_attr(feature = "serde", serde(rename = "3d"))]
    ThreeDays,
    /// Last seven days.
    #[cfg_attr(feature = "serde", serde(rename = "7d"))]
    SevenDays,
}

impl TimeRange {
    /// Every range, shortest first. This is also the selector order.
    pub const ALL: [TimeRange; 5] = [
        TimeRange::OneHour,
        TimeRange::SixHours,
        TimeRange::OneDay,
        TimeRange::ThreeDays,
        TimeRange::SevenDays,
    ];

    /// The wire token (`1h`, `6h`, `1d`, `3d`, `7d`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            TimeRange::OneHour => "1h",
            TimeRange::SixHours => "6h",
            TimeRange::OneDay => "1d",
            TimeRange::ThreeDays => "3d",
            TimeRange::SevenDays => "7d",
        }
    }

    /// Human label for selector chips.
    pub const fn label(&self) -> &'static str {
        match self {
            TimeRange::OneHour => "1 hour",
            TimeRange::SixHours => "6 hours",
            TimeRange::OneDay => "1 day",
            TimeRange::ThreeDays => "3 days",
            TimeRange::SevenDays => "7 days",
        }
    }

    /// Length of the window.
    pub const fn duration(&self) -> Duration {
        const HOUR: u64 = 60 * 60;
        match self {
            TimeRange::OneHour => Duration::from_secs(HOUR),
            TimeRange::SixHours => Duration::from_secs(6 * HOUR),
            TimeRange::OneDay => Duration::from_secs(24 * HOUR),
            TimeRange::ThreeDays => Duration::from_secs(3 * 24 * HOUR),
            TimeRange::SevenDays => Duration::from_secs(7 * 24 * HOUR),
        }
    }

    /// Position in [`TimeRange::ALL`].
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|r| r == self).unwrap_or(0)
    }

    /// Next longer range, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Next shorter range, wrapping around.
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known range tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTimeRangeError;

impl fmt::Display for ParseTimeRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected one of 1h, 6h, 1d, 3d, 7d")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseTimeRangeError {}

impl FromStr for TimeRange {
    type Err = ParseTimeRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or(ParseTimeRangeError)
    }
}
