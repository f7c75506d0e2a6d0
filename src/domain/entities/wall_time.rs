use crate::domain::errors::{DomainError, DomainResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

fn hh_mm_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").expect("valid regex"))
}

/// Time of day with minute precision, written as strict 24-hour `HH:MM`.
///
/// Ordering follows the clock, so `WallTime` values can be compared directly
/// when checking rule windows and slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WallTime {
    minutes: u32,
}

impl WallTime {
    pub const MINUTES_PER_DAY: u32 = 24 * 60;

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes < Self::MINUTES_PER_DAY).then_some(Self { minutes })
    }

    /// Literal constructor for fixed clock times such as defaults.
    pub const fn at(hour: u32, minute: u32) -> Self {
        assert!(hour < 24 && minute < 60);
        Self {
            minutes: hour * 60 + minute,
        }
    }

    /// Parse strict `HH:MM`: leading zeros required, no seconds.
    pub fn parse(value: &str) -> DomainResult<Self> {
        let caps = hh_mm_pattern().captures(value).ok_or_else(|| {
            DomainError::validation(format!("Time '{}' must be in HH:MM format", value))
        })?;

        // Both groups are two ASCII digits after a regex match
        let hour: u32 = caps[1].parse().unwrap_or_default();
        let minute: u32 = caps[2].parse().unwrap_or_default();

        Ok(Self {
            minutes: hour * 60 + minute,
        })
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn hour(&self) -> u32 {
        self.minutes / 60
    }

    pub fn minute(&self) -> u32 {
        self.minutes % 60
    }

    /// Adds minutes, returning `None` past midnight.
    pub fn checked_add_minutes(&self, minutes: u32) -> Option<Self> {
        Self::from_minutes(self.minutes.checked_add(minutes)?)
    }

    pub fn to_naive_time(&self) -> chrono::NaiveTime {
        chrono::NaiveTime::from_hms_opt(self.hour(), self.minute(), 0).unwrap_or_default()
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for WallTime {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WallTime {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WallTime> for String {
    fn from(value: WallTime) -> Self {
        value.to_string()
    }
}

/// Half-open interval `[start, end)` on the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    pub start: WallTime,
    pub end: WallTime,
}

impl Interval {
    pub fn new(start: WallTime, end: WallTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn contains(&self, time: WallTime) -> bool {
        self.start <= time && time < self.end
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
