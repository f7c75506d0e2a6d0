use crate::domain::entities::{Interval, WallTime};
use crate::domain::errors::{DomainError, DomainResult};
use serde::Serialize;

pub const BOOKING_ADVANCE_DAYS: &str = "booking_advance_days";
pub const CANCELLATION_NOTICE_HOURS: &str = "cancellation_notice_hours";
pub const BOOKING_TIME_GRANULARITY: &str = "booking_time_granularity";
pub const MORNING_WALK_REQUIRES_APPROVAL: &str = "morning_walk_requires_approval";
pub const APPROVAL_WINDOW_START: &str = "approval_window_start";
pub const APPROVAL_WINDOW_END: &str = "approval_window_end";
pub const USE_HOLIDAY_API: &str = "use_holiday_api";
pub const HOLIDAY_REGION: &str = "holiday_region";
pub const HOLIDAY_CACHE_DAYS: &str = "holiday_cache_days";

pub const SETTING_KEYS: [&str; 9] = [
    BOOKING_ADVANCE_DAYS,
    CANCELLATION_NOTICE_HOURS,
    BOOKING_TIME_GRANULARITY,
    MORNING_WALK_REQUIRES_APPROVAL,
    APPROVAL_WINDOW_START,
    APPROVAL_WINDOW_END,
    USE_HOLIDAY_API,
    HOLIDAY_REGION,
    HOLIDAY_CACHE_DAYS,
];

/// Snapshot of the admin-tunable booking settings.
///
/// Loaded once per request and handed to each service call, so one request
/// never observes two different configurations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingSettings {
    pub booking_advance_days: i64,
    pub cancellation_notice_hours: i64,
    pub booking_time_granularity: u32,
    pub morning_walk_requires_approval: bool,
    pub approval_window_start: WallTime,
    pub approval_window_end: WallTime,
    pub use_holiday_api: bool,
    pub holiday_region: String,
    pub holiday_cache_days: i64,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            booking_advance_days: 14,
            cancellation_notice_hours: 12,
            booking_time_granularity: 15,
            morning_walk_requires_approval: true,
            approval_window_start: WallTime::at(9, 0),
            approval_window_end: WallTime::at(12, 0),
            use_holiday_api: true,
            holiday_region: "BW".to_string(),
            holiday_cache_days: 7,
        }
    }
}

impl BookingSettings {
    /// Builds a snapshot from stored key/value pairs. Unknown keys are ignored,
    /// unparsable values keep the default and are logged.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut settings = Self::default();
        let mut window = (None, None);
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            let applied = match key {
                // The window bounds are checked together once both are known
                APPROVAL_WINDOW_START => WallTime::parse(value.trim()).map(|t| window.0 = Some(t)),
                APPROVAL_WINDOW_END => WallTime::parse(value.trim()).map(|t| window.1 = Some(t)),
                _ if SETTING_KEYS.contains(&key) => settings.apply(key, value),
                _ => continue,
            };
            if let Err(e) = applied {
                tracing::warn!("Ignoring stored setting {}={}: {}", key, value, e);
            }
        }

        let start = window.0.unwrap_or(settings.approval_window_start);
        let end = window.1.unwrap_or(settings.approval_window_end);
        if start < end {
            settings.approval_window_start = start;
            settings.approval_window_end = end;
        } else {
            tracing::warn!(
                "Ignoring stored approval window {}-{}: start must be before end",
                start,
                end
            );
        }
        settings
    }

    /// Validates and applies one setting.
    pub fn apply(&mut self, key: &str, value: &str) -> DomainResult<()> {
        let value = value.trim();
        match key {
            BOOKING_ADVANCE_DAYS => {
                self.booking_advance_days = parse_in_range(key, value, 0, 365)?;
            }
            CANCELLATION_NOTICE_HOURS => {
                self.cancellation_notice_hours = parse_in_range(key, value, 0, 24 * 14)?;
            }
            BOOKING_TIME_GRANULARITY => {
                let minutes = parse_in_range(key, value, 5, 240)?;
                self.booking_time_granularity = minutes as u32;
            }
            MORNING_WALK_REQUIRES_APPROVAL => {
                self.morning_walk_requires_approval = parse_bool(key, value)?;
            }
            APPROVAL_WINDOW_START => {
                let start = WallTime::parse(value)?;
                ensure_window(start, self.approval_window_end)?;
                self.approval_window_start = start;
            }
            APPROVAL_WINDOW_END => {
                let end = WallTime::parse(value)?;
                ensure_window(self.approval_window_start, end)?;
                self.approval_window_end = end;
            }
            USE_HOLIDAY_API => {
                self.use_holiday_api = parse_bool(key, value)?;
            }
            HOLIDAY_REGION => {
                if value.is_empty()
                    || value.len() > 8
                    || !value.chars().all(|c| c.is_ascii_alphanumeric())
                {
                    return Err(DomainError::validation(
                        "holiday_region must be a short alphanumeric region code",
                    ));
                }
                self.holiday_region = value.to_uppercase();
            }
            HOLIDAY_CACHE_DAYS => {
                self.holiday_cache_days = parse_in_range(key, value, 1, 365)?;
            }
            _ => {
                return Err(DomainError::validation(format!("Unknown setting '{}'", key)));
            }
        }
        Ok(())
    }

    /// Walks in this window need admin review when the approval flag is on.
    pub fn approval_window(&self) -> Option<Interval> {
        Interval::new(self.approval_window_start, self.approval_window_end)
    }

    pub fn requires_approval(&self, time: WallTime) -> bool {
        self.morning_walk_requires_approval
            && self
                .approval_window()
                .map(|w| w.contains(time))
                .unwrap_or(false)
    }
}

fn parse_in_range(key: &str, value: &str, min: i64, max: i64) -> DomainResult<i64> {
    let parsed: i64 = value
        .parse()
        .map_err(|_| DomainError::validation(format!("{} must be a whole number", key)))?;
    if parsed < min || parsed > max {
        return Err(DomainError::validation(format!(
            "{} must be between {} and {}",
            key, min, max
        )));
    }
    Ok(parsed)
}

fn parse_bool(key: &str, value: &str) -> DomainResult<bool> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(DomainError::validation(format!(
            "{} must be 'true' or 'false'",
            key
        ))),
    }
}

fn ensure_window(start: WallTime, end: WallTime) -> DomainResult<()> {
    if start >= end {
        return Err(DomainError::validation(
            "approval_window_start must be before approval_window_end",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = BookingSettings::default();
        assert_eq!(settings.booking_advance_days, 14);
        assert_eq!(settings.booking_time_granularity, 15);
        assert_eq!(settings.holiday_cache_days, 7);
        assert_eq!(settings.approval_window_start.to_string(), "09:00");
        assert_eq!(settings.approval_window_end.to_string(), "12:00");
    }

    #[test]
    fn test_from_pairs_skips_bad_values() {
        let settings = BookingSettings::from_pairs([
            ("booking_advance_days", "30"),
            ("booking_time_granularity", "zero"),
            ("site_logo", "ignored"),
        ]);
        assert_eq!(settings.booking_advance_days, 30);
        assert_eq!(settings.booking_time_granularity, 15);
    }

    #[test]
    fn test_from_pairs_accepts_moved_window_in_any_order() {
        let settings = BookingSettings::from_pairs([
            ("approval_window_start", "13:00"),
            ("approval_window_end", "15:00"),
        ]);
        assert_eq!(settings.approval_window_start, WallTime::at(13, 0));
        assert_eq!(settings.approval_window_end, WallTime::at(15, 0));

        let inverted = BookingSettings::from_pairs([
            ("approval_window_start", "15:00"),
            ("approval_window_end", "13:00"),
        ]);
        assert_eq!(inverted.approval_window_start, WallTime::at(9, 0));
    }

    #[test]
    fn test_apply_validates_each_key() {
        let mut settings = BookingSettings::default();
        assert!(settings.apply("booking_time_granularity", "0").is_err());
        assert!(settings.apply("use_holiday_api", "yes").is_err());
        assert!(settings.apply("approval_window_end", "08:00").is_err());
        assert!(settings.apply("unknown_key", "1").is_err());
        settings.apply("holiday_region", "by").unwrap();
        assert_eq!(settings.holiday_region, "BY");
    }

    #[test]
    fn test_requires_approval_only_inside_window() {
        let mut settings = BookingSettings::default();
        assert!(settings.requires_approval(WallTime::at(9, 0)));
        assert!(settings.requires_approval(WallTime::at(11, 45)));
        assert!(!settings.requires_approval(WallTime::at(12, 0)));
        assert!(!settings.requires_approval(WallTime::at(8, 45)));

        settings.morning_walk_requires_approval = false;
        assert!(!settings.requires_approval(WallTime::at(9, 0)));
    }
}
