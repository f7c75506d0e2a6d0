use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Source of the current time in the shelter's timezone
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;

    /// Current wall-clock date and time at the shelter
    fn local_now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.local_now().date()
    }
}
