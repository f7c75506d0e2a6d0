use crate::domain::entities::{DayType, WallTime};
use chrono::NaiveDate;
use serde::Serialize;

/// One bookable slot; never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub start_time: WallTime,
    pub end_time: WallTime,
    pub available: bool,
}

/// Slot query response for one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySlots {
    pub date: NaiveDate,
    pub day_type: DayType,
    pub is_holiday: bool,
    pub holiday_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,
    pub slots: Vec<Slot>,
}

impl DaySlots {
    pub fn available(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|s| s.available)
    }
}
