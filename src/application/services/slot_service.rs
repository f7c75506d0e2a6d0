use crate::{
    application::services::{CalendarService, TimeRuleService},
    domain::entities::{parse_date, BookingSettings, DaySlots, WallTime},
    domain::ports::{BlockedDateRepository, BookingRepository, Clock},
    domain::services::slice,
    infrastructure::http::middleware::error::{ApiError, ApiResult},
};
use chrono::{Duration, NaiveDate};
use std::collections::HashSet;
use std::sync::Arc;

/// Computes the bookable slots of a date, optionally for one dog
#[derive(Clone)]
pub struct SlotService {
    calendar: CalendarService,
    rules: TimeRuleService,
    blocked_repo: Arc<dyn BlockedDateRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    clock: Arc<dyn Clock>,
}

impl SlotService {
    pub fn new(
        calendar: CalendarService,
        rules: TimeRuleService,
        blocked_repo: Arc<dyn BlockedDateRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            calendar,
            rules,
            blocked_repo,
            booking_repo,
            clock,
        }
    }

    /// Whether `date` lies in `[today, today + booking_advance_days]`
    pub fn is_bookable_date(&self, date: NaiveDate, settings: &BookingSettings) -> bool {
        let today = self.clock.today();
        date >= today && date <= today + Duration::days(settings.booking_advance_days)
    }

    pub async fn available_slots(
        &self,
        date: Option<&str>,
        dog_id: Option<&str>,
        settings: &BookingSettings,
    ) -> ApiResult<DaySlots> {
        let date = date
            .filter(|d| !d.is_empty())
            .ok_or_else(|| ApiError::BadRequest("date is required".to_string()))?;
        let date = parse_date(date).map_err(ApiError::BadRequest)?;
        let dog_id = dog_id.filter(|id| !id.is_empty());

        self.slots_for(date, dog_id, settings).await
    }

    pub async fn slots_for(
        &self,
        date: NaiveDate,
        dog_id: Option<&str>,
        settings: &BookingSettings,
    ) -> ApiResult<DaySlots> {
        let day = self.calendar.resolve(date, settings).await?;

        let mut response = DaySlots {
            date,
            day_type: day.day_type,
            is_holiday: day.is_holiday,
            holiday_name: day.holiday_name,
            blocked_reason: None,
            slots: Vec::new(),
        };

        if !self.is_bookable_date(date, settings) {
            return Ok(response);
        }

        let windows = self.rules.day_windows(day.day_type).await?;
        let blocks = self.blocked_repo.block_status(date, dog_id).await?;
        response.blocked_reason = blocks.effective().map(|b| b.reason.clone());

        let taken: HashSet<WallTime> = match dog_id {
            Some(dog_id) => self
                .booking_repo
                .occupied_times(dog_id, date)
                .await?
                .into_iter()
                .collect(),
            None => HashSet::new(),
        };

        response.slots = slice(
            &windows.open,
            settings.booking_time_granularity,
            blocks.is_blocked(),
            &taken,
        );

        tracing::debug!(
            "Computed {} slots for {} (dog={:?}, blocked={})",
            response.slots.len(),
            date,
            dog_id,
            blocks.is_blocked()
        );
        Ok(response)
    }
}
