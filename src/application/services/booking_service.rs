use crate::{
    application::services::{Notifier, TimeRuleService},
    domain::entities::{
        format_date, parse_date, Booking, BookingFilter, BookingListResponse, BookingQuery,
        BookingSettings, BookingStatus, CancelBookingRequest, CreateBookingRequest, DayType,
        WallTime, Walker,
    },
    domain::errors::DomainError,
    domain::ports::{BlockedDateRepository, BookingNotice, BookingRepository, Clock, DirectoryRepository},
    domain::services::validate_status_transition,
    infrastructure::http::middleware::error::{ApiError, ApiResult},
};
use chrono::{Duration, NaiveDate};
use std::sync::Arc;

/// Booking admission and the walker-facing booking lifecycle
#[derive(Clone)]
pub struct BookingService {
    booking_repo: Arc<dyn BookingRepository>,
    blocked_repo: Arc<dyn BlockedDateRepository>,
    directory: Arc<dyn DirectoryRepository>,
    rules: TimeRuleService,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
}

fn rejected(reason: &'static str, err: DomainError) -> ApiError {
    metrics::counter!("bookings_rejected_total", "reason" => reason).increment(1);
    err.into()
}

impl BookingService {
    pub fn new(
        booking_repo: Arc<dyn BookingRepository>,
        blocked_repo: Arc<dyn BlockedDateRepository>,
        directory: Arc<dyn DirectoryRepository>,
        rules: TimeRuleService,
        notifier: Notifier,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            booking_repo,
            blocked_repo,
            directory,
            rules,
            notifier,
            clock,
        }
    }

    /// Admits a booking request.
    ///
    /// Checks run in a fixed order and stop at the first failure. The unique
    /// slot index is the final word on double-booking.
    pub async fn create_booking(
        &self,
        walker: &Walker,
        request: CreateBookingRequest,
        settings: &BookingSettings,
    ) -> ApiResult<Booking> {
        // 1. Well-formed input
        let dog_id = request.dog_id.trim();
        if dog_id.is_empty() {
            return Err(rejected("invalid", DomainError::validation("dog_id is required")));
        }
        let date = parse_date(&request.date)
            .map_err(|e| rejected("invalid", DomainError::ValidationError(e)))?;
        let time = WallTime::parse(&request.scheduled_time).map_err(|e| rejected("invalid", e))?;

        // 2-3. Booking horizon
        let today = self.clock.today();
        if date < today {
            return Err(rejected(
                "past",
                DomainError::validation("Cannot book walks in the past"),
            ));
        }
        if date > today + Duration::days(settings.booking_advance_days) {
            return Err(rejected(
                "too_far_ahead",
                DomainError::validation(format!(
                    "Walks can be booked at most {} days in advance",
                    settings.booking_advance_days
                )),
            ));
        }

        // 4. Date blocks
        let blocks = self.blocked_repo.block_status(date, Some(dog_id)).await?;
        if let Some(block) = blocks.effective() {
            return Err(rejected(
                "date_blocked",
                DomainError::validation(format!(
                    "{} is blocked: {}",
                    format_date(date),
                    block.reason
                )),
            ));
        }

        // 5. Time rules
        let windows = self.rules.day_windows(DayType::of(date)).await?;
        if let Some(blocked) = windows.blocking_rule(time) {
            return Err(rejected(
                "rule_blocked",
                DomainError::validation(format!(
                    "{} falls in the blocked period '{}' ({})",
                    time, blocked.rule_name, blocked.window
                )),
            ));
        }
        if !windows.is_open(time) {
            return Err(rejected(
                "outside_hours",
                DomainError::validation(format!("{} is outside of walking hours", time)),
            ));
        }

        // 6. Dog
        let dog = self
            .directory
            .get_dog(dog_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Dog {} not found", dog_id)))?;
        if !dog.is_available {
            return Err(rejected(
                "dog_unavailable",
                DomainError::validation(format!("{} is not available for walks", dog.name)),
            ));
        }

        // 7. Experience level
        if !walker.may_walk(&dog) {
            return Err(rejected(
                "experience",
                DomainError::Forbidden(format!(
                    "{} requires {} experience level, you have {}",
                    dog.name, dog.required_level, walker.experience_level
                )),
            ));
        }

        // 8. Active account
        if !walker.is_active {
            return Err(rejected(
                "inactive",
                DomainError::Forbidden("Your account is deactivated".to_string()),
            ));
        }

        // 9. Slot still free
        let taken = self.booking_repo.occupied_times(&dog.id, date).await?;
        if taken.contains(&time) {
            return Err(rejected(
                "slot_taken",
                DomainError::Conflict(format!(
                    "The {} slot on {} is already booked for {}",
                    time,
                    format_date(date),
                    dog.name
                )),
            ));
        }

        let requires_approval = settings.requires_approval(time);
        let notes = request
            .user_notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let booking = Booking::new(
            walker.id.clone(),
            dog.id.clone(),
            date,
            time,
            requires_approval,
            notes,
        );

        if let Err(e) = self.booking_repo.create_booking(&booking).await {
            if matches!(e, ApiError::Conflict(_)) {
                metrics::counter!("bookings_rejected_total", "reason" => "slot_taken").increment(1);
            }
            return Err(e);
        }

        metrics::counter!(
            "bookings_created_total",
            "approval" => booking.approval_status.to_string()
        )
        .increment(1);

        Ok(booking)
    }

    /// Walkers see their own bookings; admins see everyone's
    pub async fn list_bookings(&self, walker: &Walker, filter: BookingFilter) -> ApiResult<BookingListResponse> {
        let mut query = parse_filter(filter)?;
        if !walker.is_admin {
            query.user_id = Some(walker.id.clone());
        }

        let bookings = self.booking_repo.list_bookings(&query).await?;
        Ok(BookingListResponse {
            count: bookings.len(),
            bookings,
        })
    }

    pub async fn get_booking(&self, walker: &Walker, id: &str) -> ApiResult<Booking> {
        let booking = self.find(id).await?;
        if booking.user_id != walker.id && !walker.is_admin {
            return Err(ApiError::Forbidden(
                "You can only view your own bookings".to_string(),
            ));
        }
        Ok(booking)
    }

    /// Cancels a scheduled booking.
    ///
    /// Walkers must respect the cancellation notice period; admins may cancel
    /// at any time and leave a reason for the walker.
    pub async fn cancel_booking(
        &self,
        walker: &Walker,
        id: &str,
        request: CancelBookingRequest,
        settings: &BookingSettings,
    ) -> ApiResult<Booking> {
        let booking = self.find(id).await?;

        if booking.user_id != walker.id && !walker.is_admin {
            return Err(ApiError::Forbidden(
                "You can only cancel your own bookings".to_string(),
            ));
        }

        validate_status_transition(booking.status, BookingStatus::Cancelled)
            .map_err(DomainError::from)?;

        if !walker.is_admin {
            let starts_at = booking.date.and_time(booking.scheduled_time.to_naive_time());
            let notice = Duration::hours(settings.cancellation_notice_hours);
            if starts_at - self.clock.local_now() < notice {
                return Err(ApiError::BadRequest(format!(
                    "Bookings must be cancelled at least {} hours in advance",
                    settings.cancellation_notice_hours
                )));
            }
        }

        let admin_reason = if walker.is_admin {
            request
                .reason
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
        } else {
            None
        };

        if !self.booking_repo.cancel_booking(id, admin_reason).await? {
            return Err(ApiError::Conflict(format!("Booking {} is no longer scheduled", id)));
        }

        let cancelled = self.find(id).await?;
        let trigger = if walker.is_admin { "admin" } else { "walker" };
        metrics::counter!("bookings_cancelled_total", "trigger" => trigger).increment(1);
        tracing::info!("Booking {} cancelled by {} ({})", id, walker.id, trigger);

        if walker.is_admin && cancelled.user_id != walker.id {
            self.notifier.notify(
                cancelled.clone(),
                BookingNotice::CancelledByAdmin {
                    reason: admin_reason.map(str::to_string),
                },
            );
        }

        Ok(cancelled)
    }

    pub async fn complete_booking(&self, id: &str) -> ApiResult<Booking> {
        let booking = self.find(id).await?;
        validate_status_transition(booking.status, BookingStatus::Completed)
            .map_err(DomainError::from)?;

        if !self.booking_repo.complete_booking(id).await? {
            return Err(ApiError::Conflict(format!("Booking {} is no longer scheduled", id)));
        }

        tracing::info!("Booking {} completed", id);
        self.find(id).await
    }

    /// Marks approved bookings from earlier days as completed
    pub async fn complete_elapsed(&self) -> ApiResult<u64> {
        let today = self.clock.today();
        let completed = self.booking_repo.complete_elapsed_bookings(today).await?;
        if completed > 0 {
            tracing::info!("Completed {} elapsed bookings before {}", completed, today);
        }
        Ok(completed)
    }

    async fn find(&self, id: &str) -> ApiResult<Booking> {
        self.booking_repo
            .get_booking(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Booking {} not found", id)))
    }
}

fn parse_filter(filter: BookingFilter) -> ApiResult<BookingQuery> {
    let parse_opt_date = |value: Option<String>| -> ApiResult<Option<NaiveDate>> {
        value
            .filter(|v| !v.is_empty())
            .map(|v| parse_date(&v).map_err(ApiError::BadRequest))
            .transpose()
    };

    let status = filter
        .status
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<BookingStatus>().map_err(ApiError::BadRequest))
        .transpose()?;

    Ok(BookingQuery {
        user_id: filter.user_id.filter(|v| !v.is_empty()),
        dog_id: filter.dog_id.filter(|v| !v.is_empty()),
        date_from: parse_opt_date(filter.date_from)?,
        date_to: parse_opt_date(filter.date_to)?,
        status,
    })
}
