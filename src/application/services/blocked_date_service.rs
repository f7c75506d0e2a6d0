use crate::{
    application::services::Notifier,
    domain::entities::{
        BlockCreatedResponse, BlockScope, BlockedDate, BookingQuery, BookingStatus,
        CreateBlockedDateRequest,
    },
    domain::ports::{BlockedDateRepository, BookingNotice, BookingRepository, DirectoryRepository},
    infrastructure::http::middleware::error::{ApiError, ApiResult},
};
use std::sync::Arc;

/// Admin date blocks and the cancellations they cascade into
#[derive(Clone)]
pub struct BlockedDateService {
    blocked_repo: Arc<dyn BlockedDateRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    directory: Arc<dyn DirectoryRepository>,
    notifier: Notifier,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct CascadeOutcome {
    cancelled: usize,
    failed: usize,
    load_error: Option<String>,
}

impl BlockedDateService {
    pub fn new(
        blocked_repo: Arc<dyn BlockedDateRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        directory: Arc<dyn DirectoryRepository>,
        notifier: Notifier,
    ) -> Self {
        Self {
            blocked_repo,
            booking_repo,
            directory,
            notifier,
        }
    }

    pub async fn list_blocked_dates(&self) -> ApiResult<Vec<BlockedDate>> {
        self.blocked_repo.list_blocked_dates().await
    }

    /// Blocks a date and cancels the scheduled bookings it covers.
    ///
    /// The block is stored first; each cancellation afterwards is independent
    /// and failures show up in the returned counts. If the covered bookings
    /// cannot be loaded at all, the block stands and `cascade_error` is set.
    pub async fn create_blocked_date(
        &self,
        request: CreateBlockedDateRequest,
        created_by: &str,
    ) -> ApiResult<BlockCreatedResponse> {
        // 1. Validate request
        let (date, scope, reason) = request.validate()?;

        // 2. Dog blocks need an existing dog
        let dog_name = match &scope {
            BlockScope::Dog(dog_id) => Some(
                self.directory
                    .get_dog(dog_id)
                    .await?
                    .ok_or_else(|| ApiError::NotFound(format!("Dog {} not found", dog_id)))?
                    .name,
            ),
            BlockScope::Global => None,
        };

        // 3. Insert; duplicate (date, scope) is a conflict
        let mut blocked = BlockedDate::new(date, &scope, reason, created_by.to_string());
        self.blocked_repo.create_blocked_date(&blocked).await?;
        blocked.dog_name = dog_name;

        // 4. Cascade
        let outcome = self.cancel_covered_bookings(&blocked).await;

        tracing::info!(
            "Blocked {} for {}: {} bookings cancelled, {} failed",
            blocked.date,
            scope,
            outcome.cancelled,
            outcome.failed
        );

        Ok(BlockCreatedResponse {
            blocked_date: blocked,
            cancelled_bookings: outcome.cancelled,
            failed_cancellations: outcome.failed,
            cascade_error: outcome.load_error,
        })
    }

    pub async fn delete_blocked_date(&self, id: &str) -> ApiResult<()> {
        if !self.blocked_repo.delete_blocked_date(id).await? {
            return Err(ApiError::NotFound(format!("Blocked date {} not found", id)));
        }
        Ok(())
    }

    async fn cancel_covered_bookings(&self, blocked: &BlockedDate) -> CascadeOutcome {
        let mut outcome = CascadeOutcome::default();

        let query = BookingQuery::scheduled_on(blocked.date, blocked.dog_id.as_deref());
        let bookings = match self.booking_repo.list_bookings(&query).await {
            Ok(bookings) => bookings,
            Err(e) => {
                tracing::error!("Failed to load bookings for blocked date {}: {}", blocked.date, e);
                outcome.load_error = Some(format!(
                    "Bookings on {} could not be loaded and were not cancelled",
                    blocked.date
                ));
                return outcome;
            }
        };

        let reason = format!("Date blocked by shelter: {}", blocked.reason);
        for booking in bookings {
            match self.booking_repo.cancel_booking(&booking.id, Some(&reason)).await {
                Ok(true) => {
                    outcome.cancelled += 1;
                    metrics::counter!("bookings_cancelled_total", "trigger" => "block").increment(1);

                    let mut cancelled = booking;
                    cancelled.status = BookingStatus::Cancelled;
                    cancelled.admin_cancellation_reason = Some(reason.clone());
                    self.notifier.notify(
                        cancelled,
                        BookingNotice::CancelledByBlock {
                            reason: blocked.reason.clone(),
                        },
                    );
                }
                Ok(false) => {
                    tracing::debug!("Booking {} left scheduled state before cascade", booking.id);
                }
                Err(e) => {
                    outcome.failed += 1;
                    tracing::error!("Failed to cancel booking {} for blocked date: {}", booking.id, e);
                }
            }
        }

        outcome
    }
}
