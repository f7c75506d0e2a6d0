use crate::{
    application::services::Notifier,
    domain::entities::{ApprovalStatus, Booking, BookingListResponse, DenyBookingRequest},
    domain::errors::DomainError,
    domain::ports::{BookingNotice, BookingRepository},
    domain::services::validate_review,
    infrastructure::http::middleware::error::{ApiError, ApiResult},
};
use std::sync::Arc;

/// Admin review of bookings that fall in the approval window
#[derive(Clone)]
pub struct ApprovalService {
    booking_repo: Arc<dyn BookingRepository>,
    notifier: Notifier,
}

impl ApprovalService {
    pub fn new(booking_repo: Arc<dyn BookingRepository>, notifier: Notifier) -> Self {
        Self {
            booking_repo,
            notifier,
        }
    }

    pub async fn list_pending(&self) -> ApiResult<BookingListResponse> {
        let bookings = self.booking_repo.list_pending_bookings().await?;
        Ok(BookingListResponse {
            count: bookings.len(),
            bookings,
        })
    }

    pub async fn approve(&self, id: &str, reviewer_id: &str) -> ApiResult<Booking> {
        let booking = self.find(id).await?;
        validate_review(&booking, ApprovalStatus::Approved).map_err(DomainError::from)?;

        // Conditional update: a concurrent reviewer leaves zero rows to change
        if !self.booking_repo.approve_booking(id, reviewer_id).await? {
            return Err(ApiError::Conflict(format!("Booking {} was already reviewed", id)));
        }

        let approved = self.find(id).await?;
        metrics::counter!("booking_reviews_total", "outcome" => "approved").increment(1);
        tracing::info!("Booking {} approved by {}", id, reviewer_id);

        self.notifier.notify(approved.clone(), BookingNotice::Approved);
        Ok(approved)
    }

    /// Denies a pending booking and releases its slot
    pub async fn deny(&self, id: &str, reviewer_id: &str, request: DenyBookingRequest) -> ApiResult<Booking> {
        let reason = request.reason.trim();
        if reason.is_empty() {
            return Err(ApiError::BadRequest("A reason is required to deny a booking".to_string()));
        }

        let booking = self.find(id).await?;
        validate_review(&booking, ApprovalStatus::Denied).map_err(DomainError::from)?;

        if !self.booking_repo.deny_booking(id, reviewer_id, reason).await? {
            return Err(ApiError::Conflict(format!("Booking {} was already reviewed", id)));
        }

        let denied = self.find(id).await?;
        metrics::counter!("booking_reviews_total", "outcome" => "denied").increment(1);
        tracing::info!("Booking {} denied by {}: {}", id, reviewer_id, reason);

        self.notifier.notify(
            denied.clone(),
            BookingNotice::Denied {
                reason: reason.to_string(),
            },
        );
        Ok(denied)
    }

    async fn find(&self, id: &str) -> ApiResult<Booking> {
        self.booking_repo
            .get_booking(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Booking {} not found", id)))
    }
}
