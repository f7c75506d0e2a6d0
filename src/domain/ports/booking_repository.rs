use crate::domain::entities::{Booking, BookingQuery, WallTime};
use crate::infrastructure::http::middleware::error::ApiResult;
use chrono::NaiveDate;

/// Repository for walk bookings
#[async_trait::async_trait]
pub trait BookingRepository: Send + Sync {
    /// Fails with Conflict when the slot is already held by a non-cancelled booking
    async fn create_booking(&self, booking: &Booking) -> ApiResult<()>;

    async fn get_booking(&self, id: &str) -> ApiResult<Option<Booking>>;

    /// Bookings matching the query, ordered by date and time
    async fn list_bookings(&self, query: &BookingQuery) -> ApiResult<Vec<Booking>>;

    /// Pending scheduled bookings, ordered by date and time
    async fn list_pending_bookings(&self) -> ApiResult<Vec<Booking>>;

    /// Start times held by the dog on a date
    async fn occupied_times(&self, dog_id: &str, date: NaiveDate) -> ApiResult<Vec<WallTime>>;

    /// Moves a scheduled booking to cancelled. Returns false if it was not scheduled.
    async fn cancel_booking(&self, id: &str, admin_reason: Option<&str>) -> ApiResult<bool>;

    /// Approves a pending scheduled booking. Returns false if it was not pending.
    async fn approve_booking(&self, id: &str, reviewer_id: &str) -> ApiResult<bool>;

    /// Denies a pending scheduled booking and releases its slot.
    /// Returns false if it was not pending.
    async fn deny_booking(&self, id: &str, reviewer_id: &str, reason: &str) -> ApiResult<bool>;

    /// Moves a scheduled booking to completed. Returns false if it was not scheduled.
    async fn complete_booking(&self, id: &str) -> ApiResult<bool>;

    /// Completes every scheduled, non-pending booking dated before `today`
    async fn complete_elapsed_bookings(&self, today: NaiveDate) -> ApiResult<u64>;
}
