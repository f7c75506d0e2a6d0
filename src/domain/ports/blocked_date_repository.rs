use crate::domain::entities::{BlockStatus, BlockedDate};
use crate::infrastructure::http::middleware::error::ApiResult;
use chrono::NaiveDate;

/// Repository for blocked dates
#[async_trait::async_trait]
pub trait BlockedDateRepository: Send + Sync {
    /// Fails with Conflict when the date is already blocked for the same scope
    async fn create_blocked_date(&self, blocked: &BlockedDate) -> ApiResult<()>;

    /// All blocks ordered by date, global before dog blocks, with dog names
    async fn list_blocked_dates(&self) -> ApiResult<Vec<BlockedDate>>;

    async fn delete_blocked_date(&self, id: &str) -> ApiResult<bool>;

    /// The global block and, when a dog is given, that dog's block on a date
    async fn block_status(&self, date: NaiveDate, dog_id: Option<&str>) -> ApiResult<BlockStatus>;
}
