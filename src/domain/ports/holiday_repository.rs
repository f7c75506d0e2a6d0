use crate::domain::entities::{Holiday, HolidayCacheEntry, HolidayChanges};
use crate::infrastructure::http::middleware::error::ApiResult;
use chrono::NaiveDate;

/// Repository for admin holidays and the external holiday cache
#[async_trait::async_trait]
pub trait HolidayRepository: Send + Sync {
    async fn create_holiday(&self, holiday: &Holiday) -> ApiResult<()>;

    async fn get_holiday(&self, id: &str) -> ApiResult<Option<Holiday>>;

    /// Admin holiday on a date, active or not
    async fn find_holiday_on(&self, date: NaiveDate) -> ApiResult<Option<Holiday>>;

    /// Active and inactive holidays between both dates inclusive
    async fn list_holidays_between(&self, from: NaiveDate, to: NaiveDate) -> ApiResult<Vec<Holiday>>;

    async fn update_holiday(&self, id: &str, changes: &HolidayChanges) -> ApiResult<Option<Holiday>>;

    async fn delete_holiday(&self, id: &str) -> ApiResult<bool>;

    async fn get_cached_holidays(&self, year: i32, region_code: &str) -> ApiResult<Option<HolidayCacheEntry>>;

    /// Inserts or fully replaces the cache row for `(year, region_code)`
    async fn upsert_cached_holidays(&self, entry: &HolidayCacheEntry) -> ApiResult<()>;
}
