use crate::domain::entities::ExternalHoliday;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HolidaySourceError {
    #[error("Holiday source request failed: {0}")]
    Request(String),
    #[error("Holiday source returned status {0}")]
    Status(u16),
    #[error("Holiday source returned an unreadable payload: {0}")]
    Payload(String),
    #[error("Holiday source timed out")]
    Timeout,
}

/// External public-holiday calendar
#[async_trait::async_trait]
pub trait HolidaySource: Send + Sync {
    async fn fetch_holidays(
        &self,
        year: i32,
        region_code: &str,
    ) -> Result<Vec<ExternalHoliday>, HolidaySourceError>;
}
