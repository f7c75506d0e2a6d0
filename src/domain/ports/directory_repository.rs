use crate::domain::entities::{Dog, Session, Walker};
use crate::infrastructure::http::middleware::error::ApiResult;

/// Read-only lookups of walkers, dogs and sessions owned by the wider shelter system
#[async_trait::async_trait]
pub trait DirectoryRepository: Send + Sync {
    async fn get_walker(&self, id: &str) -> ApiResult<Option<Walker>>;

    async fn get_dog(&self, id: &str) -> ApiResult<Option<Dog>>;

    async fn get_session(&self, token: &str) -> ApiResult<Option<Session>>;
}
