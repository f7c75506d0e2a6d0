use crate::infrastructure::http::middleware::error::ApiResult;

/// Key/value store for admin-tunable settings
#[async_trait::async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn list_settings(&self) -> ApiResult<Vec<(String, String)>>;

    async fn upsert_setting(&self, key: &str, value: &str) -> ApiResult<()>;
}
