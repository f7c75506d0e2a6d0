use crate::{
    domain::entities::BookingSettings,
    domain::ports::SettingsRepository,
    infrastructure::http::middleware::error::ApiResult,
};
use std::sync::Arc;

/// Loads and updates the admin-tunable booking settings
#[derive(Clone)]
pub struct SettingsService {
    settings_repo: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    pub fn new(settings_repo: Arc<dyn SettingsRepository>) -> Self {
        Self { settings_repo }
    }

    /// Current settings snapshot; missing keys fall back to defaults
    pub async fn load(&self) -> ApiResult<BookingSettings> {
        let pairs = self.settings_repo.list_settings().await?;
        Ok(BookingSettings::from_pairs(pairs))
    }

    /// Validates one key against the current snapshot, then stores it
    pub async fn update(&self, key: &str, value: &str) -> ApiResult<BookingSettings> {
        let mut settings = self.load().await?;
        settings.apply(key, value)?;

        self.settings_repo.upsert_setting(key, value.trim()).await?;

        tracing::info!("Setting {} changed to {}", key, value.trim());
        Ok(settings)
    }
}
