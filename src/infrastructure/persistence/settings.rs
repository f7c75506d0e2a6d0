use crate::domain::ports::SettingsRepository;
use crate::infrastructure::http::middleware::error::ApiResult;
use crate::infrastructure::persistence::Database;
use async_trait::async_trait;
use sqlx::Row;

#[async_trait]
impl SettingsRepository for Database {
    async fn list_settings(&self) -> ApiResult<Vec<(String, String)>> {
        let rows = sqlx::query("SELECT key, value FROM system_settings ORDER BY key")
            .fetch_all(&self.pool)
            .await?;

        let mut settings = Vec::with_capacity(rows.len());
        for row in rows {
            settings.push((row.try_get("key")?, row.try_get("value")?));
        }
        Ok(settings)
    }

    async fn upsert_setting(&self, key: &str, value: &str) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO system_settings (key, value, updated_at)
             VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        tracing::info!("Setting updated: {}={}", key, value);
        Ok(())
    }
}
