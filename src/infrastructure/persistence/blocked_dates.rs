use super::{decode_optional, decode_text};
use crate::domain::entities::{format_date, BlockScope, BlockStatus, BlockedDate};
use crate::domain::ports::BlockedDateRepository;
use crate::infrastructure::http::middleware::error::{is_unique_violation, ApiError, ApiResult};
use crate::infrastructure::persistence::Database;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::Row;

fn row_to_blocked_date(row: &sqlx::any::AnyRow) -> Result<BlockedDate, sqlx::Error> {
    Ok(BlockedDate {
        id: row.try_get("id")?,
        date: decode_text(row, "date")?,
        dog_id: decode_optional(row, "dog_id")?,
        dog_name: decode_optional(row, "dog_name")?,
        reason: row.try_get("reason")?,
        created_by: row.try_get("created_by")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl BlockedDateRepository for Database {
    async fn create_blocked_date(&self, blocked: &BlockedDate) -> ApiResult<()> {
        let scope = blocked.scope();

        sqlx::query(
            "INSERT INTO blocked_dates (id, date, scope, dog_id, reason, created_by, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&blocked.id)
        .bind(format_date(blocked.date))
        .bind(scope.key())
        .bind(&blocked.dog_id)
        .bind(&blocked.reason)
        .bind(&blocked.created_by)
        .bind(&blocked.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict(format!(
                    "{} is already blocked for {}",
                    format_date(blocked.date),
                    scope
                ))
            } else {
                ApiError::from(e)
            }
        })?;

        tracing::info!(
            "Blocked date created: id={}, date={}, scope={}",
            blocked.id,
            blocked.date,
            scope.key()
        );
        Ok(())
    }

    async fn list_blocked_dates(&self) -> ApiResult<Vec<BlockedDate>> {
        let rows = sqlx::query(
            "SELECT b.id, b.date, b.dog_id, d.name AS dog_name, b.reason, b.created_by, b.created_at
             FROM blocked_dates b
             LEFT JOIN dogs d ON d.id = b.dog_id
             ORDER BY b.date,
                      CASE WHEN b.dog_id IS NULL THEN 0 ELSE 1 END,
                      d.name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_blocked_date).collect::<Result<_, _>>()?)
    }

    async fn delete_blocked_date(&self, id: &str) -> ApiResult<bool> {
        let result = sqlx::query("DELETE FROM blocked_dates WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            tracing::info!("Blocked date deleted: id={}", id);
        }
        Ok(result.rows_affected() > 0)
    }

    async fn block_status(&self, date: NaiveDate, dog_id: Option<&str>) -> ApiResult<BlockStatus> {
        let dog_scope = dog_id.map(|id| BlockScope::Dog(id.to_string()).key());

        let rows = sqlx::query(
            "SELECT b.id, b.date, b.dog_id, d.name AS dog_name, b.reason, b.created_by, b.created_at
             FROM blocked_dates b
             LEFT JOIN dogs d ON d.id = b.dog_id
             WHERE b.date = ? AND (b.scope = 'global' OR b.scope = ?)",
        )
        .bind(format_date(date))
        .bind(dog_scope)
        .fetch_all(&self.pool)
        .await?;

        let mut status = BlockStatus::default();
        for row in &rows {
            let blocked = row_to_blocked_date(row)?;
            if blocked.dog_id.is_some() {
                status.dog = Some(blocked);
            } else {
                status.global = Some(blocked);
            }
        }
        Ok(status)
    }
}
