use super::{decode_flag, decode_text, flag};
use crate::domain::entities::{DayType, TimeRule, TimeRuleSpec};
use crate::domain::ports::TimeRuleRepository;
use crate::infrastructure::http::middleware::error::{is_unique_violation, ApiError, ApiResult};
use crate::infrastructure::persistence::Database;
use async_trait::async_trait;
use sqlx::Row;

const RULE_COLUMNS: &str =
    "id, day_type, rule_name, start_time, end_time, is_blocked, created_at, updated_at";

fn row_to_rule(row: &sqlx::any::AnyRow) -> Result<TimeRule, sqlx::Error> {
    Ok(TimeRule {
        id: row.try_get("id")?,
        day_type: decode_text(row, "day_type")?,
        rule_name: row.try_get("rule_name")?,
        start_time: decode_text(row, "start_time")?,
        end_time: decode_text(row, "end_time")?,
        is_blocked: decode_flag(row, "is_blocked")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn duplicate_name(spec_name: &str, day_type: DayType) -> ApiError {
    ApiError::Conflict(format!(
        "A {} rule named '{}' already exists",
        day_type, spec_name
    ))
}

#[async_trait]
impl TimeRuleRepository for Database {
    async fn list_time_rules(&self) -> ApiResult<Vec<TimeRule>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM time_rules ORDER BY day_type, start_time, end_time",
            RULE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_rule).collect::<Result<_, _>>()?)
    }

    async fn list_time_rules_for(&self, day_type: DayType) -> ApiResult<Vec<TimeRule>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM time_rules WHERE day_type = ? ORDER BY start_time, end_time",
            RULE_COLUMNS
        ))
        .bind(day_type.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_rule).collect::<Result<_, _>>()?)
    }

    async fn get_time_rule(&self, id: &str) -> ApiResult<Option<TimeRule>> {
        let row = sqlx::query(&format!("SELECT {} FROM time_rules WHERE id = ?", RULE_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(row_to_rule).transpose()?)
    }

    async fn create_time_rule(&self, rule: &TimeRule) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO time_rules (id, day_type, rule_name, start_time, end_time, is_blocked, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&rule.id)
        .bind(rule.day_type.as_str())
        .bind(&rule.rule_name)
        .bind(rule.start_time.to_string())
        .bind(rule.end_time.to_string())
        .bind(flag(rule.is_blocked))
        .bind(&rule.created_at)
        .bind(&rule.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                duplicate_name(&rule.rule_name, rule.day_type)
            } else {
                ApiError::from(e)
            }
        })?;

        tracing::info!(
            "Time rule created: id={}, {} '{}' {}-{}",
            rule.id,
            rule.day_type,
            rule.rule_name,
            rule.start_time,
            rule.end_time
        );
        Ok(())
    }

    async fn update_time_rules(&self, updates: &[(String, TimeRuleSpec)]) -> ApiResult<Vec<TimeRule>> {
        let now = chrono::Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        for (id, spec) in updates {
            let result = sqlx::query(
                "UPDATE time_rules
                 SET day_type = ?, rule_name = ?, start_time = ?, end_time = ?, is_blocked = ?, updated_at = ?
                 WHERE id = ?",
            )
            .bind(spec.day_type.as_str())
            .bind(&spec.rule_name)
            .bind(spec.start_time.to_string())
            .bind(spec.end_time.to_string())
            .bind(flag(spec.is_blocked))
            .bind(&now)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    duplicate_name(&spec.rule_name, spec.day_type)
                } else {
                    ApiError::from(e)
                }
            })?;

            if result.rows_affected() == 0 {
                // Dropping the transaction rolls back earlier updates
                return Err(ApiError::NotFound(format!("Time rule {} not found", id)));
            }
        }

        let mut updated = Vec::with_capacity(updates.len());
        for (id, _) in updates {
            let row = sqlx::query(&format!("SELECT {} FROM time_rules WHERE id = ?", RULE_COLUMNS))
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
            updated.push(row_to_rule(&row)?);
        }

        tx.commit().await?;

        tracing::info!("Updated {} time rules", updated.len());
        Ok(updated)
    }

    async fn delete_time_rule(&self, id: &str) -> ApiResult<bool> {
        let result = sqlx::query("DELETE FROM time_rules WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            tracing::info!("Time rule deleted: id={}", id);
        }
        Ok(result.rows_affected() > 0)
    }
}
