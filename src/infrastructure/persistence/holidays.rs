use super::{decode_flag, decode_optional, decode_text, flag};
use crate::domain::entities::{
    format_date, ExternalHoliday, Holiday, HolidayCacheEntry, HolidayChanges,
};
use crate::domain::ports::HolidayRepository;
use crate::infrastructure::http::middleware::error::{is_unique_violation, ApiError, ApiResult};
use crate::infrastructure::persistence::Database;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::Row;

const HOLIDAY_COLUMNS: &str = "id, date, name, is_active, source, created_by, created_at";

fn row_to_holiday(row: &sqlx::any::AnyRow) -> Result<Holiday, sqlx::Error> {
    Ok(Holiday {
        id: row.try_get("id")?,
        date: decode_text(row, "date")?,
        name: row.try_get("name")?,
        is_active: decode_flag(row, "is_active")?,
        source: decode_text(row, "source")?,
        created_by: decode_optional(row, "created_by")?,
        created_at: row.try_get("created_at")?,
    })
}

fn duplicate_date(date: NaiveDate) -> ApiError {
    ApiError::Conflict(format!("A holiday on {} already exists", format_date(date)))
}

fn parse_timestamp(row: &sqlx::any::AnyRow, column: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
}

#[async_trait]
impl HolidayRepository for Database {
    async fn create_holiday(&self, holiday: &Holiday) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO holidays (id, date, name, is_active, source, created_by, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&holiday.id)
        .bind(format_date(holiday.date))
        .bind(&holiday.name)
        .bind(flag(holiday.is_active))
        .bind(holiday.source.to_string())
        .bind(&holiday.created_by)
        .bind(&holiday.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                duplicate_date(holiday.date)
            } else {
                ApiError::from(e)
            }
        })?;

        tracing::info!("Holiday created: id={}, date={}, name={}", holiday.id, holiday.date, holiday.name);
        Ok(())
    }

    async fn get_holiday(&self, id: &str) -> ApiResult<Option<Holiday>> {
        let row = sqlx::query(&format!("SELECT {} FROM holidays WHERE id = ?", HOLIDAY_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(row_to_holiday).transpose()?)
    }

    async fn find_holiday_on(&self, date: NaiveDate) -> ApiResult<Option<Holiday>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM holidays WHERE date = ?",
            HOLIDAY_COLUMNS
        ))
        .bind(format_date(date))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_holiday).transpose()?)
    }

    async fn list_holidays_between(&self, from: NaiveDate, to: NaiveDate) -> ApiResult<Vec<Holiday>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM holidays WHERE date >= ? AND date <= ? ORDER BY date",
            HOLIDAY_COLUMNS
        ))
        .bind(format_date(from))
        .bind(format_date(to))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_holiday).collect::<Result<_, _>>()?)
    }

    async fn update_holiday(&self, id: &str, changes: &HolidayChanges) -> ApiResult<Option<Holiday>> {
        let Some(mut holiday) = self.get_holiday(id).await? else {
            return Ok(None);
        };

        if let Some(date) = changes.date {
            holiday.date = date;
        }
        if let Some(name) = &changes.name {
            holiday.name = name.clone();
        }
        if let Some(is_active) = changes.is_active {
            holiday.is_active = is_active;
        }

        sqlx::query("UPDATE holidays SET date = ?, name = ?, is_active = ? WHERE id = ?")
            .bind(format_date(holiday.date))
            .bind(&holiday.name)
            .bind(flag(holiday.is_active))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    duplicate_date(holiday.date)
                } else {
                    ApiError::from(e)
                }
            })?;

        tracing::info!("Holiday updated: id={}", id);
        Ok(Some(holiday))
    }

    async fn delete_holiday(&self, id: &str) -> ApiResult<bool> {
        let result = sqlx::query("DELETE FROM holidays WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_cached_holidays(&self, year: i32, region_code: &str) -> ApiResult<Option<HolidayCacheEntry>> {
        let row = sqlx::query(
            "SELECT holidays, fetched_at, expires_at
             FROM holiday_cache
             WHERE year = ? AND region_code = ?",
        )
        .bind(i64::from(year))
        .bind(region_code)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let payload: String = row.try_get("holidays")?;
        let holidays: Vec<ExternalHoliday> = match serde_json::from_str(&payload) {
            Ok(holidays) => holidays,
            Err(e) => {
                // A corrupt row is treated as a miss and replaced on the next fetch
                tracing::warn!("Discarding unreadable holiday cache for {}/{}: {}", year, region_code, e);
                return Ok(None);
            }
        };

        Ok(Some(HolidayCacheEntry {
            year,
            region_code: region_code.to_string(),
            holidays,
            fetched_at: parse_timestamp(&row, "fetched_at")?,
            expires_at: parse_timestamp(&row, "expires_at")?,
        }))
    }

    async fn upsert_cached_holidays(&self, entry: &HolidayCacheEntry) -> ApiResult<()> {
        let payload = serde_json::to_string(&entry.holidays)
            .map_err(|e| ApiError::Internal(format!("Failed to serialize holidays: {}", e)))?;

        sqlx::query(
            "INSERT INTO holiday_cache (year, region_code, holidays, fetched_at, expires_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(year, region_code) DO UPDATE SET
                holidays = excluded.holidays,
                fetched_at = excluded.fetched_at,
                expires_at = excluded.expires_at",
        )
        .bind(i64::from(entry.year))
        .bind(&entry.region_code)
        .bind(payload)
        .bind(entry.fetched_at.to_rfc3339())
        .bind(entry.expires_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        tracing::debug!(
            "Holiday cache stored for {}/{} ({} entries, expires {})",
            entry.year,
            entry.region_code,
            entry.holidays.len(),
            entry.expires_at
        );
        Ok(())
    }
}
