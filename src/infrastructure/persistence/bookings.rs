use super::{decode_flag, decode_optional, decode_text, flag};
use crate::domain::entities::{format_date, Booking, BookingQuery, WallTime};
use crate::domain::ports::BookingRepository;
use crate::infrastructure::http::middleware::error::{is_unique_violation, ApiError, ApiResult};
use crate::infrastructure::persistence::Database;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::Row;

const BOOKING_COLUMNS: &str = "id, user_id, dog_id, date, scheduled_time, status, requires_approval, \
     approval_status, approved_by, approved_at, rejection_reason, admin_cancellation_reason, \
     user_notes, created_at, updated_at";

fn row_to_booking(row: &sqlx::any::AnyRow) -> Result<Booking, sqlx::Error> {
    Ok(Booking {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        dog_id: row.try_get("dog_id")?,
        date: decode_text(row, "date")?,
        scheduled_time: decode_text(row, "scheduled_time")?,
        status: decode_text(row, "status")?,
        requires_approval: decode_flag(row, "requires_approval")?,
        approval_status: decode_text(row, "approval_status")?,
        approved_by: decode_optional(row, "approved_by")?,
        approved_at: decode_optional(row, "approved_at")?,
        rejection_reason: decode_optional(row, "rejection_reason")?,
        admin_cancellation_reason: decode_optional(row, "admin_cancellation_reason")?,
        user_notes: decode_optional(row, "user_notes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl BookingRepository for Database {
    async fn create_booking(&self, booking: &Booking) -> ApiResult<()> {
        sqlx::query(&format!(
            "INSERT INTO bookings ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            BOOKING_COLUMNS
        ))
        .bind(&booking.id)
        .bind(&booking.user_id)
        .bind(&booking.dog_id)
        .bind(format_date(booking.date))
        .bind(booking.scheduled_time.to_string())
        .bind(booking.status.to_string())
        .bind(flag(booking.requires_approval))
        .bind(booking.approval_status.to_string())
        .bind(&booking.approved_by)
        .bind(&booking.approved_at)
        .bind(&booking.rejection_reason)
        .bind(&booking.admin_cancellation_reason)
        .bind(&booking.user_notes)
        .bind(&booking.created_at)
        .bind(&booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict(format!(
                    "The {} slot on {} is already booked for this dog",
                    booking.scheduled_time,
                    format_date(booking.date)
                ))
            } else {
                ApiError::from(e)
            }
        })?;

        tracing::info!(
            "Booking created: id={}, dog={}, {} {}, approval={}",
            booking.id,
            booking.dog_id,
            booking.date,
            booking.scheduled_time,
            booking.approval_status
        );
        Ok(())
    }

    async fn get_booking(&self, id: &str) -> ApiResult<Option<Booking>> {
        let row = sqlx::query(&format!("SELECT {} FROM bookings WHERE id = ?", BOOKING_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(row_to_booking).transpose()?)
    }

    async fn list_bookings(&self, query: &BookingQuery) -> ApiResult<Vec<Booking>> {
        let mut sql = format!("SELECT {} FROM bookings WHERE 1 = 1", BOOKING_COLUMNS);
        let mut params: Vec<String> = Vec::new();

        if let Some(user_id) = &query.user_id {
            sql.push_str(" AND user_id = ?");
            params.push(user_id.clone());
        }
        if let Some(dog_id) = &query.dog_id {
            sql.push_str(" AND dog_id = ?");
            params.push(dog_id.clone());
        }
        if let Some(from) = query.date_from {
            sql.push_str(" AND date >= ?");
            params.push(format_date(from));
        }
        if let Some(to) = query.date_to {
            sql.push_str(" AND date <= ?");
            params.push(format_date(to));
        }
        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            params.push(status.to_string());
        }
        sql.push_str(" ORDER BY date, scheduled_time, created_at");

        let mut q = sqlx::query(&sql);
        for param in &params {
            q = q.bind(param);
        }
        let rows = q.fetch_all(&self.pool).await?;

        Ok(rows.iter().map(row_to_booking).collect::<Result<_, _>>()?)
    }

    async fn list_pending_bookings(&self) -> ApiResult<Vec<Booking>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM bookings
             WHERE approval_status = 'pending' AND status = 'scheduled'
             ORDER BY date, scheduled_time",
            BOOKING_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_booking).collect::<Result<_, _>>()?)
    }

    async fn occupied_times(&self, dog_id: &str, date: NaiveDate) -> ApiResult<Vec<WallTime>> {
        let rows = sqlx::query(
            "SELECT scheduled_time FROM bookings
             WHERE dog_id = ? AND date = ? AND status = 'scheduled' AND approval_status <> 'denied'",
        )
        .bind(dog_id)
        .bind(format_date(date))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| decode_text(row, "scheduled_time"))
            .collect::<Result<_, _>>()?)
    }

    async fn cancel_booking(&self, id: &str, admin_reason: Option<&str>) -> ApiResult<bool> {
        let result = sqlx::query(
            "UPDATE bookings
             SET status = 'cancelled', admin_cancellation_reason = COALESCE(?, admin_cancellation_reason), updated_at = ?
             WHERE id = ? AND status = 'scheduled'",
        )
        .bind(admin_reason)
        .bind(chrono::Utc::now().to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn approve_booking(&self, id: &str, reviewer_id: &str) -> ApiResult<bool> {
        let now = chrono::Utc::now().to_rfc3339();
        let result = sqlx::query(
            "UPDATE bookings
             SET approval_status = 'approved', approved_by = ?, approved_at = ?, updated_at = ?
             WHERE id = ? AND approval_status = 'pending' AND status = 'scheduled'",
        )
        .bind(reviewer_id)
        .bind(&now)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn deny_booking(&self, id: &str, reviewer_id: &str, reason: &str) -> ApiResult<bool> {
        let now = chrono::Utc::now().to_rfc3339();
        let result = sqlx::query(
            "UPDATE bookings
             SET approval_status = 'denied', status = 'cancelled', rejection_reason = ?,
                 approved_by = ?, approved_at = ?, updated_at = ?
             WHERE id = ? AND approval_status = 'pending' AND status = 'scheduled'",
        )
        .bind(reason)
        .bind(reviewer_id)
        .bind(&now)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn complete_booking(&self, id: &str) -> ApiResult<bool> {
        let result = sqlx::query(
            "UPDATE bookings SET status = 'completed', updated_at = ?
             WHERE id = ? AND status = 'scheduled'",
        )
        .bind(chrono::Utc::now().to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn complete_elapsed_bookings(&self, today: NaiveDate) -> ApiResult<u64> {
        let result = sqlx::query(
            "UPDATE bookings SET status = 'completed', updated_at = ?
             WHERE status = 'scheduled' AND approval_status = 'approved' AND date < ?",
        )
        .bind(chrono::Utc::now().to_rfc3339())
        .bind(format_date(today))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
