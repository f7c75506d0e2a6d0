use super::{decode_flag, decode_text};
use crate::domain::entities::{Dog, Session, Walker};
use crate::domain::ports::DirectoryRepository;
use crate::infrastructure::http::middleware::error::ApiResult;
use crate::infrastructure::persistence::Database;
use async_trait::async_trait;
use sqlx::Row;

#[async_trait]
impl DirectoryRepository for Database {
    async fn get_walker(&self, id: &str) -> ApiResult<Option<Walker>> {
        let row = sqlx::query(
            "SELECT id, email, name, is_admin, is_active, experience_level
             FROM users
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            Ok(Some(Walker {
                id: row.try_get("id")?,
                email: row.try_get("email")?,
                name: row.try_get("name")?,
                is_admin: decode_flag(&row, "is_admin")?,
                is_active: decode_flag(&row, "is_active")?,
                experience_level: decode_text(&row, "experience_level")?,
            }))
        } else {
            Ok(None)
        }
    }

    async fn get_dog(&self, id: &str) -> ApiResult<Option<Dog>> {
        let row = sqlx::query("SELECT id, name, required_level, is_available FROM dogs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(row) = row {
            Ok(Some(Dog {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                required_level: decode_text(&row, "required_level")?,
                is_available: decode_flag(&row, "is_available")?,
            }))
        } else {
            Ok(None)
        }
    }

    async fn get_session(&self, token: &str) -> ApiResult<Option<Session>> {
        let row = sqlx::query("SELECT token, user_id, expires_at FROM sessions WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(row) = row {
            Ok(Some(Session {
                token: row.try_get("token")?,
                user_id: row.try_get("user_id")?,
                expires_at: row.try_get("expires_at")?,
            }))
        } else {
            Ok(None)
        }
    }
}
