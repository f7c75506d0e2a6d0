use crate::application::services::{
    ApprovalService, BlockedDateService, BookingService, CalendarService, SettingsService,
    SlotService, TimeRuleService,
};
use crate::domain::entities::Walker;
use crate::domain::ports::{Clock, DirectoryRepository};
use crate::infrastructure::http::middleware::error::ApiError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn DirectoryRepository>,
    pub clock: Arc<dyn Clock>,
    pub settings_service: SettingsService,
    pub calendar_service: CalendarService,
    pub time_rule_service: TimeRuleService,
    pub slot_service: SlotService,
    pub blocked_date_service: BlockedDateService,
    pub booking_service: BookingService,
    pub approval_service: ApprovalService,
}

/// The walker behind the bearer token of the current request
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub walker: Walker,
    pub token: String,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.walker.is_admin
    }

    pub fn id(&self) -> &str {
        &self.walker.id
    }
}

/// Resolves `Authorization: Bearer <token>` against stored sessions
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::Unauthorized)?
        .to_string();

    let session = state
        .directory
        .get_session(&token)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if session.is_expired(state.clock.now_utc()) {
        tracing::debug!("Rejected expired session for user {}", session.user_id);
        return Err(ApiError::Unauthorized);
    }

    // Inactive walkers still authenticate; admission rejects their bookings
    let walker = state
        .directory
        .get_walker(&session.user_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser { walker, token });

    Ok(next.run(request).await)
}

/// Admin gate; must run after `require_auth`
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or(ApiError::Unauthorized)?;

    if !auth_user.is_admin() {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(request).await)
}
