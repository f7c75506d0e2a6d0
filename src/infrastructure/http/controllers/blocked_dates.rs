use crate::{
    domain::entities::{BlockCreatedResponse, BlockedDate, CreateBlockedDateRequest},
    infrastructure::http::middleware::{ApiResult, AppState, AuthenticatedUser},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

/// GET /api/blocked-dates
pub async fn list_blocked_dates(State(state): State<AppState>) -> ApiResult<Json<Vec<BlockedDate>>> {
    let blocked = state.blocked_date_service.list_blocked_dates().await?;
    Ok(Json(blocked))
}

/// POST /api/blocked-dates - Block a date and cancel the bookings it covers
pub async fn create_blocked_date(
    State(state): State<AppState>,
    axum::Extension(auth_user): axum::Extension<AuthenticatedUser>,
    Json(request): Json<CreateBlockedDateRequest>,
) -> ApiResult<(StatusCode, Json<BlockCreatedResponse>)> {
    let response = state
        .blocked_date_service
        .create_blocked_date(request, auth_user.id())
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// DELETE /api/blocked-dates/:id
pub async fn delete_blocked_date(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.blocked_date_service.delete_blocked_date(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
