use crate::{
    domain::entities::{CreateHolidayRequest, Holiday, HolidayListResponse, UpdateHolidayRequest},
    infrastructure::http::middleware::{ApiError, ApiResult, AppState, AuthenticatedUser},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Datelike;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct HolidayYearQuery {
    pub year: Option<String>,
}

/// GET /api/holidays?year=YYYY - Admin and external holidays of a year
pub async fn list_holidays(
    State(state): State<AppState>,
    Query(query): Query<HolidayYearQuery>,
) -> ApiResult<Json<HolidayListResponse>> {
    let year = match query.year.as_deref().filter(|y| !y.is_empty()) {
        Some(raw) => raw
            .parse::<i32>()
            .ok()
            .filter(|y| (1900..=2200).contains(y))
            .ok_or_else(|| ApiError::BadRequest(format!("Invalid year '{}'", raw)))?,
        None => state.clock.today().year(),
    };

    let settings = state.settings_service.load().await?;
    let response = state
        .calendar_service
        .holidays_for_year(year, &settings)
        .await?;

    Ok(Json(response))
}

/// POST /api/holidays
pub async fn create_holiday(
    State(state): State<AppState>,
    axum::Extension(auth_user): axum::Extension<AuthenticatedUser>,
    Json(request): Json<CreateHolidayRequest>,
) -> ApiResult<(StatusCode, Json<Holiday>)> {
    let holiday = state
        .calendar_service
        .create_holiday(request, auth_user.id())
        .await?;
    Ok((StatusCode::CREATED, Json(holiday)))
}

/// PUT /api/holidays/:id
pub async fn update_holiday(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateHolidayRequest>,
) -> ApiResult<Json<Holiday>> {
    let holiday = state.calendar_service.update_holiday(&id, request).await?;
    Ok(Json(holiday))
}

/// DELETE /api/holidays/:id
pub async fn delete_holiday(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.calendar_service.delete_holiday(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
