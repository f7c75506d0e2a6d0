use crate::{
    domain::entities::BookingSettings,
    infrastructure::http::middleware::{ApiError, ApiResult, AppState},
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct UpdateSettingRequest {
    #[serde(default)]
    pub value: Value,
}

/// GET /api/settings
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<Json<BookingSettings>> {
    let settings = state.settings_service.load().await?;
    Ok(Json(settings))
}

/// PUT /api/settings/:key - Accepts strings, numbers and booleans
pub async fn update_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<UpdateSettingRequest>,
) -> ApiResult<Json<BookingSettings>> {
    let value = match request.value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return Err(ApiError::BadRequest("value is required".to_string())),
    };

    let settings = state.settings_service.update(&key, &value).await?;
    Ok(Json(settings))
}
