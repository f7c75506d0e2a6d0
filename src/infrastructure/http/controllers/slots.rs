use crate::{
    domain::entities::DaySlots,
    infrastructure::http::middleware::{ApiResult, AppState},
};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub date: Option<String>,
    pub dog_id: Option<String>,
}

/// GET /api/available-slots?date=YYYY-MM-DD&dog_id=... - Bookable slots of a date
pub async fn get_available_slots(
    State(state): State<AppState>,
    Query(query): Query<SlotQuery>,
) -> ApiResult<Json<DaySlots>> {
    let settings = state.settings_service.load().await?;

    let slots = state
        .slot_service
        .available_slots(query.date.as_deref(), query.dog_id.as_deref(), &settings)
        .await?;

    Ok(Json(slots))
}
