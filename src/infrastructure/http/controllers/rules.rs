use crate::{
    domain::entities::{
        CreateTimeRuleRequest, RulesByDayType, RulesForDateResponse, TimeRule,
        UpdateTimeRuleRequest,
    },
    infrastructure::http::middleware::{ApiResult, AppState},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RulesForDateQuery {
    pub date: Option<String>,
}

/// GET /api/rules - All rules grouped by day type
pub async fn list_rules(State(state): State<AppState>) -> ApiResult<Json<RulesByDayType>> {
    let rules = state.time_rule_service.list_rules().await?;
    Ok(Json(rules))
}

/// GET /api/rules/for-date?date=YYYY-MM-DD - Rules applying to a date
pub async fn rules_for_date(
    State(state): State<AppState>,
    Query(query): Query<RulesForDateQuery>,
) -> ApiResult<Json<RulesForDateResponse>> {
    let response = state
        .time_rule_service
        .rules_for_date(query.date.as_deref())
        .await?;
    Ok(Json(response))
}

/// POST /api/rules - Create a rule
pub async fn create_rule(
    State(state): State<AppState>,
    Json(request): Json<CreateTimeRuleRequest>,
) -> ApiResult<(StatusCode, Json<TimeRule>)> {
    let rule = state.time_rule_service.create_rule(request).await?;
    Ok((StatusCode::CREATED, Json(rule)))
}

/// PUT /api/rules - Replace several rules at once
pub async fn update_rules(
    State(state): State<AppState>,
    Json(requests): Json<Vec<UpdateTimeRuleRequest>>,
) -> ApiResult<Json<Vec<TimeRule>>> {
    let rules = state.time_rule_service.update_rules(requests).await?;
    Ok(Json(rules))
}

/// DELETE /api/rules/:id
pub async fn delete_rule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.time_rule_service.delete_rule(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
