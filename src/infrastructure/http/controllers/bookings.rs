use crate::{
    domain::entities::{
        Booking, BookingFilter, BookingListResponse, CancelBookingRequest, CreateBookingRequest,
        DenyBookingRequest,
    },
    infrastructure::http::middleware::{ApiResult, AppState, AuthenticatedUser},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

/// POST /api/bookings - Request a walk
pub async fn create_booking(
    State(state): State<AppState>,
    axum::Extension(auth_user): axum::Extension<AuthenticatedUser>,
    Json(request): Json<CreateBookingRequest>,
) -> ApiResult<(StatusCode, Json<Booking>)> {
    let settings = state.settings_service.load().await?;

    let booking = state
        .booking_service
        .create_booking(&auth_user.walker, request, &settings)
        .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /api/bookings - Own bookings, or all bookings for admins
pub async fn list_bookings(
    State(state): State<AppState>,
    axum::Extension(auth_user): axum::Extension<AuthenticatedUser>,
    Query(filter): Query<BookingFilter>,
) -> ApiResult<Json<BookingListResponse>> {
    let response = state
        .booking_service
        .list_bookings(&auth_user.walker, filter)
        .await?;
    Ok(Json(response))
}

/// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<AppState>,
    axum::Extension(auth_user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Booking>> {
    let booking = state
        .booking_service
        .get_booking(&auth_user.walker, &id)
        .await?;
    Ok(Json(booking))
}

/// PUT /api/bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<AppState>,
    axum::Extension(auth_user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    request: Option<Json<CancelBookingRequest>>,
) -> ApiResult<Json<Booking>> {
    let settings = state.settings_service.load().await?;
    let request = request.map(|Json(r)| r).unwrap_or_default();

    let booking = state
        .booking_service
        .cancel_booking(&auth_user.walker, &id, request, &settings)
        .await?;
    Ok(Json(booking))
}

/// GET /api/bookings/pending - Bookings awaiting review
pub async fn list_pending(State(state): State<AppState>) -> ApiResult<Json<BookingListResponse>> {
    let response = state.approval_service.list_pending().await?;
    Ok(Json(response))
}

/// PUT /api/bookings/:id/approve
pub async fn approve_booking(
    State(state): State<AppState>,
    axum::Extension(auth_user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Booking>> {
    let booking = state.approval_service.approve(&id, auth_user.id()).await?;
    Ok(Json(booking))
}

/// PUT /api/bookings/:id/deny
pub async fn deny_booking(
    State(state): State<AppState>,
    axum::Extension(auth_user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<DenyBookingRequest>,
) -> ApiResult<Json<Booking>> {
    let booking = state
        .approval_service
        .deny(&id, auth_user.id(), request)
        .await?;
    Ok(Json(booking))
}

/// PUT /api/bookings/:id/complete
pub async fn complete_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Booking>> {
    let booking = state.booking_service.complete_booking(&id).await?;
    Ok(Json(booking))
}
