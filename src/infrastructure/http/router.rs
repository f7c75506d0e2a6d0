use crate::infrastructure::http::controllers as api;
use crate::infrastructure::http::middleware::{require_admin, require_auth, AppState};
use axum::{
    http::{header, Method},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    // Admin-only routes
    let admin = Router::new()
        .route("/api/rules", get(api::rules::list_rules))
        .route("/api/rules", post(api::rules::create_rule))
        .route("/api/rules", put(api::rules::update_rules))
        .route("/api/rules/:id", delete(api::rules::delete_rule))
        .route("/api/holidays", post(api::holidays::create_holiday))
        .route("/api/holidays/:id", put(api::holidays::update_holiday))
        .route("/api/holidays/:id", delete(api::holidays::delete_holiday))
        .route(
            "/api/blocked-dates",
            get(api::blocked_dates::list_blocked_dates),
        )
        .route(
            "/api/blocked-dates",
            post(api::blocked_dates::create_blocked_date),
        )
        .route(
            "/api/blocked-dates/:id",
            delete(api::blocked_dates::delete_blocked_date),
        )
        .route("/api/bookings/pending", get(api::bookings::list_pending))
        .route(
            "/api/bookings/:id/approve",
            put(api::bookings::approve_booking),
        )
        .route("/api/bookings/:id/deny", put(api::bookings::deny_booking))
        .route(
            "/api/bookings/:id/complete",
            put(api::bookings::complete_booking),
        )
        .route("/api/settings", get(api::settings::get_settings))
        .route("/api/settings/:key", put(api::settings::update_setting))
        .layer(axum::middleware::from_fn(require_admin))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    // Routes for any signed-in walker
    let protected = Router::new()
        .route(
            "/api/available-slots",
            get(api::slots::get_available_slots),
        )
        .route("/api/rules/for-date", get(api::rules::rules_for_date))
        .route("/api/bookings", post(api::bookings::create_booking))
        .route("/api/bookings", get(api::bookings::list_bookings))
        .route("/api/bookings/:id", get(api::bookings::get_booking))
        .route(
            "/api/bookings/:id/cancel",
            put(api::bookings::cancel_booking),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_origin(Any);

    // Public routes
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/holidays", get(api::holidays::list_holidays))
        .merge(admin)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_handler() -> &'static str {
    "OK"
}
