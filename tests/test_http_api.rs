use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use shelter_walks::domain::entities::ExperienceLevel;
use shelter_walks::infrastructure::http::router::build_router;
use tower::ServiceExt;

mod helpers;
use helpers::*;

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

#[tokio::test]
async fn test_book_conflict_then_block_cancels() {
    let test_app = setup_test_app().await;
    let db = test_app.db();
    clear_time_rules(&db).await;
    let admin = create_test_admin(&db).await;
    let walker = create_test_walker(&db, "Anna", ExperienceLevel::Green, false).await;
    let dog = create_test_dog(&db, "Bello", ExperienceLevel::Green).await;
    let admin_token = create_test_session(&db, &admin.id).await;
    let walker_token = create_test_session(&db, &walker.id).await;
    let app = build_router(test_app.state.clone());

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/rules",
        Some(&admin_token),
        Some(json!({
            "day_type": "weekday",
            "rule_name": "Morning walk",
            "start_time": "09:00",
            "end_time": "12:00",
            "is_blocked": false
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let booking_body = json!({
        "dog_id": dog.id,
        "date": "2025-06-03",
        "scheduled_time": "09:00"
    });

    let (status, booking) = send(
        &app,
        Method::POST,
        "/api/bookings",
        Some(&walker_token),
        Some(booking_body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["status"], "scheduled");
    let booking_id = booking["id"].as_str().unwrap().to_string();

    let (status, error) = send(
        &app,
        Method::POST,
        "/api/bookings",
        Some(&walker_token),
        Some(booking_body),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(error["error"].is_string());

    let (status, block) = send(
        &app,
        Method::POST,
        "/api/blocked-dates",
        Some(&admin_token),
        Some(json!({ "date": "2025-06-03", "reason": "Staff outing" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(block["cancelled_bookings"], 1);
    assert_eq!(block["failed_cancellations"], 0);

    let (status, booking) = send(
        &app,
        Method::GET,
        &format!("/api/bookings/{}", booking_id),
        Some(&walker_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booking["status"], "cancelled");
}

#[tokio::test]
async fn test_identity_and_admin_gates() {
    let test_app = setup_test_app().await;
    let db = test_app.db();
    let walker = create_test_walker(&db, "Anna", ExperienceLevel::Green, false).await;
    let token = create_test_session(&db, &walker.id).await;
    let app = build_router(test_app.state.clone());

    let (status, _) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/api/available-slots?date=2025-06-03", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/available-slots?date=2025-06-03",
        Some("not-a-session"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, slots) = send(
        &app,
        Method::GET,
        "/api/available-slots?date=2025-06-03",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(slots["day_type"], "weekday");
    assert_eq!(slots["slots"][0]["start_time"], "09:00");

    for (method, uri) in [
        (Method::GET, "/api/settings"),
        (Method::GET, "/api/rules"),
        (Method::GET, "/api/blocked-dates"),
        (Method::GET, "/api/bookings/pending"),
    ] {
        let (status, _) = send(&app, method, uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} should be admin-only", uri);
    }

    let (status, rules) = send(
        &app,
        Method::GET,
        "/api/rules/for-date?date=2025-06-07",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rules["day_type"], "weekend");
}

#[tokio::test]
async fn test_public_holiday_listing() {
    let test_app = setup_test_app().await;
    test_app
        .holidays
        .set_holidays(vec![("2025-10-03", "Tag der Deutschen Einheit")]);
    let app = build_router(test_app.state.clone());

    let (status, body) = send(&app, Method::GET, "/api/holidays?year=2025", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["year"], 2025);
    assert_eq!(body["count"], 1);
    assert_eq!(body["holidays"][0]["source"], "api");

    // Defaults to the current year
    let (status, body) = send(&app, Method::GET, "/api/holidays", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["year"], 2025);

    let (status, _) = send(&app, Method::GET, "/api/holidays?year=1800", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_settings_and_review_endpoints() {
    let test_app = setup_test_app().await;
    let db = test_app.db();
    let admin = create_test_admin(&db).await;
    let walker = create_test_walker(&db, "Anna", ExperienceLevel::Green, false).await;
    let dog = create_test_dog(&db, "Bello", ExperienceLevel::Green).await;
    let admin_token = create_test_session(&db, &admin.id).await;
    let walker_token = create_test_session(&db, &walker.id).await;
    let app = build_router(test_app.state.clone());

    let (status, settings) = send(
        &app,
        Method::PUT,
        "/api/settings/booking_time_granularity",
        Some(&admin_token),
        Some(json!({ "value": 30 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["booking_time_granularity"], 30);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/settings/booking_time_granularity",
        Some(&admin_token),
        Some(json!({ "value": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, booking) = send(
        &app,
        Method::POST,
        "/api/bookings",
        Some(&walker_token),
        Some(json!({
            "dog_id": dog.id,
            "date": "2025-06-04",
            "scheduled_time": "10:00",
            "user_notes": "Can bring treats"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["approval_status"], "pending");
    let booking_id = booking["id"].as_str().unwrap().to_string();

    let (status, pending) = send(
        &app,
        Method::GET,
        "/api/bookings/pending",
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pending["count"], 1);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/bookings/{}/deny", booking_id),
        Some(&admin_token),
        Some(json!({ "reason": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, approved) = send(
        &app,
        Method::PUT,
        &format!("/api/bookings/{}/approve", booking_id),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["approval_status"], "approved");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/bookings/{}/cancel", booking_id),
        Some(&walker_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
