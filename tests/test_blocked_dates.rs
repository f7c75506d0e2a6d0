use shelter_walks::domain::entities::{
    Booking, BookingStatus, CreateBlockedDateRequest, CreateBookingRequest, ExperienceLevel,
    Walker,
};
use shelter_walks::domain::ports::BookingNotice;
use shelter_walks::infrastructure::http::middleware::ApiError;

mod helpers;
use helpers::*;

async fn book(app: &TestApp, walker: &Walker, dog_id: &str, date: &str, time: &str) -> Booking {
    let settings = app.settings().await;
    app.state
        .booking_service
        .create_booking(
            walker,
            CreateBookingRequest {
                dog_id: dog_id.to_string(),
                date: date.to_string(),
                scheduled_time: time.to_string(),
                user_notes: None,
            },
            &settings,
        )
        .await
        .expect("Failed to create booking")
}

fn block(date: &str, dog_id: Option<&str>, reason: &str) -> CreateBlockedDateRequest {
    CreateBlockedDateRequest {
        date: date.to_string(),
        dog_id: dog_id.map(str::to_string),
        reason: reason.to_string(),
    }
}

async fn status_of(app: &TestApp, admin: &Walker, id: &str) -> BookingStatus {
    app.state
        .booking_service
        .get_booking(admin, id)
        .await
        .expect("Failed to load booking")
        .status
}

#[tokio::test]
async fn test_global_block_cancels_every_dog_on_that_date() {
    let app = setup_test_app().await;
    let db = app.db();
    let admin = create_test_admin(&db).await;
    let walker = create_test_walker(&db, "Anna", ExperienceLevel::Green, false).await;
    let bello = create_test_dog(&db, "Bello", ExperienceLevel::Green).await;
    let luna = create_test_dog(&db, "Luna", ExperienceLevel::Green).await;

    let a = book(&app, &walker, &bello.id, "2025-06-04", "14:00").await;
    let b = book(&app, &walker, &luna.id, "2025-06-04", "15:00").await;
    let other_day = book(&app, &walker, &bello.id, "2025-06-05", "14:00").await;

    let response = app
        .state
        .blocked_date_service
        .create_blocked_date(block("2025-06-04", None, "Storm warning"), &admin.id)
        .await
        .unwrap();

    assert_eq!(response.cancelled_bookings, 2);
    assert_eq!(response.failed_cancellations, 0);
    assert!(response.blocked_date.dog_id.is_none());

    assert_eq!(status_of(&app, &admin, &a.id).await, BookingStatus::Cancelled);
    assert_eq!(status_of(&app, &admin, &b.id).await, BookingStatus::Cancelled);
    assert_eq!(
        status_of(&app, &admin, &other_day.id).await,
        BookingStatus::Scheduled
    );

    let cancelled = app
        .state
        .booking_service
        .get_booking(&admin, &a.id)
        .await
        .unwrap();
    assert_eq!(
        cancelled.admin_cancellation_reason.as_deref(),
        Some("Date blocked by shelter: Storm warning")
    );

    let sent = app.sink.wait_for(2).await;
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|n| n.notice
        == BookingNotice::CancelledByBlock {
            reason: "Storm warning".to_string()
        }));
}

#[tokio::test]
async fn test_dog_block_cancels_only_that_dog() {
    let app = setup_test_app().await;
    let db = app.db();
    let admin = create_test_admin(&db).await;
    let walker = create_test_walker(&db, "Anna", ExperienceLevel::Green, false).await;
    let bello = create_test_dog(&db, "Bello", ExperienceLevel::Green).await;
    let luna = create_test_dog(&db, "Luna", ExperienceLevel::Green).await;

    let bello_walk = book(&app, &walker, &bello.id, "2025-06-04", "14:00").await;
    let luna_walk = book(&app, &walker, &luna.id, "2025-06-04", "14:00").await;

    let response = app
        .state
        .blocked_date_service
        .create_blocked_date(block("2025-06-04", Some(&bello.id), "Vet visit"), &admin.id)
        .await
        .unwrap();

    assert_eq!(response.cancelled_bookings, 1);
    assert_eq!(response.blocked_date.dog_name.as_deref(), Some("Bello"));
    assert_eq!(
        status_of(&app, &admin, &bello_walk.id).await,
        BookingStatus::Cancelled
    );
    assert_eq!(
        status_of(&app, &admin, &luna_walk.id).await,
        BookingStatus::Scheduled
    );
}

#[tokio::test]
async fn test_duplicate_scope_and_date_conflicts() {
    let app = setup_test_app().await;
    let db = app.db();
    let admin = create_test_admin(&db).await;
    let dog = create_test_dog(&db, "Bello", ExperienceLevel::Green).await;

    let service = &app.state.blocked_date_service;
    service
        .create_blocked_date(block("2025-06-10", None, "Closed"), &admin.id)
        .await
        .unwrap();

    let again = service
        .create_blocked_date(block("2025-06-10", None, "Closed again"), &admin.id)
        .await;
    assert!(matches!(again, Err(ApiError::Conflict(_))));

    // A dog block may coexist with a global block on the same date
    service
        .create_blocked_date(block("2025-06-10", Some(&dog.id), "Vet"), &admin.id)
        .await
        .expect("Dog block should not collide with the global block");

    let dog_again = service
        .create_blocked_date(block("2025-06-10", Some(&dog.id), "Vet"), &admin.id)
        .await;
    assert!(matches!(dog_again, Err(ApiError::Conflict(_))));

    let listed = service.list_blocked_dates().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed[0].dog_id.is_none(), "global block should list first");
    assert_eq!(listed[1].dog_name.as_deref(), Some("Bello"));
}

#[tokio::test]
async fn test_block_validation_and_delete() {
    let app = setup_test_app().await;
    let db = app.db();
    let admin = create_test_admin(&db).await;
    let service = &app.state.blocked_date_service;

    let unknown_dog = service
        .create_blocked_date(block("2025-06-10", Some("ghost"), "Vet"), &admin.id)
        .await;
    assert!(matches!(unknown_dog, Err(ApiError::NotFound(_))));

    let no_reason = service
        .create_blocked_date(block("2025-06-10", None, "  "), &admin.id)
        .await;
    assert!(matches!(no_reason, Err(ApiError::BadRequest(_))));

    let created = service
        .create_blocked_date(block("2025-06-10", None, "Closed"), &admin.id)
        .await
        .unwrap();
    assert_eq!(created.cancelled_bookings, 0);

    service
        .delete_blocked_date(&created.blocked_date.id)
        .await
        .unwrap();
    let gone = service.delete_blocked_date(&created.blocked_date.id).await;
    assert!(matches!(gone, Err(ApiError::NotFound(_))));

    // The date can be blocked again once the block is removed
    service
        .create_blocked_date(block("2025-06-10", None, "Closed"), &admin.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_one_failed_cancellation_does_not_stop_the_cascade() {
    let app = setup_test_app().await;
    let db = app.db();
    let admin = create_test_admin(&db).await;
    let walker = create_test_walker(&db, "Anna", ExperienceLevel::Green, false).await;
    let bello = create_test_dog(&db, "Bello", ExperienceLevel::Green).await;
    let luna = create_test_dog(&db, "Luna", ExperienceLevel::Green).await;
    let rex = create_test_dog(&db, "Rex", ExperienceLevel::Green).await;

    let a = book(&app, &walker, &bello.id, "2025-06-04", "14:00").await;
    let locked = book(&app, &walker, &luna.id, "2025-06-04", "14:30").await;
    let c = book(&app, &walker, &rex.id, "2025-06-04", "15:00").await;

    // Any write to this one booking aborts
    sqlx::query(&format!(
        "CREATE TRIGGER lock_booking BEFORE UPDATE ON bookings
         WHEN OLD.id = '{}'
         BEGIN SELECT RAISE(ABORT, 'booking is locked'); END",
        locked.id
    ))
    .execute(db.pool())
    .await
    .expect("Failed to create trigger");

    let response = app
        .state
        .blocked_date_service
        .create_blocked_date(block("2025-06-04", None, "Storm warning"), &admin.id)
        .await
        .unwrap();

    assert_eq!(response.cancelled_bookings, 2);
    assert_eq!(response.failed_cancellations, 1);
    assert!(response.cascade_error.is_none());

    let listed = app.state.blocked_date_service.list_blocked_dates().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, response.blocked_date.id);

    assert_eq!(status_of(&app, &admin, &a.id).await, BookingStatus::Cancelled);
    assert_eq!(status_of(&app, &admin, &c.id).await, BookingStatus::Cancelled);
    assert_eq!(
        status_of(&app, &admin, &locked.id).await,
        BookingStatus::Scheduled
    );

    let sent = app.sink.wait_for(2).await;
    assert_eq!(sent.len(), 2);
}

#[tokio::test]
async fn test_unloadable_bookings_are_reported_with_the_block() {
    let app = setup_test_app().await;
    let db = app.db();
    let admin = create_test_admin(&db).await;

    sqlx::query("DROP TABLE bookings")
        .execute(db.pool())
        .await
        .expect("Failed to drop bookings");

    let response = app
        .state
        .blocked_date_service
        .create_blocked_date(block("2025-06-04", None, "Storm warning"), &admin.id)
        .await
        .expect("Block should be stored even when the cascade cannot run");

    assert_eq!(response.cancelled_bookings, 0);
    assert_eq!(response.failed_cancellations, 0);
    let error = response.cascade_error.expect("Load failure should be reported");
    assert!(error.contains("2025-06-04"));

    let listed = app.state.blocked_date_service.list_blocked_dates().await.unwrap();
    assert_eq!(listed.len(), 1);
}
