use super::test_db::{setup_test_db, TestDatabase};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use futures::future::BoxFuture;
use shelter_walks::bootstrap::{assemble_state, Adapters};
use shelter_walks::domain::entities::{BookingSettings, ExternalHoliday};
use shelter_walks::domain::ports::{
    BookingNotification, Clock, HolidaySource, HolidaySourceError, NotificationSink, TaskSpawner,
};
use shelter_walks::infrastructure::http::middleware::AppState;
use shelter_walks::infrastructure::persistence::Database;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Monday 2025-06-02, 08:00 shelter time
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Clock pinned to a settable instant; shelter time equals UTC
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.local_now())
    }

    fn local_now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap()
    }
}

/// Holiday source returning a configurable list and counting calls
#[derive(Default)]
pub struct MockHolidaySource {
    holidays: Mutex<Vec<ExternalHoliday>>,
    calls: AtomicUsize,
    failing: AtomicBool,
    hanging: AtomicBool,
}

impl MockHolidaySource {
    pub fn set_holidays(&self, holidays: Vec<(&str, &str)>) {
        *self.holidays.lock().unwrap() = holidays
            .into_iter()
            .map(|(d, name)| ExternalHoliday {
                date: date(d),
                name: name.to_string(),
            })
            .collect();
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Makes every fetch outlast the fetch timeout
    pub fn set_hanging(&self, hanging: bool) {
        self.hanging.store(hanging, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl HolidaySource for MockHolidaySource {
    async fn fetch_holidays(
        &self,
        _year: i32,
        _region: &str,
    ) -> Result<Vec<ExternalHoliday>, HolidaySourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.hanging.load(Ordering::SeqCst) {
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(HolidaySourceError::Status(503));
        }
        Ok(self.holidays.lock().unwrap().clone())
    }
}

/// Keeps every notification it is asked to send
#[derive(Default)]
pub struct RecordingNotificationSink {
    sent: Mutex<Vec<BookingNotification>>,
}

impl RecordingNotificationSink {
    pub fn sent(&self) -> Vec<BookingNotification> {
        self.sent.lock().unwrap().clone()
    }

    /// Notifications are dispatched in the background; poll until `count` arrived
    pub async fn wait_for(&self, count: usize) -> Vec<BookingNotification> {
        for _ in 0..100 {
            if self.sent.lock().unwrap().len() >= count {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        self.sent()
    }
}

#[async_trait::async_trait]
impl NotificationSink for RecordingNotificationSink {
    async fn send(&self, notification: &BookingNotification) -> Result<(), String> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

pub struct TestTokioSpawner;

impl TaskSpawner for TestTokioSpawner {
    fn spawn(&self, future: BoxFuture<'static, ()>) {
        tokio::spawn(future);
    }
}

/// Fully wired application on a fresh database
pub struct TestApp {
    pub test_db: TestDatabase,
    pub state: AppState,
    pub clock: Arc<FixedClock>,
    pub holidays: Arc<MockHolidaySource>,
    pub sink: Arc<RecordingNotificationSink>,
}

impl TestApp {
    pub fn db(&self) -> Database {
        self.test_db.db()
    }

    pub async fn settings(&self) -> BookingSettings {
        self.state
            .settings_service
            .load()
            .await
            .expect("Failed to load settings")
    }
}

/// Application pinned to Monday 2025-06-02 08:00 with the default rules seeded
pub async fn setup_test_app() -> TestApp {
    setup_test_app_at(monday().and_hms_opt(8, 0, 0).unwrap()).await
}

pub async fn setup_test_app_at(now: NaiveDateTime) -> TestApp {
    let test_db = setup_test_db().await;
    let clock = Arc::new(FixedClock::at(now));
    let holidays = Arc::new(MockHolidaySource::default());
    let sink = Arc::new(RecordingNotificationSink::default());

    let state = assemble_state(
        &test_db.db(),
        Adapters {
            holiday_source: holidays.clone(),
            notification_sink: sink.clone(),
            clock: clock.clone(),
            task_spawner: Arc::new(TestTokioSpawner),
            holiday_fetch_timeout: std::time::Duration::from_millis(200),
        },
    );

    TestApp {
        test_db,
        state,
        clock,
        holidays,
        sink,
    }
}
