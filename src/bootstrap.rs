use crate::application::services::*;
use crate::config::Config;
use crate::domain::ports::{
    BlockedDateRepository, BookingRepository, Clock, DirectoryRepository, HolidayRepository,
    HolidaySource, NotificationSink, SettingsRepository, TaskSpawner, TimeRuleRepository,
};
use crate::infrastructure::http::middleware::AppState;
use crate::infrastructure::persistence::Database;
use crate::infrastructure::providers::{
    FeiertageClient, LoggingNotificationSink, SmtpNotificationSink,
};
use crate::infrastructure::runtime::{SystemClock, TokioTaskSpawner};
use crate::infrastructure::workers::CompletionWorker;
use std::sync::Arc;
use std::time::Duration;

/// Adapters that differ between production and tests
pub struct Adapters {
    pub holiday_source: Arc<dyn HolidaySource>,
    pub notification_sink: Arc<dyn NotificationSink>,
    pub clock: Arc<dyn Clock>,
    pub task_spawner: Arc<dyn TaskSpawner>,
    pub holiday_fetch_timeout: Duration,
}

/// Wires every service on top of the database and the given adapters.
pub fn assemble_state(db: &Database, adapters: Adapters) -> AppState {
    let time_rule_repo: Arc<dyn TimeRuleRepository> = Arc::new(db.clone());
    let holiday_repo: Arc<dyn HolidayRepository> = Arc::new(db.clone());
    let blocked_repo: Arc<dyn BlockedDateRepository> = Arc::new(db.clone());
    let booking_repo: Arc<dyn BookingRepository> = Arc::new(db.clone());
    let directory: Arc<dyn DirectoryRepository> = Arc::new(db.clone());
    let settings_repo: Arc<dyn SettingsRepository> = Arc::new(db.clone());

    let settings_service = SettingsService::new(settings_repo);

    let calendar_service = CalendarService::new(
        holiday_repo,
        adapters.holiday_source,
        adapters.clock.clone(),
        adapters.holiday_fetch_timeout,
    );

    let time_rule_service = TimeRuleService::new(time_rule_repo);

    let notifier = Notifier::new(
        adapters.notification_sink,
        directory.clone(),
        adapters.task_spawner,
    );

    let slot_service = SlotService::new(
        calendar_service.clone(),
        time_rule_service.clone(),
        blocked_repo.clone(),
        booking_repo.clone(),
        adapters.clock.clone(),
    );

    let booking_service = BookingService::new(
        booking_repo.clone(),
        blocked_repo.clone(),
        directory.clone(),
        time_rule_service.clone(),
        notifier.clone(),
        adapters.clock.clone(),
    );

    let approval_service = ApprovalService::new(booking_repo.clone(), notifier.clone());

    let blocked_date_service =
        BlockedDateService::new(blocked_repo, booking_repo, directory.clone(), notifier);

    AppState {
        directory,
        clock: adapters.clock,
        settings_service,
        calendar_service,
        time_rule_service,
        slot_service,
        blocked_date_service,
        booking_service,
        approval_service,
    }
}

/// Builds the production state and starts the background workers.
pub async fn build_app_state(
    db: Database,
    config: &Config,
) -> Result<AppState, Box<dyn std::error::Error>> {
    let holiday_source = Arc::new(FeiertageClient::new(
        &config.holiday_api_base_url,
        config.holiday_fetch_timeout,
    )?) as Arc<dyn HolidaySource>;
    tracing::info!(
        "Holiday calendar client initialized ({})",
        config.holiday_api_base_url
    );

    let notification_sink: Arc<dyn NotificationSink> = match &config.smtp {
        Some(smtp) => {
            tracing::info!("Notifications are sent through SMTP relay {}", smtp.host);
            Arc::new(SmtpNotificationSink::new(smtp)?)
        }
        None => {
            tracing::info!("No SMTP relay configured, notifications are only logged");
            Arc::new(LoggingNotificationSink)
        }
    };

    let state = assemble_state(
        &db,
        Adapters {
            holiday_source,
            notification_sink,
            clock: Arc::new(SystemClock::new(config.timezone)),
            task_spawner: Arc::new(TokioTaskSpawner::new()),
            holiday_fetch_timeout: config.holiday_fetch_timeout,
        },
    );
    tracing::info!("Services initialized (timezone {})", config.timezone);

    let worker = CompletionWorker::new(state.booking_service.clone(), config.completion_interval);
    tokio::spawn(async move {
        worker.run().await;
    });
    tracing::info!("Completion worker started");

    Ok(state)
}
