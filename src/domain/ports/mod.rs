pub mod blocked_date_repository;
pub mod booking_repository;
pub mod clock;
pub mod directory_repository;
pub mod holiday_repository;
pub mod holiday_source;
pub mod notification_sink;
pub mod settings_repository;
pub mod task_spawner;
pub mod time_rule_repository;

pub use blocked_date_repository::BlockedDateRepository;
pub use booking_repository::BookingRepository;
pub use clock::Clock;
pub use directory_repository::DirectoryRepository;
pub use holiday_repository::HolidayRepository;
pub use holiday_source::{HolidaySource, HolidaySourceError};
pub use notification_sink::{BookingNotice, BookingNotification, NotificationSink};
pub use settings_repository::SettingsRepository;
pub use task_spawner::TaskSpawner;
pub use time_rule_repository::TimeRuleRepository;
