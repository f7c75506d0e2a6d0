pub mod approval_service;
pub mod blocked_date_service;
pub mod booking_service;
pub mod calendar_service;
pub mod notifier;
pub mod settings_service;
pub mod slot_service;
pub mod time_rule_service;

pub use approval_service::ApprovalService;
pub use blocked_date_service::BlockedDateService;
pub use booking_service::BookingService;
pub use calendar_service::CalendarService;
pub use notifier::Notifier;
pub use settings_service::SettingsService;
pub use slot_service::SlotService;
pub use time_rule_service::TimeRuleService;
