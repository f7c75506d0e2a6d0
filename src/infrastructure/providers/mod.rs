pub mod feiertage_client;
pub mod notification;

pub use feiertage_client::FeiertageClient;
pub use notification::{LoggingNotificationSink, SmtpNotificationSink, SmtpSettings};
