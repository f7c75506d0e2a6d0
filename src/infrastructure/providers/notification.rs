use crate::domain::ports::{BookingNotification, NotificationSink};
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message as LettreMessage, Tokio1Executor,
};

/// Writes notifications to the log; used when no SMTP relay is configured
#[derive(Clone, Default)]
pub struct LoggingNotificationSink;

#[async_trait::async_trait]
impl NotificationSink for LoggingNotificationSink {
    async fn send(&self, notification: &BookingNotification) -> Result<(), String> {
        tracing::info!(
            walker = %notification.walker.email,
            booking = %notification.booking.id,
            kind = %notification.notice,
            "{}",
            notification.subject()
        );
        Ok(())
    }
}

/// SMTP relay settings
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

/// Sends notifications as plain-text mail over SMTP (STARTTLS)
pub struct SmtpNotificationSink {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpNotificationSink {
    pub fn new(settings: &SmtpSettings) -> Result<Self, String> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| format!("Failed to create SMTP transport: {}", e))?;

        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            mailer: builder.build(),
            from: settings.from.clone(),
        })
    }
}

#[async_trait::async_trait]
impl NotificationSink for SmtpNotificationSink {
    async fn send(&self, notification: &BookingNotification) -> Result<(), String> {
        let email = LettreMessage::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| format!("Invalid from address: {}", e))?,
            )
            .to(notification
                .walker
                .email
                .parse()
                .map_err(|e| format!("Invalid to address: {}", e))?)
            .subject(notification.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body())
            .map_err(|e| format!("Failed to build email: {}", e))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| format!("SMTP send error: {}", e))?;

        tracing::info!(
            "Notification mailed to {} for booking {}",
            notification.walker.email,
            notification.booking.id
        );
        Ok(())
    }
}
