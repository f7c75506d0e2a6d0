use crate::domain::entities::{Booking, Walker};
use std::fmt;

/// Why a walker is being told about their booking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingNotice {
    Approved,
    Denied { reason: String },
    CancelledByAdmin { reason: Option<String> },
    CancelledByBlock { reason: String },
}

impl fmt::Display for BookingNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingNotice::Approved => write!(f, "approved"),
            BookingNotice::Denied { .. } => write!(f, "denied"),
            BookingNotice::CancelledByAdmin { .. } => write!(f, "cancelled_by_admin"),
            BookingNotice::CancelledByBlock { .. } => write!(f, "cancelled_by_block"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BookingNotification {
    pub walker: Walker,
    pub booking: Booking,
    pub notice: BookingNotice,
}

impl BookingNotification {
    pub fn subject(&self) -> String {
        let what = match &self.notice {
            BookingNotice::Approved => "approved",
            BookingNotice::Denied { .. } => "denied",
            BookingNotice::CancelledByAdmin { .. } | BookingNotice::CancelledByBlock { .. } => {
                "cancelled"
            }
        };
        format!(
            "Your walk on {} at {} was {}",
            self.booking.date, self.booking.scheduled_time, what
        )
    }

    pub fn body(&self) -> String {
        let mut body = format!("Hello {},\n\n{}.", self.walker.name, self.subject());
        let reason = match &self.notice {
            BookingNotice::Approved => None,
            BookingNotice::Denied { reason } | BookingNotice::CancelledByBlock { reason } => {
                Some(reason.as_str())
            }
            BookingNotice::CancelledByAdmin { reason } => reason.as_deref(),
        };
        if let Some(reason) = reason {
            body.push_str(&format!("\n\nReason: {}", reason));
        }
        body
    }
}

/// Delivery channel for walker notifications
#[async_trait::async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, notification: &BookingNotification) -> Result<(), String>;
}
