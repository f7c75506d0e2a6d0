use crate::domain::entities::WallTime;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Scheduled => write!(f, "scheduled"),
            BookingStatus::Completed => write!(f, "completed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(BookingStatus::Scheduled),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Denied,
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalStatus::Pending => write!(f, "pending"),
            ApprovalStatus::Approved => write!(f, "approved"),
            ApprovalStatus::Denied => write!(f, "denied"),
        }
    }
}

impl std::str::FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "denied" => Ok(ApprovalStatus::Denied),
            _ => Err(format!("Invalid approval status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub dog_id: String,
    pub date: NaiveDate,
    pub scheduled_time: WallTime,
    pub status: BookingStatus,
    pub requires_approval: bool,
    pub approval_status: ApprovalStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<String>,
    pub rejection_reason: Option<String>,
    pub admin_cancellation_reason: Option<String>,
    pub user_notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Booking {
    pub fn new(
        user_id: String,
        dog_id: String,
        date: NaiveDate,
        scheduled_time: WallTime,
        requires_approval: bool,
        user_notes: Option<String>,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            dog_id,
            date,
            scheduled_time,
            status: BookingStatus::Scheduled,
            requires_approval,
            approval_status: if requires_approval {
                ApprovalStatus::Pending
            } else {
                ApprovalStatus::Approved
            },
            approved_by: None,
            approved_at: None,
            rejection_reason: None,
            admin_cancellation_reason: None,
            user_notes,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Whether this booking holds its `(dog, date, time)` slot
    pub fn occupies_slot(&self) -> bool {
        self.status == BookingStatus::Scheduled && self.approval_status != ApprovalStatus::Denied
    }
}

/// DTO for requesting a walk
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    #[serde(default)]
    pub dog_id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub scheduled_time: String,
    pub user_notes: Option<String>,
}

/// DTO for cancelling a booking
#[derive(Debug, Default, Deserialize)]
pub struct CancelBookingRequest {
    pub reason: Option<String>,
}

/// DTO for denying a pending booking
#[derive(Debug, Deserialize)]
pub struct DenyBookingRequest {
    #[serde(default)]
    pub reason: String,
}

/// Query filter for listing bookings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingFilter {
    pub user_id: Option<String>,
    pub dog_id: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub status: Option<String>,
}

/// Validated booking filter used by the repository
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingQuery {
    pub user_id: Option<String>,
    pub dog_id: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<BookingStatus>,
}

impl BookingQuery {
    pub fn scheduled_on(date: NaiveDate, dog_id: Option<&str>) -> Self {
        Self {
            user_id: None,
            dog_id: dog_id.map(str::to_string),
            date_from: Some(date),
            date_to: Some(date),
            status: Some(BookingStatus::Scheduled),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingListResponse {
    pub bookings: Vec<Booking>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(requires_approval: bool) -> Booking {
        Booking::new(
            "user-1".to_string(),
            "dog-1".to_string(),
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            WallTime::at(9, 0),
            requires_approval,
            None,
        )
    }

    #[test]
    fn test_new_booking_approval_state() {
        assert_eq!(booking(false).approval_status, ApprovalStatus::Approved);
        assert_eq!(booking(true).approval_status, ApprovalStatus::Pending);
        assert_eq!(booking(true).status, BookingStatus::Scheduled);
    }

    #[test]
    fn test_denied_and_cancelled_bookings_release_slot() {
        let mut pending = booking(true);
        assert!(pending.occupies_slot());

        pending.approval_status = ApprovalStatus::Denied;
        assert!(!pending.occupies_slot());

        let mut cancelled = booking(false);
        cancelled.status = BookingStatus::Cancelled;
        assert!(!cancelled.occupies_slot());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("cancelled".parse::<BookingStatus>(), Ok(BookingStatus::Cancelled));
        assert!("deleted".parse::<BookingStatus>().is_err());
        assert_eq!("denied".parse::<ApprovalStatus>(), Ok(ApprovalStatus::Denied));
    }
}
