use crate::domain::entities::{ApprovalStatus, Booking, BookingStatus};
use crate::domain::errors::DomainError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid booking transition from {from} to {to}")]
    InvalidStatus {
        from: BookingStatus,
        to: BookingStatus,
    },
    #[error("Booking is already {0}")]
    AlreadyReviewed(ApprovalStatus),
    #[error("Booking is {0} and can no longer be reviewed")]
    NotReviewable(BookingStatus),
}

impl From<TransitionError> for DomainError {
    fn from(err: TransitionError) -> Self {
        DomainError::Conflict(err.to_string())
    }
}

/// Validates a booking status change.
///
/// `scheduled` is the only state with outgoing edges; `completed` and
/// `cancelled` are terminal.
pub fn validate_status_transition(
    from: BookingStatus,
    to: BookingStatus,
) -> Result<(), TransitionError> {
    use BookingStatus::*;

    match (from, to) {
        (Scheduled, Completed) | (Scheduled, Cancelled) => Ok(()),
        _ => Err(TransitionError::InvalidStatus { from, to }),
    }
}

/// Validates a review decision on a booking.
///
/// Only scheduled bookings that are still pending can be approved or denied,
/// and each booking is reviewed at most once.
pub fn validate_review(booking: &Booking, decision: ApprovalStatus) -> Result<(), TransitionError> {
    if booking.status != BookingStatus::Scheduled {
        return Err(TransitionError::NotReviewable(booking.status));
    }

    match (booking.approval_status, decision) {
        (ApprovalStatus::Pending, ApprovalStatus::Approved)
        | (ApprovalStatus::Pending, ApprovalStatus::Denied) => Ok(()),
        (current, _) => Err(TransitionError::AlreadyReviewed(current)),
    }
}
