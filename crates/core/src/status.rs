//! Booking status state machine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Active bookings occupy their window for conflict detection.
    pub fn blocks_availability(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Approved)
    }

    /// Owner decisions are only valid on pending bookings.
    pub fn approve(self) -> Result<BookingStatus, CoreError> {
        match self {
            BookingStatus::Pending => Ok(BookingStatus::Approved),
            other => Err(CoreError::Conflict(format!(
                "only pending bookings can be approved, this one is {other}"
            ))),
        }
    }

    pub fn reject(self) -> Result<BookingStatus, CoreError> {
        match self {
            BookingStatus::Pending => Ok(BookingStatus::Rejected),
            other => Err(CoreError::Conflict(format!(
                "only pending bookings can be rejected, this one is {other}"
            ))),
        }
    }

    /// A guest may cancel anything that is not already cancelled,
    /// including a rejected booking.
    pub fn cancel_by_guest(self) -> Result<BookingStatus, CoreError> {
        match self {
            BookingStatus::Cancelled => {
                Err(CoreError::Conflict("booking is already cancelled".into()))
            }
            _ => Ok(BookingStatus::Cancelled),
        }
    }

    /// Owners cancel on the guest's behalf; a rejected booking is
    /// already settled and stays rejected.
    pub fn cancel_by_owner(self) -> Result<BookingStatus, CoreError> {
        match self {
            BookingStatus::Pending | BookingStatus::Approved => Ok(BookingStatus::Cancelled),
            BookingStatus::Rejected => {
                Err(CoreError::Conflict("booking is already rejected".into()))
            }
            BookingStatus::Cancelled => {
                Err(CoreError::Conflict("booking is already cancelled".into()))
            }
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "approved" => Ok(BookingStatus::Approved),
            "rejected" => Ok(BookingStatus::Rejected),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(CoreError::Validation(format!(
                "invalid booking status: {other}"
            ))),
        }
    }
}

/// Who performed a cancellation, recorded on the booking row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CancelledBy {
    Guest,
    Owner,
}

impl CancelledBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CancelledBy::Guest => "guest",
            CancelledBy::Owner => "owner",
        }
    }
}

impl fmt::Display for CancelledBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CancelledBy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guest" => Ok(CancelledBy::Guest),
            "owner" => Ok(CancelledBy::Owner),
            other => Err(CoreError::Validation(format!(
                "invalid canceller: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn only_pending_can_be_decided() {
        assert_eq!(BookingStatus::Pending.approve().unwrap(), BookingStatus::Approved);
        assert_eq!(BookingStatus::Pending.reject().unwrap(), BookingStatus::Rejected);
        assert_matches!(BookingStatus::Approved.approve(), Err(CoreError::Conflict(_)));
        assert_matches!(BookingStatus::Rejected.approve(), Err(CoreError::Conflict(_)));
        assert_matches!(BookingStatus::Cancelled.reject(), Err(CoreError::Conflict(_)));
        assert_matches!(BookingStatus::Approved.reject(), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn guest_can_cancel_rejected_but_not_cancelled() {
        assert_eq!(
            BookingStatus::Rejected.cancel_by_guest().unwrap(),
            BookingStatus::Cancelled
        );
        assert_eq!(
            BookingStatus::Pending.cancel_by_guest().unwrap(),
            BookingStatus::Cancelled
        );
        assert_eq!(
            BookingStatus::Approved.cancel_by_guest().unwrap(),
            BookingStatus::Cancelled
        );
        assert_matches!(
            BookingStatus::Cancelled.cancel_by_guest(),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn owner_cancel_refuses_settled_bookings() {
        assert_eq!(
            BookingStatus::Pending.cancel_by_owner().unwrap(),
            BookingStatus::Cancelled
        );
        assert_eq!(
            BookingStatus::Approved.cancel_by_owner().unwrap(),
            BookingStatus::Cancelled
        );
        assert_matches!(
            BookingStatus::Rejected.cancel_by_owner(),
            Err(CoreError::Conflict(_))
        );
        assert_matches!(
            BookingStatus::Cancelled.cancel_by_owner(),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn availability_only_sees_pending_and_approved() {
        assert!(BookingStatus::Pending.blocks_availability());
        assert!(BookingStatus::Approved.blocks_availability());
        assert!(!BookingStatus::Rejected.blocks_availability());
        assert!(!BookingStatus::Cancelled.blocks_availability());
    }

    #[test]
    fn status_round_trips_through_strings() {
        for s in ["pending", "approved", "rejected", "cancelled"] {
            assert_eq!(s.parse::<BookingStatus>().unwrap().as_str(), s);
        }
        assert_matches!("PENDING".parse::<BookingStatus>(), Err(CoreError::Validation(_)));
    }
}
