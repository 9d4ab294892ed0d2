//! Booking entity models and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use hytte_core::status::BookingStatus;
use hytte_core::timewindow::{date_span_bounds, TimeWindow};
use hytte_core::types::{DbId, Timestamp};
use hytte_core::CoreError;

/// A row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub cabin_id: DbId,
    pub user_id: Option<DbId>,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_half: Option<String>,
    pub end_half: Option<String>,
    pub start_at: Option<Timestamp>,
    pub end_at: Option<Timestamp>,
    pub guest_name: String,
    pub guest_address: String,
    pub guest_postal_code: String,
    pub guest_city: String,
    pub guest_phone: String,
    pub guest_email: String,
    pub guest_affiliation: Option<String>,
    pub order_ref: Uuid,
    pub cancelled_by: Option<String>,
    pub cancelled_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Booking {
    pub fn status(&self) -> Result<BookingStatus, CoreError> {
        self.status.parse()
    }

    /// The occupancy interval used for conflict detection: the exact
    /// instants when present, else the date columns at day precision.
    pub fn window(&self) -> TimeWindow {
        match (self.start_at, self.end_at) {
            (Some(start), Some(end)) => TimeWindow::new(start, end),
            _ => date_span_bounds(self.start_date, self.end_date),
        }
    }
}

/// Guest contact block carried on every booking. For anonymous bookings
/// this is the only identity attached to the reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestContact {
    pub guest_name: String,
    pub guest_address: String,
    pub guest_postal_code: String,
    pub guest_city: String,
    pub guest_phone: String,
    pub guest_email: String,
    pub guest_affiliation: Option<String>,
}

/// Fully resolved insert payload, built by the lifecycle layer after
/// window resolution and availability checks.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub cabin_id: DbId,
    pub user_id: Option<DbId>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_half: Option<String>,
    pub end_half: Option<String>,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    pub guest: GuestContact,
    pub order_ref: Uuid,
}

/// Filters for booking listings. `status` of `None` or `"all"` means no
/// status filter.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub status: Option<String>,
}

impl BookingFilter {
    /// The status value to bind, or `None` when everything matches.
    pub fn status_bind(&self) -> Option<&str> {
        match self.status.as_deref() {
            None | Some("all") => None,
            Some(s) => Some(s),
        }
    }
}
