//! Conflict detection against a cabin's occupancy.
//!
//! All active bookings and all blocks for the cabin are fetched and the
//! overlap test runs in memory. Per-cabin volumes are small (tens of
//! rows), and keeping the comparison in one place means the half-day
//! boundary rules live in exactly one implementation instead of being
//! re-encoded in SQL.

use sqlx::{PgPool, Postgres, Transaction};

use hytte_core::error::CoreError;
use hytte_core::timewindow::TimeWindow;
use hytte_core::types::DbId;
use hytte_db::models::block::Block;
use hytte_db::models::booking::Booking;
use hytte_db::repositories::{BlockRepo, BookingRepo};

/// A cabin's current occupancy: active (pending/approved) bookings plus
/// every blackout block.
#[derive(Debug)]
pub struct CabinActivity {
    pub bookings: Vec<Booking>,
    pub blocks: Vec<Block>,
}

impl CabinActivity {
    /// Plain pool read, used by the public availability endpoint.
    pub async fn load(pool: &PgPool, cabin_id: DbId) -> Result<Self, sqlx::Error> {
        let bookings = BookingRepo::list_active_for_cabin(pool, cabin_id).await?;
        let blocks = BlockRepo::list_for_cabin(pool, cabin_id).await?;
        Ok(Self { bookings, blocks })
    }

    /// Read inside an already advisory-locked transaction, so the
    /// snapshot cannot be invalidated by a concurrent writer before the
    /// caller's inserts commit.
    pub async fn load_locked(
        tx: &mut Transaction<'_, Postgres>,
        cabin_id: DbId,
    ) -> Result<Self, sqlx::Error> {
        hytte_db::lock_cabin(tx, cabin_id).await?;
        let bookings = BookingRepo::list_active_for_cabin(&mut **tx, cabin_id).await?;
        let blocks = BlockRepo::list_for_cabin(&mut **tx, cabin_id).await?;
        Ok(Self { bookings, blocks })
    }

    /// True when neither a booking nor a block touches the window.
    pub fn window_is_free(&self, window: &TimeWindow) -> bool {
        !self.booking_overlaps(window) && !self.block_overlaps(window)
    }

    pub fn booking_overlaps(&self, window: &TimeWindow) -> bool {
        self.bookings.iter().any(|b| b.window().overlaps(window))
    }

    pub fn block_overlaps(&self, window: &TimeWindow) -> bool {
        self.blocks.iter().any(|b| b.window().overlaps(window))
    }

    /// Conflict error unless the window is completely free. The message
    /// names the requested interval so the caller can see which segment
    /// was refused.
    pub fn ensure_free(&self, window: &TimeWindow) -> Result<(), CoreError> {
        if self.window_is_free(window) {
            Ok(())
        } else {
            Err(CoreError::Conflict(format!(
                "Cabin is not available between {} and {}",
                window.start, window.end
            )))
        }
    }

    /// Blocks conflict-check against bookings only, never against other
    /// blocks.
    pub fn ensure_no_booking(&self, window: &TimeWindow) -> Result<(), CoreError> {
        if self.booking_overlaps(window) {
            Err(CoreError::Conflict(format!(
                "Dates between {} and {} conflict with existing bookings",
                window.start, window.end
            )))
        } else {
            Ok(())
        }
    }

    /// Ids of every block overlapping any of the target windows, for the
    /// unblock path.
    pub fn blocks_overlapping(&self, windows: &[TimeWindow]) -> Vec<DbId> {
        self.blocks
            .iter()
            .filter(|b| {
                let bw = b.window();
                windows.iter().any(|w| bw.overlaps(w))
            })
            .map(|b| b.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hytte_core::timewindow::parse_utc;
    use hytte_core::types::Timestamp;
    use uuid::Uuid;

    fn ts(s: &str) -> Timestamp {
        parse_utc(s).unwrap()
    }

    fn w(start: &str, end: &str) -> TimeWindow {
        TimeWindow::new(ts(start), ts(end))
    }

    fn booking(start: &str, end: &str) -> Booking {
        Booking {
            id: 1,
            cabin_id: 1,
            user_id: None,
            status: "pending".into(),
            start_date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            start_half: None,
            end_half: None,
            start_at: Some(ts(start)),
            end_at: Some(ts(end)),
            guest_name: "Kari Nordmann".into(),
            guest_address: "Storgata 1".into(),
            guest_postal_code: "0155".into(),
            guest_city: "Oslo".into(),
            guest_phone: "+47 99 88 77 66".into(),
            guest_email: "kari@example.com".into(),
            guest_affiliation: None,
            order_ref: Uuid::nil(),
            cancelled_by: None,
            cancelled_at: None,
            created_at: ts("2025-07-01T00:00:00Z"),
            updated_at: ts("2025-07-01T00:00:00Z"),
        }
    }

    fn block(start: &str, end: &str) -> Block {
        Block {
            id: 9,
            cabin_id: 1,
            start_at: ts(start),
            end_at: ts(end),
            reason: None,
            created_by: None,
            created_at: ts("2025-07-01T00:00:00Z"),
            updated_at: ts("2025-07-01T00:00:00Z"),
        }
    }

    #[test]
    fn free_window_passes_both_checks() {
        let activity = CabinActivity {
            bookings: vec![booking("2025-08-01T00:00:00Z", "2025-08-01T11:59:59.999Z")],
            blocks: vec![block("2025-08-10T00:00:00Z", "2025-08-10T23:59:59.999Z")],
        };
        let candidate = w("2025-08-05T00:00:00Z", "2025-08-05T23:59:59.999Z");
        assert!(activity.window_is_free(&candidate));
        assert!(activity.ensure_free(&candidate).is_ok());
    }

    #[test]
    fn booking_overlap_is_a_conflict() {
        let activity = CabinActivity {
            bookings: vec![booking("2025-08-01T00:00:00Z", "2025-08-03T23:59:59.999Z")],
            blocks: vec![],
        };
        let candidate = w("2025-08-03T12:00:00Z", "2025-08-04T23:59:59.999Z");
        match activity.ensure_free(&candidate) {
            Err(CoreError::Conflict(msg)) => {
                // The refused interval is named in the message.
                assert!(msg.contains("2025-08-03 12:00:00"), "got: {msg}");
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn touching_windows_do_not_conflict() {
        // Booking ends at noon sharp, candidate starts at noon.
        let activity = CabinActivity {
            bookings: vec![booking("2025-08-01T00:00:00Z", "2025-08-03T12:00:00Z")],
            blocks: vec![],
        };
        let candidate = w("2025-08-03T12:00:00Z", "2025-08-03T23:59:59.999Z");
        assert!(activity.window_is_free(&candidate));
    }

    #[test]
    fn block_check_ignores_other_blocks() {
        let activity = CabinActivity {
            bookings: vec![],
            blocks: vec![block("2025-08-05T00:00:00Z", "2025-08-05T23:59:59.999Z")],
        };
        // A new block on the same day is fine; only bookings matter.
        let candidate = w("2025-08-05T00:00:00Z", "2025-08-05T23:59:59.999Z");
        assert!(activity.ensure_no_booking(&candidate).is_ok());
        assert!(!activity.window_is_free(&candidate));
    }

    #[test]
    fn overlapping_block_ids_are_collected() {
        let mut second = block("2025-08-20T00:00:00Z", "2025-08-20T23:59:59.999Z");
        second.id = 10;
        let activity = CabinActivity {
            bookings: vec![],
            blocks: vec![
                block("2025-08-05T00:00:00Z", "2025-08-05T23:59:59.999Z"),
                second,
            ],
        };
        let targets = [w("2025-08-05T12:00:00Z", "2025-08-05T23:59:59.999Z")];
        assert_eq!(activity.blocks_overlapping(&targets), vec![9]);
        assert!(activity.blocks_overlapping(&[]).is_empty());
    }
}
