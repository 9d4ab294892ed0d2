//! Month-granularity occupancy projection.
//!
//! Pure assembly: the caller fetches a cabin's bookings, blocks, and day
//! notes and this module folds them into one entry per day that has any
//! activity, plus month statistics. A block on a day wins over bookings;
//! a block whose reason mentions maintenance renders as `maintenance`,
//! any other block as `unavailable`.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::CoreError;
use crate::status::BookingStatus;
use crate::timewindow::{day_bounds, TimeWindow};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// An active (pending or approved) booking, pre-filtered by the caller.
#[derive(Debug, Clone)]
pub struct CalendarBooking {
    pub status: BookingStatus,
    pub guest_name: String,
    pub window: TimeWindow,
}

#[derive(Debug, Clone)]
pub struct CalendarBlock {
    pub reason: Option<String>,
    pub window: TimeWindow,
}

/// A resolved legend reference. A dangling `legend_id` degrades to an
/// id-only stub with `is_bookable` defaulting to true.
#[derive(Debug, Clone, Serialize)]
pub struct LegendRef {
    pub id: DbId,
    pub name: Option<String>,
    pub color: Option<String>,
    pub is_bookable: bool,
}

impl LegendRef {
    pub fn dangling(id: DbId) -> Self {
        Self { id, name: None, color: None, is_bookable: true }
    }
}

#[derive(Debug, Clone)]
pub struct CalendarNote {
    pub date: NaiveDate,
    pub note: Option<String>,
    pub legend: Option<LegendRef>,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Available,
    Booked,
    Maintenance,
    Unavailable,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DayEntry {
    Booking {
        status: BookingStatus,
        guest_name: String,
        start: Timestamp,
        end: Timestamp,
    },
    Block {
        reason: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub status: DayStatus,
    pub bookable: bool,
    pub entries: Vec<DayEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<LegendRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthStats {
    pub total_days: u32,
    pub booked_days: u32,
    pub available_days: u32,
    pub maintenance_days: u32,
    pub unavailable_days: u32,
    pub occupancy_rate: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthInfo {
    pub year: i32,
    pub month: u32,
    pub name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthCalendar {
    pub calendar: Vec<CalendarDay>,
    pub stats: MonthStats,
    pub month: MonthInfo,
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

pub fn days_in_month(year: i32, month: u32) -> Result<u32, CoreError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| CoreError::Validation(format!("invalid month: {year}-{month}")))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| CoreError::Validation(format!("invalid month: {year}-{month}")))?;
    Ok(next.signed_duration_since(first).num_days() as u32)
}

fn is_maintenance(reason: Option<&str>) -> bool {
    reason
        .map(|r| r.to_lowercase().contains("maintenance"))
        .unwrap_or(false)
}


/// Fold pre-fetched activity into per-day entries and month stats. Only
/// days with a booking, block, or note appear in `calendar`; the stats
/// cover the whole month.
pub fn project_month(
    year: i32,
    month: u32,
    bookings: &[CalendarBooking],
    blocks: &[CalendarBlock],
    notes: &[CalendarNote],
) -> Result<MonthCalendar, CoreError> {
    let total_days = days_in_month(year, month)?;

    let mut days = Vec::new();
    let mut booked_days = 0u32;
    let mut maintenance_days = 0u32;
    let mut unavailable_days = 0u32;

    for dom in 1..=total_days {
        let date = NaiveDate::from_ymd_opt(year, month, dom)
            .ok_or_else(|| CoreError::Validation(format!("invalid date: {year}-{month}-{dom}")))?;
        let bounds = day_bounds(date);

        let mut entries = Vec::new();
        let mut block_status = None;
        for block in blocks {
            if block.window.overlaps(&bounds) {
                let status = if is_maintenance(block.reason.as_deref()) {
                    DayStatus::Maintenance
                } else {
                    DayStatus::Unavailable
                };
                // Maintenance wins if the day carries both block kinds.
                if block_status != Some(DayStatus::Maintenance) {
                    block_status = Some(status);
                }
                entries.push(DayEntry::Block { reason: block.reason.clone() });
            }
        }

        let mut has_booking = false;
        for booking in bookings {
            if booking.window.overlaps(&bounds) {
                has_booking = true;
                entries.push(DayEntry::Booking {
                    status: booking.status,
                    guest_name: booking.guest_name.clone(),
                    start: booking.window.start.max(bounds.start),
                    end: booking.window.end.min(bounds.end),
                });
            }
        }

        let note = notes.iter().find(|n| n.date == date);

        let status = match (block_status, has_booking) {
            (Some(s), _) => s,
            (None, true) => DayStatus::Booked,
            (None, false) => DayStatus::Available,
        };
        match status {
            DayStatus::Booked => booked_days += 1,
            DayStatus::Maintenance => maintenance_days += 1,
            DayStatus::Unavailable => unavailable_days += 1,
            DayStatus::Available => {}
        }

        if entries.is_empty() && note.is_none() {
            continue;
        }

        let legend = note.and_then(|n| n.legend.clone());
        let bookable = status == DayStatus::Available
            && legend.as_ref().map(|l| l.is_bookable).unwrap_or(true);

        days.push(CalendarDay {
            date,
            status,
            bookable,
            entries,
            note: note.and_then(|n| n.note.clone()),
            legend,
        });
    }

    let available_days = total_days - booked_days - maintenance_days - unavailable_days;
    let occupancy_rate = if total_days > 0 {
        ((booked_days as f64 / total_days as f64) * 100.0).round() as u32
    } else {
        0
    };

    Ok(MonthCalendar {
        calendar: days,
        stats: MonthStats {
            total_days,
            booked_days,
            available_days,
            maintenance_days,
            unavailable_days,
            occupancy_rate,
        },
        month: MonthInfo {
            year,
            month,
            name: MONTH_NAMES[(month - 1) as usize],
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timewindow::parse_utc;
    use assert_matches::assert_matches;
    use chrono::Datelike;

    fn w(start: &str, end: &str) -> TimeWindow {
        TimeWindow::new(parse_utc(start).unwrap(), parse_utc(end).unwrap())
    }

    fn booking(start: &str, end: &str, status: BookingStatus) -> CalendarBooking {
        CalendarBooking {
            status,
            guest_name: "Kari Nordmann".into(),
            window: w(start, end),
        }
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2025, 2).unwrap(), 28);
        assert_eq!(days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(days_in_month(2025, 12).unwrap(), 31);
        assert_matches!(days_in_month(2025, 13), Err(CoreError::Validation(_)));
    }

    #[test]
    fn bookings_mark_each_covered_day() {
        let bookings = [booking(
            "2025-08-10T12:00:00Z",
            "2025-08-12T12:00:00Z",
            BookingStatus::Approved,
        )];
        let cal = project_month(2025, 8, &bookings, &[], &[]).unwrap();
        let dates: Vec<u32> = cal.calendar.iter().map(|d| d.date.day()).collect();
        assert_eq!(dates, vec![10, 11, 12]);
        assert!(cal.calendar.iter().all(|d| d.status == DayStatus::Booked));
        assert_eq!(cal.stats.booked_days, 3);
        assert_eq!(cal.stats.available_days, 28);
        assert_eq!(cal.stats.occupancy_rate, 10);
    }

    #[test]
    fn booking_entries_are_clamped_to_the_day() {
        let bookings = [booking(
            "2025-08-10T12:00:00Z",
            "2025-08-12T12:00:00Z",
            BookingStatus::Approved,
        )];
        let cal = project_month(2025, 8, &bookings, &[], &[]).unwrap();
        let middle = &cal.calendar[1];
        match &middle.entries[0] {
            DayEntry::Booking { start, end, .. } => {
                assert_eq!(*start, parse_utc("2025-08-11T00:00:00Z").unwrap());
                assert_eq!(*end, parse_utc("2025-08-11T23:59:59.999Z").unwrap());
            }
            other => panic!("expected booking entry, got {other:?}"),
        }
    }

    #[test]
    fn blocks_override_bookings_and_classify_by_reason() {
        let bookings = [booking(
            "2025-08-10T00:00:00Z",
            "2025-08-10T23:59:59.999Z",
            BookingStatus::Pending,
        )];
        let blocks = [
            CalendarBlock {
                reason: Some("Annual maintenance".into()),
                window: w("2025-08-10T00:00:00Z", "2025-08-10T23:59:59.999Z"),
            },
            CalendarBlock {
                reason: None,
                window: w("2025-08-15T00:00:00Z", "2025-08-15T23:59:59.999Z"),
            },
        ];
        let cal = project_month(2025, 8, &bookings, &blocks, &[]).unwrap();
        assert_eq!(cal.calendar[0].status, DayStatus::Maintenance);
        assert_eq!(cal.calendar[1].status, DayStatus::Unavailable);
        assert_eq!(cal.stats.maintenance_days, 1);
        assert_eq!(cal.stats.unavailable_days, 1);
        assert_eq!(cal.stats.booked_days, 0);
    }

    #[test]
    fn note_only_days_appear_and_stay_available() {
        let notes = [CalendarNote {
            date: NaiveDate::from_ymd_opt(2025, 8, 20).unwrap(),
            note: Some("Dugnad".into()),
            legend: None,
        }];
        let cal = project_month(2025, 8, &[], &[], &notes).unwrap();
        assert_eq!(cal.calendar.len(), 1);
        let day = &cal.calendar[0];
        assert_eq!(day.status, DayStatus::Available);
        assert!(day.bookable);
        assert_eq!(day.note.as_deref(), Some("Dugnad"));
        assert_eq!(cal.stats.available_days, 31);
    }

    #[test]
    fn non_bookable_legend_flips_bookable_off() {
        let notes = [CalendarNote {
            date: NaiveDate::from_ymd_opt(2025, 8, 20).unwrap(),
            note: None,
            legend: Some(LegendRef {
                id: 7,
                name: Some("Members only".into()),
                color: Some("#cc0000".into()),
                is_bookable: false,
            }),
        }];
        let cal = project_month(2025, 8, &[], &[], &notes).unwrap();
        assert!(!cal.calendar[0].bookable);
        assert_eq!(cal.calendar[0].status, DayStatus::Available);
    }

    #[test]
    fn dangling_legend_stub_defaults_to_bookable() {
        let stub = LegendRef::dangling(42);
        assert!(stub.is_bookable);
        assert_eq!(stub.id, 42);
        assert!(stub.name.is_none());
    }

    #[test]
    fn half_day_range_end_does_not_bleed_into_the_next_day() {
        // Range ends at noon on the 12th; the 13th stays free.
        let bookings = [booking(
            "2025-08-10T12:00:00Z",
            "2025-08-12T12:00:00Z",
            BookingStatus::Approved,
        )];
        let cal = project_month(2025, 8, &bookings, &[], &[]).unwrap();
        assert!(cal.calendar.iter().all(|d| d.date.day() <= 12));
    }

    #[test]
    fn month_metadata_is_filled_in() {
        let cal = project_month(2025, 8, &[], &[], &[]).unwrap();
        assert_eq!(cal.month.year, 2025);
        assert_eq!(cal.month.month, 8);
        assert_eq!(cal.month.name, "August");
        assert!(cal.calendar.is_empty());
    }
}
