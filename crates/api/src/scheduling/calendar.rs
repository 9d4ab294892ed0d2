//! Month-view assembly: fetch a cabin's activity and feed it to the
//! pure projection in `hytte_core::calendar`.
//!
//! Legend references on day notes are resolved lazily here, in one
//! batched lookup; a dangling `legend_id` degrades to an id-only stub
//! rather than failing the whole view.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;

use hytte_core::calendar::{
    days_in_month, project_month, CalendarBlock, CalendarBooking, CalendarNote, LegendRef,
    MonthCalendar,
};
use hytte_core::error::CoreError;
use hytte_core::types::{DbId, Timestamp};
use hytte_db::models::cabin::Cabin;
use hytte_db::models::legend::Legend;
use hytte_db::repositories::{BlockRepo, BookingRepo, LegendRepo, NoteRepo};

use crate::error::AppResult;

pub(crate) fn legend_ref(legend: &Legend) -> LegendRef {
    LegendRef {
        id: legend.id,
        name: Some(legend.name.clone()),
        color: Some(legend.color.clone()),
        is_bookable: legend.is_bookable,
    }
}

/// Build the month calendar for a cabin.
pub async fn month_view(
    pool: &PgPool,
    cabin: &Cabin,
    year: i32,
    month: u32,
) -> AppResult<MonthCalendar> {
    let last_day = days_in_month(year, month)?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| CoreError::Validation(format!("invalid month: {year}-{month}")))?;
    let last = NaiveDate::from_ymd_opt(year, month, last_day)
        .ok_or_else(|| CoreError::Validation(format!("invalid month: {year}-{month}")))?;

    let bookings = BookingRepo::list_active_for_cabin(pool, cabin.id).await?;
    let blocks = BlockRepo::list_for_cabin(pool, cabin.id).await?;
    let notes = NoteRepo::list_for_range(pool, cabin.id, first, last).await?;

    let mut legend_ids: Vec<DbId> = notes.iter().filter_map(|n| n.legend_id).collect();
    legend_ids.sort_unstable();
    legend_ids.dedup();
    let legends = LegendRepo::find_by_ids(pool, &legend_ids).await?;

    let calendar_bookings = bookings
        .iter()
        .map(|b| {
            Ok(CalendarBooking {
                status: b.status()?,
                guest_name: b.guest_name.clone(),
                window: b.window(),
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    let calendar_blocks: Vec<CalendarBlock> = blocks
        .iter()
        .map(|b| CalendarBlock {
            reason: b.reason.clone(),
            window: b.window(),
        })
        .collect();

    let calendar_notes: Vec<CalendarNote> = notes
        .iter()
        .map(|n| CalendarNote {
            date: n.date,
            note: n.note.clone(),
            legend: n.legend_id.map(|id| {
                legends
                    .iter()
                    .find(|l| l.id == id)
                    .map(legend_ref)
                    .unwrap_or_else(|| LegendRef::dangling(id))
            }),
        })
        .collect();

    Ok(project_month(
        year,
        month,
        &calendar_bookings,
        &calendar_blocks,
        &calendar_notes,
    )?)
}

/// One occupied interval of the public booked-dates listing. Exposes the
/// window but none of the guest contact details.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_half: Option<String>,
    pub end_half: Option<String>,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    pub status: String,
}

/// Active bookings for a cabin, reduced to their occupancy windows.
pub async fn booked_dates(pool: &PgPool, cabin: &Cabin) -> AppResult<Vec<BookedRange>> {
    let bookings = BookingRepo::list_active_for_cabin(pool, cabin.id).await?;
    Ok(bookings
        .into_iter()
        .map(|b| {
            let window = b.window();
            BookedRange {
                start_date: b.start_date,
                end_date: b.end_date,
                start_half: b.start_half,
                end_half: b.end_half,
                start_at: window.start,
                end_at: window.end,
                status: b.status,
            }
        })
        .collect())
}
