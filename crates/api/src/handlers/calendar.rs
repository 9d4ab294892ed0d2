//! Public cabin read handlers: availability probe, booked-dates listing,
//! and the month calendar.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Datelike;
use serde::Deserialize;

use hytte_core::error::CoreError;
use hytte_core::timewindow::{
    now_utc, parse_date, resolve_date_range, resolve_single_day, CabinHours, ClockTime, HalfDay,
    TimeWindow,
};

use crate::error::AppResult;
use crate::handlers::cabin::load_cabin;
use crate::scheduling::availability::CabinActivity;
use crate::scheduling::calendar as calendar_view;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Query parameters for the availability probe. Either a single day
/// (`date`, optional `half` and custom times) or a range
/// (`startDate`/`endDate` with optional halves).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub date: Option<String>,
    pub half: Option<HalfDay>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub start_half: Option<HalfDay>,
    pub end_half: Option<HalfDay>,
}

/// Query parameters for the month calendar; defaults to the current
/// month (UTC).
#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

fn parse_clock(field: &str, value: &Option<String>) -> Result<Option<ClockTime>, CoreError> {
    match value.as_deref() {
        None => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| CoreError::Validation(format!("invalid {field} value: {s}"))),
    }
}

fn resolve_query_window(
    query: &AvailabilityQuery,
    hours: &CabinHours,
) -> Result<TimeWindow, CoreError> {
    if let Some(date) = &query.date {
        let date = parse_date(date)?;
        let half = query.half.unwrap_or(HalfDay::Full);
        let start_time = parse_clock("startTime", &query.start_time)?;
        let end_time = parse_clock("endTime", &query.end_time)?;
        if start_time.is_some() != end_time.is_some() {
            return Err(CoreError::Validation(
                "Both startTime and endTime must be provided for custom times".into(),
            ));
        }
        return resolve_single_day(date, half, start_time, end_time, hours);
    }

    if query.start_date.is_some() || query.end_date.is_some() {
        let (Some(start), Some(end)) = (&query.start_date, &query.end_date) else {
            return Err(CoreError::Validation(
                "Both startDate and endDate are required".into(),
            ));
        };
        let start_date = parse_date(start)?;
        let end_date = parse_date(end)?;
        if end_date <= start_date {
            return Err(CoreError::Validation(
                "endDate must be after startDate".into(),
            ));
        }
        return resolve_date_range(
            start_date,
            end_date,
            query.start_half.unwrap_or(HalfDay::Am),
            query.end_half.unwrap_or(HalfDay::Pm),
            hours,
        );
    }

    Err(CoreError::Validation(
        "Query must include a date or a startDate/endDate range".into(),
    ))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/cabins/{slug}/availability
///
/// Answers `{ "available": bool }` for the queried window. Read-only
/// snapshot; creation re-checks under the cabin lock.
pub async fn check_availability(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let cabin = load_cabin(&state.pool, &slug).await?;
    let hours = cabin.hours()?;
    let window = resolve_query_window(&query, &hours)?;

    let activity = CabinActivity::load(&state.pool, cabin.id).await?;
    let available = activity.window_is_free(&window);

    Ok(Json(serde_json::json!({
        "data": {
            "available": available,
            "startAt": window.start,
            "endAt": window.end,
        }
    })))
}

/// GET /api/v1/cabins/{slug}/booked-dates
///
/// Public listing of occupied windows without guest details.
pub async fn booked_dates(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let cabin = load_cabin(&state.pool, &slug).await?;
    let ranges = calendar_view::booked_dates(&state.pool, &cabin).await?;
    Ok(Json(serde_json::json!({ "data": ranges })))
}

/// GET /api/v1/cabins/{slug}/calendar
///
/// Month occupancy view with per-day entries, notes, legends, and month
/// statistics.
pub async fn month_calendar(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let cabin = load_cabin(&state.pool, &slug).await?;
    let today = now_utc().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());

    let calendar = calendar_view::month_view(&state.pool, &cabin, year, month).await?;
    Ok(Json(serde_json::json!({ "data": calendar })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use hytte_core::timewindow::parse_utc;

    fn empty_query() -> AvailabilityQuery {
        AvailabilityQuery {
            date: None,
            half: None,
            start_time: None,
            end_time: None,
            start_date: None,
            end_date: None,
            start_half: None,
            end_half: None,
        }
    }

    #[test]
    fn single_day_query_resolves_full_day() {
        let mut q = empty_query();
        q.date = Some("2025-08-01".into());
        let w = resolve_query_window(&q, &CabinHours::default()).unwrap();
        assert_eq!(w.start, parse_utc("2025-08-01T00:00:00Z").unwrap());
        assert_eq!(w.end, parse_utc("2025-08-01T23:59:59.999Z").unwrap());
    }

    #[test]
    fn range_query_resolves_with_default_halves() {
        let mut q = empty_query();
        q.start_date = Some("2025-08-01".into());
        q.end_date = Some("2025-08-03".into());
        let w = resolve_query_window(&q, &CabinHours::default()).unwrap();
        assert_eq!(w.end, parse_utc("2025-08-03T23:59:59.999Z").unwrap());
    }

    #[test]
    fn empty_query_is_rejected() {
        assert_matches!(
            resolve_query_window(&empty_query(), &CabinHours::default()),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn half_open_range_query_is_rejected() {
        let mut q = empty_query();
        q.start_date = Some("2025-08-01".into());
        assert_matches!(
            resolve_query_window(&q, &CabinHours::default()),
            Err(CoreError::Validation(_))
        );
    }
}
