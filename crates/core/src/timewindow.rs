//! Resolution of booking inputs into canonical UTC instant windows.
//!
//! Bookings arrive in four shapes: a single day with a half-day marker,
//! a date range with half-day markers on both ends, an exact
//! timestamp window, and a list of segments. Everything is normalized to
//! a [`TimeWindow`] so conflict detection has a single comparison rule.
//!
//! Boundary conventions (all UTC):
//! - AM occupies `[00:00:00.000, 11:59:59.999]`, PM occupies
//!   `[12:00:00.000, 23:59:59.999]`.
//! - A date range ending on an AM half ends at `12:00:00.000` sharp, so
//!   a PM booking starting the same day does not collide with it.
//! - Custom `HH:MM` end times gain `.999` milliseconds so that two
//!   windows sharing a clock boundary still count as touching, not
//!   overlapping.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Half-day markers
// ---------------------------------------------------------------------------

/// Which part of a day a booking occupies.
///
/// `Full` is only meaningful for single-day bookings; date ranges carry
/// an `Am`/`Pm` marker on each end instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HalfDay {
    Am,
    Pm,
    Full,
}

impl HalfDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            HalfDay::Am => "AM",
            HalfDay::Pm => "PM",
            HalfDay::Full => "FULL",
        }
    }
}

impl fmt::Display for HalfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HalfDay {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AM" => Ok(HalfDay::Am),
            "PM" => Ok(HalfDay::Pm),
            "FULL" => Ok(HalfDay::Full),
            other => Err(CoreError::Validation(format!(
                "invalid half-day marker: {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Clock times
// ---------------------------------------------------------------------------

/// A wall-clock time of day in `HH:MM` form, used for per-cabin custom
/// check-in/check-out hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Result<Self, CoreError> {
        if hour > 23 || minute > 59 {
            return Err(CoreError::Validation(format!(
                "invalid time of day: {hour:02}:{minute:02}"
            )));
        }
        Ok(Self { hour, minute })
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::Validation(format!("invalid HH:MM time: {s}"));
        let (h, m) = s.split_once(':').ok_or_else(invalid)?;
        let hour: u32 = h.parse().map_err(|_| invalid())?;
        let minute: u32 = m.parse().map_err(|_| invalid())?;
        ClockTime::new(hour, minute)
    }
}

/// Per-cabin custom hours. Any half left as `None` falls back to the
/// fixed AM/PM/FULL boundaries. `halfday` mirrors the cabin's half-day
/// availability flag: when it is off, a range spanning full coverage
/// (AM start, PM end) takes the full-day hours instead of the half
/// boundaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CabinHours {
    pub halfday: bool,
    pub full_start: Option<ClockTime>,
    pub full_end: Option<ClockTime>,
    pub am_start: Option<ClockTime>,
    pub am_end: Option<ClockTime>,
    pub pm_start: Option<ClockTime>,
    pub pm_end: Option<ClockTime>,
}

impl CabinHours {
    fn start_for(&self, half: HalfDay) -> Option<ClockTime> {
        match half {
            HalfDay::Am => self.am_start,
            HalfDay::Pm => self.pm_start,
            HalfDay::Full => self.full_start,
        }
    }

    fn end_for(&self, half: HalfDay) -> Option<ClockTime> {
        match half {
            HalfDay::Am => self.am_end,
            HalfDay::Pm => self.pm_end,
            HalfDay::Full => self.full_end,
        }
    }
}

// ---------------------------------------------------------------------------
// Windows
// ---------------------------------------------------------------------------

/// A resolved occupancy interval. Both endpoints are inclusive instants;
/// overlap uses strict inequality so windows that merely touch at an
/// endpoint do not conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        ranges_overlap(self.start, self.end, other.start, other.end)
    }
}

/// The single overlap rule used everywhere: `startA < endB && startB < endA`.
pub fn ranges_overlap(
    start_a: Timestamp,
    end_a: Timestamp,
    start_b: Timestamp,
    end_b: Timestamp,
) -> bool {
    start_a < end_b && start_b < end_a
}

fn instant(date: NaiveDate, h: u32, m: u32, s: u32, ms: u32) -> Timestamp {
    // Inputs are either fixed constants or validated ClockTime fields,
    // so the fallback is unreachable.
    let time = NaiveTime::from_hms_milli_opt(h, m, s, ms).unwrap_or(NaiveTime::MIN);
    date.and_time(time).and_utc()
}

fn clock_start(date: NaiveDate, ct: ClockTime) -> Timestamp {
    instant(date, ct.hour, ct.minute, 0, 0)
}

fn clock_end(date: NaiveDate, ct: ClockTime) -> Timestamp {
    // Custom end times gain .999 so equal-boundary windows touch.
    instant(date, ct.hour, ct.minute, 0, 999)
}

fn day_start(date: NaiveDate) -> Timestamp {
    instant(date, 0, 0, 0, 0)
}

fn day_end(date: NaiveDate) -> Timestamp {
    instant(date, 23, 59, 59, 999)
}

/// The full-day window `[00:00:00.000, 23:59:59.999]` for a date. Used
/// as the day-precision fallback when a booking row carries no exact
/// instants, and by the calendar projection.
pub fn day_bounds(date: NaiveDate) -> TimeWindow {
    TimeWindow::new(day_start(date), day_end(date))
}

/// Day-precision window over an inclusive date span.
pub fn date_span_bounds(start: NaiveDate, end: NaiveDate) -> TimeWindow {
    TimeWindow::new(day_start(start), day_end(end))
}

fn am_end(date: NaiveDate) -> Timestamp {
    instant(date, 11, 59, 59, 999)
}

fn noon(date: NaiveDate) -> Timestamp {
    instant(date, 12, 0, 0, 0)
}

// ---------------------------------------------------------------------------
// Resolvers
// ---------------------------------------------------------------------------

/// Custom times must stay inside the declared half: AM within
/// `[00:00, 12:00]`, PM within `[12:00, 24:00)`. FULL accepts any time.
fn ensure_within_half(half: HalfDay, ct: ClockTime) -> Result<(), CoreError> {
    let ok = match half {
        HalfDay::Am => ct.hour < 12 || (ct.hour == 12 && ct.minute == 0),
        HalfDay::Pm => ct.hour >= 12,
        HalfDay::Full => true,
    };
    if ok {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "time {ct} falls outside the {half} half of the day"
        )))
    }
}

/// Resolve a single-day booking: fixed half-day boundaries, overridden by
/// cabin-level hours, overridden by request-level `start_time`/`end_time`.
pub fn resolve_single_day(
    date: NaiveDate,
    half: HalfDay,
    request_start: Option<ClockTime>,
    request_end: Option<ClockTime>,
    hours: &CabinHours,
) -> Result<TimeWindow, CoreError> {
    let start_ct = request_start.or_else(|| hours.start_for(half));
    let end_ct = request_end.or_else(|| hours.end_for(half));
    if let Some(ct) = start_ct {
        ensure_within_half(half, ct)?;
    }
    if let Some(ct) = end_ct {
        ensure_within_half(half, ct)?;
    }
    let start = match start_ct {
        Some(ct) => clock_start(date, ct),
        None => match half {
            HalfDay::Am | HalfDay::Full => day_start(date),
            HalfDay::Pm => noon(date),
        },
    };
    let end = match end_ct {
        // An AM half ending exactly at 12:00 closes at noon sharp so a
        // PM window starting at noon does not collide with it.
        Some(ClockTime { hour: 12, minute: 0 }) if half == HalfDay::Am => noon(date),
        Some(ct) => clock_end(date, ct),
        None => match half {
            HalfDay::Am => am_end(date),
            HalfDay::Pm | HalfDay::Full => day_end(date),
        },
    };
    if end <= start {
        return Err(CoreError::Validation(format!(
            "end time {end} is not after start time {start}"
        )));
    }
    Ok(TimeWindow::new(start, end))
}

/// Resolve a date-range booking. The range starts at the start half's
/// opening instant and ends at the end half's closing instant; an AM end
/// closes at noon sharp so a same-day PM booking can follow it.
///
/// On a cabin without half-day availability, a range spanning full
/// coverage (AM start, PM end) takes the cabin's full-day hours instead
/// of the half boundaries.
pub fn resolve_date_range(
    start_date: NaiveDate,
    end_date: NaiveDate,
    start_half: HalfDay,
    end_half: HalfDay,
    hours: &CabinHours,
) -> Result<TimeWindow, CoreError> {
    if start_half == HalfDay::Full || end_half == HalfDay::Full {
        return Err(CoreError::Validation(
            "date ranges take AM or PM markers, not FULL".into(),
        ));
    }
    let full_coverage =
        !hours.halfday && start_half == HalfDay::Am && end_half == HalfDay::Pm;
    let start = if full_coverage {
        match hours.full_start {
            Some(ct) => clock_start(start_date, ct),
            None => day_start(start_date),
        }
    } else {
        match hours.start_for(start_half) {
            Some(ct) => clock_start(start_date, ct),
            None => match start_half {
                HalfDay::Am => day_start(start_date),
                _ => noon(start_date),
            },
        }
    };
    let end = if full_coverage {
        match hours.full_end {
            Some(ct) => clock_end(end_date, ct),
            None => day_end(end_date),
        }
    } else {
        match hours.end_for(end_half) {
            Some(ct) => clock_end(end_date, ct),
            None => match end_half {
                HalfDay::Am => noon(end_date),
                _ => day_end(end_date),
            },
        }
    };
    if end <= start {
        return Err(CoreError::Validation(
            "end date must be after start date".into(),
        ));
    }
    Ok(TimeWindow::new(start, end))
}

/// Resolve an exact-instant booking from already-parsed timestamps.
pub fn resolve_exact(start: Timestamp, end: Timestamp) -> Result<TimeWindow, CoreError> {
    if end <= start {
        return Err(CoreError::Validation(
            "end instant must be after start instant".into(),
        ));
    }
    Ok(TimeWindow::new(start, end))
}

/// Segments of one multi-segment request must not overlap each other.
pub fn ensure_disjoint(windows: &[TimeWindow]) -> Result<(), CoreError> {
    for (i, a) in windows.iter().enumerate() {
        for b in windows.iter().skip(i + 1) {
            if a.overlaps(b) {
                return Err(CoreError::Validation(format!(
                    "segments overlap: [{} .. {}] and [{} .. {}]",
                    a.start, a.end, b.start, b.end
                )));
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse an ISO timestamp. Offsets are honoured; naive datetimes are
/// taken as UTC.
pub fn parse_utc(s: &str) -> Result<Timestamp, CoreError> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&chrono::Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }
    Err(CoreError::Validation(format!("invalid timestamp: {s}")))
}

/// Parse a calendar date. Accepts plain `YYYY-MM-DD` or a full ISO
/// timestamp whose date part is used.
pub fn parse_date(s: &str) -> Result<NaiveDate, CoreError> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    parse_utc(s)
        .map(|ts| ts.date_naive())
        .map_err(|_| CoreError::Validation(format!("invalid date: {s}")))
}

/// Past rule for booking creation: a window is in the past once its end
/// instant has elapsed. A range that started yesterday but ends tomorrow
/// is still bookable; today's AM half stops being bookable at noon.
pub fn has_ended(window: &TimeWindow, now: Timestamp) -> bool {
    window.end < now
}

/// True when a window's start instant has already elapsed. Used for
/// cancellation cut-offs, which are instant-precise rather than
/// day-granular.
pub fn has_started(window: &TimeWindow, now: Timestamp) -> bool {
    window.start <= now
}

/// Millisecond-truncated `now`, matching the precision of resolved
/// window boundaries.
pub fn now_utc() -> Timestamp {
    let now = chrono::Utc::now();
    now.with_nanosecond(now.timestamp_subsec_millis() * 1_000_000)
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn ts(s: &str) -> Timestamp {
        parse_utc(s).unwrap()
    }

    #[test]
    fn clock_time_parses_and_rejects() {
        assert_eq!("08:30".parse::<ClockTime>().unwrap(), ClockTime { hour: 8, minute: 30 });
        assert_eq!("00:00".parse::<ClockTime>().unwrap(), ClockTime { hour: 0, minute: 0 });
        assert_matches!("24:00".parse::<ClockTime>(), Err(CoreError::Validation(_)));
        assert_matches!("12:60".parse::<ClockTime>(), Err(CoreError::Validation(_)));
        assert_matches!("noon".parse::<ClockTime>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn single_day_am_uses_fixed_morning_bounds() {
        let w = resolve_single_day(d("2025-08-01"), HalfDay::Am, None, None, &CabinHours::default())
            .unwrap();
        assert_eq!(w.start, ts("2025-08-01T00:00:00Z"));
        assert_eq!(w.end, ts("2025-08-01T11:59:59.999Z"));
    }

    #[test]
    fn single_day_pm_uses_fixed_afternoon_bounds() {
        let w = resolve_single_day(d("2025-08-01"), HalfDay::Pm, None, None, &CabinHours::default())
            .unwrap();
        assert_eq!(w.start, ts("2025-08-01T12:00:00Z"));
        assert_eq!(w.end, ts("2025-08-01T23:59:59.999Z"));
    }

    #[test]
    fn single_day_full_spans_whole_day() {
        let w =
            resolve_single_day(d("2025-08-01"), HalfDay::Full, None, None, &CabinHours::default())
                .unwrap();
        assert_eq!(w.start, ts("2025-08-01T00:00:00Z"));
        assert_eq!(w.end, ts("2025-08-01T23:59:59.999Z"));
    }

    #[test]
    fn custom_full_day_hours_override_fixed_bounds() {
        let w = resolve_single_day(
            d("2025-08-01"),
            HalfDay::Full,
            Some("08:00".parse().unwrap()),
            Some("20:00".parse().unwrap()),
            &CabinHours::default(),
        )
        .unwrap();
        assert_eq!(w.start, ts("2025-08-01T08:00:00Z"));
        assert_eq!(w.end, ts("2025-08-01T20:00:00.999Z"));
    }

    #[test]
    fn cabin_hours_apply_when_request_gives_none() {
        let hours = CabinHours {
            am_start: Some("07:00".parse().unwrap()),
            am_end: Some("11:00".parse().unwrap()),
            ..CabinHours::default()
        };
        let w = resolve_single_day(d("2025-08-01"), HalfDay::Am, None, None, &hours).unwrap();
        assert_eq!(w.start, ts("2025-08-01T07:00:00Z"));
        assert_eq!(w.end, ts("2025-08-01T11:00:00.999Z"));
    }

    #[test]
    fn request_hours_beat_cabin_hours() {
        let hours = CabinHours {
            am_start: Some("07:00".parse().unwrap()),
            ..CabinHours::default()
        };
        let w = resolve_single_day(
            d("2025-08-01"),
            HalfDay::Am,
            Some("09:00".parse().unwrap()),
            None,
            &hours,
        )
        .unwrap();
        assert_eq!(w.start, ts("2025-08-01T09:00:00Z"));
        assert_eq!(w.end, ts("2025-08-01T11:59:59.999Z"));
    }

    #[test]
    fn custom_times_must_stay_inside_the_declared_half() {
        // An "AM" booking in the afternoon is refused.
        let r = resolve_single_day(
            d("2025-08-01"),
            HalfDay::Am,
            Some("14:00".parse().unwrap()),
            Some("15:00".parse().unwrap()),
            &CabinHours::default(),
        );
        assert_matches!(r, Err(CoreError::Validation(_)));

        // A "PM" booking starting in the morning is refused too.
        let r = resolve_single_day(
            d("2025-08-01"),
            HalfDay::Pm,
            Some("08:00".parse().unwrap()),
            Some("14:00".parse().unwrap()),
            &CabinHours::default(),
        );
        assert_matches!(r, Err(CoreError::Validation(_)));

        // Cabin-level hours are held to the same rule.
        let hours = CabinHours {
            am_end: Some("13:00".parse().unwrap()),
            ..CabinHours::default()
        };
        let r = resolve_single_day(d("2025-08-01"), HalfDay::Am, None, None, &hours);
        assert_matches!(r, Err(CoreError::Validation(_)));

        // FULL accepts any times.
        let w = resolve_single_day(
            d("2025-08-01"),
            HalfDay::Full,
            Some("14:00".parse().unwrap()),
            Some("15:00".parse().unwrap()),
            &CabinHours::default(),
        );
        assert!(w.is_ok());
    }

    #[test]
    fn am_custom_end_at_noon_closes_sharp() {
        let am = resolve_single_day(
            d("2025-08-01"),
            HalfDay::Am,
            Some("08:00".parse().unwrap()),
            Some("12:00".parse().unwrap()),
            &CabinHours::default(),
        )
        .unwrap();
        assert_eq!(am.end, ts("2025-08-01T12:00:00Z"));
        let pm = resolve_single_day(d("2025-08-01"), HalfDay::Pm, None, None, &CabinHours::default())
            .unwrap();
        assert!(!am.overlaps(&pm));
    }

    #[test]
    fn inverted_custom_hours_rejected() {
        let r = resolve_single_day(
            d("2025-08-01"),
            HalfDay::Full,
            Some("20:00".parse().unwrap()),
            Some("08:00".parse().unwrap()),
            &CabinHours::default(),
        );
        assert_matches!(r, Err(CoreError::Validation(_)));
    }

    #[test]
    fn range_ending_am_closes_at_noon_sharp() {
        let w = resolve_date_range(
            d("2025-08-01"),
            d("2025-08-03"),
            HalfDay::Pm,
            HalfDay::Am,
            &CabinHours::default(),
        )
        .unwrap();
        assert_eq!(w.start, ts("2025-08-01T12:00:00Z"));
        assert_eq!(w.end, ts("2025-08-03T12:00:00Z"));
    }

    #[test]
    fn range_ending_pm_closes_at_end_of_day() {
        let w = resolve_date_range(
            d("2025-08-01"),
            d("2025-08-03"),
            HalfDay::Am,
            HalfDay::Pm,
            &CabinHours::default(),
        )
        .unwrap();
        assert_eq!(w.start, ts("2025-08-01T00:00:00Z"));
        assert_eq!(w.end, ts("2025-08-03T23:59:59.999Z"));
    }

    #[test]
    fn full_coverage_range_takes_full_day_hours_without_halfday() {
        let hours = CabinHours {
            halfday: false,
            full_start: Some("08:00".parse().unwrap()),
            full_end: Some("20:00".parse().unwrap()),
            ..CabinHours::default()
        };
        let w = resolve_date_range(
            d("2025-08-01"),
            d("2025-08-03"),
            HalfDay::Am,
            HalfDay::Pm,
            &hours,
        )
        .unwrap();
        assert_eq!(w.start, ts("2025-08-01T08:00:00Z"));
        assert_eq!(w.end, ts("2025-08-03T20:00:00.999Z"));

        // With half-day availability on, the half boundaries apply.
        let halfday = CabinHours { halfday: true, ..hours };
        let w = resolve_date_range(
            d("2025-08-01"),
            d("2025-08-03"),
            HalfDay::Am,
            HalfDay::Pm,
            &halfday,
        )
        .unwrap();
        assert_eq!(w.start, ts("2025-08-01T00:00:00Z"));
        assert_eq!(w.end, ts("2025-08-03T23:59:59.999Z"));

        // A range not spanning full coverage keeps the half boundaries
        // even on a full-day cabin.
        let w = resolve_date_range(
            d("2025-08-01"),
            d("2025-08-03"),
            HalfDay::Pm,
            HalfDay::Am,
            &hours,
        )
        .unwrap();
        assert_eq!(w.start, ts("2025-08-01T12:00:00Z"));
        assert_eq!(w.end, ts("2025-08-03T12:00:00Z"));
    }

    #[test]
    fn range_rejects_full_marker_and_inverted_dates() {
        let r = resolve_date_range(
            d("2025-08-01"),
            d("2025-08-03"),
            HalfDay::Full,
            HalfDay::Pm,
            &CabinHours::default(),
        );
        assert_matches!(r, Err(CoreError::Validation(_)));

        let r = resolve_date_range(
            d("2025-08-05"),
            d("2025-08-03"),
            HalfDay::Am,
            HalfDay::Pm,
            &CabinHours::default(),
        );
        assert_matches!(r, Err(CoreError::Validation(_)));
    }

    #[test]
    fn am_then_pm_on_the_same_day_do_not_collide() {
        let am = resolve_single_day(d("2025-08-01"), HalfDay::Am, None, None, &CabinHours::default())
            .unwrap();
        let pm = resolve_single_day(d("2025-08-01"), HalfDay::Pm, None, None, &CabinHours::default())
            .unwrap();
        assert!(!am.overlaps(&pm));
    }

    #[test]
    fn range_ending_am_permits_same_day_pm_start() {
        let range = resolve_date_range(
            d("2025-08-01"),
            d("2025-08-03"),
            HalfDay::Am,
            HalfDay::Am,
            &CabinHours::default(),
        )
        .unwrap();
        let pm = resolve_single_day(d("2025-08-03"), HalfDay::Pm, None, None, &CabinHours::default())
            .unwrap();
        assert!(!range.overlaps(&pm));
    }

    #[test]
    fn full_day_collides_with_both_halves() {
        let full =
            resolve_single_day(d("2025-08-01"), HalfDay::Full, None, None, &CabinHours::default())
                .unwrap();
        let am = resolve_single_day(d("2025-08-01"), HalfDay::Am, None, None, &CabinHours::default())
            .unwrap();
        let pm = resolve_single_day(d("2025-08-01"), HalfDay::Pm, None, None, &CabinHours::default())
            .unwrap();
        assert!(full.overlaps(&am));
        assert!(full.overlaps(&pm));
    }

    #[test]
    fn overlap_is_strict_at_shared_endpoints() {
        let a = ts("2025-08-01T00:00:00Z");
        let b = ts("2025-08-01T12:00:00Z");
        let c = ts("2025-08-02T00:00:00Z");
        assert!(!ranges_overlap(a, b, b, c));
        assert!(ranges_overlap(a, c, b, c));
    }

    #[test]
    fn exact_window_requires_forward_time() {
        assert_matches!(
            resolve_exact(ts("2025-08-02T10:00:00Z"), ts("2025-08-02T09:00:00Z")),
            Err(CoreError::Validation(_))
        );
        let w = resolve_exact(ts("2025-08-02T09:00:00Z"), ts("2025-08-02T10:00:00Z")).unwrap();
        assert_eq!(w.start, ts("2025-08-02T09:00:00Z"));
    }

    #[test]
    fn disjoint_check_catches_overlapping_segments() {
        let a = TimeWindow::new(ts("2025-08-01T00:00:00Z"), ts("2025-08-02T12:00:00Z"));
        let b = TimeWindow::new(ts("2025-08-02T12:00:00Z"), ts("2025-08-04T00:00:00Z"));
        let c = TimeWindow::new(ts("2025-08-03T00:00:00Z"), ts("2025-08-05T00:00:00Z"));
        assert!(ensure_disjoint(&[a, b]).is_ok());
        assert_matches!(ensure_disjoint(&[a, b, c]), Err(CoreError::Validation(_)));
    }

    #[test]
    fn naive_timestamps_parse_as_utc() {
        assert_eq!(parse_utc("2025-08-01T14:30:00").unwrap(), ts("2025-08-01T14:30:00Z"));
        assert_eq!(
            parse_utc("2025-08-01T14:30:00+02:00").unwrap(),
            ts("2025-08-01T12:30:00Z")
        );
        assert_matches!(parse_utc("not-a-time"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn date_parsing_accepts_plain_and_iso_forms() {
        assert_eq!(parse_date("2025-08-01").unwrap(), d("2025-08-01"));
        assert_eq!(parse_date("2025-08-01T18:00:00Z").unwrap(), d("2025-08-01"));
        assert_matches!(parse_date("08/01/2025"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn past_rule_uses_the_end_instant() {
        let now = ts("2025-08-15T20:00:00Z");
        // Today's AM half has already ended at 20:00.
        let am = resolve_single_day(d("2025-08-15"), HalfDay::Am, None, None, &CabinHours::default())
            .unwrap();
        assert!(has_ended(&am, now));
        // A range that started yesterday but ends tomorrow is still live.
        let spanning = resolve_date_range(
            d("2025-08-14"),
            d("2025-08-16"),
            HalfDay::Am,
            HalfDay::Pm,
            &CabinHours::default(),
        )
        .unwrap();
        assert!(!has_ended(&spanning, now));
        // Today's PM half is still ahead.
        let pm = resolve_single_day(d("2025-08-15"), HalfDay::Pm, None, None, &CabinHours::default())
            .unwrap();
        assert!(!has_ended(&pm, now));
    }

    #[test]
    fn started_rule_is_instant_precise() {
        let now = ts("2025-08-15T10:00:00Z");
        let w = TimeWindow::new(ts("2025-08-15T09:00:00Z"), ts("2025-08-15T23:59:59.999Z"));
        assert!(has_started(&w, now));
        let w2 = TimeWindow::new(ts("2025-08-15T11:00:00Z"), ts("2025-08-15T23:59:59.999Z"));
        assert!(!has_started(&w2, now));
    }
}
