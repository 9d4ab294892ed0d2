//! Booking creation and status transitions.
//!
//! Creation accepts four payload shapes (single day, date range, exact
//! instants, multi-segment) and funnels them all through the core
//! resolver into [`ResolvedSegment`]s. The insert runs inside a
//! transaction that takes the per-cabin advisory lock before re-checking
//! availability, so two concurrent overlapping requests serialize and
//! exactly one wins. Multi-segment requests are atomic: any failing
//! segment rolls back all of them.
//!
//! Events are published only after commit; the notifier turns them into
//! guest/owner emails.

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use hytte_core::error::CoreError;
use hytte_core::status::CancelledBy;
use hytte_core::timewindow::{
    ensure_disjoint, has_ended, has_started, now_utc, parse_date, parse_utc, resolve_date_range,
    resolve_exact, resolve_single_day, CabinHours, ClockTime, HalfDay, TimeWindow,
};
use hytte_core::types::{DbId, Timestamp};
use hytte_db::models::booking::{Booking, CreateBooking, GuestContact};
use hytte_db::models::cabin::Cabin;
use hytte_db::repositories::{BookingRepo, CabinRepo, UserRepo};
use hytte_events::{BookingEvent, BookingNotice, EventBus};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::scheduling::availability::CabinActivity;

/// Upper bound on segments per multi-segment request.
const MAX_SEGMENTS: usize = 10;

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Guest contact block, required on every creation payload. For
/// anonymous bookings this is the only identity attached.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GuestContactRequest {
    #[validate(length(min = 2, max = 100, message = "guestName must be 2-100 characters"))]
    pub guest_name: String,
    #[validate(length(min = 2, max = 200, message = "guestAddress must be 2-200 characters"))]
    pub guest_address: String,
    #[validate(length(min = 2, max = 20, message = "guestPostalCode must be 2-20 characters"))]
    pub guest_postal_code: String,
    #[validate(length(min = 2, max = 100, message = "guestCity must be 2-100 characters"))]
    pub guest_city: String,
    #[validate(length(min = 5, max = 30, message = "guestPhone must be 5-30 characters"))]
    pub guest_phone: String,
    #[validate(email(message = "guestEmail must be a valid email address"))]
    pub guest_email: String,
    pub guest_affiliation: Option<String>,
}

impl GuestContactRequest {
    fn into_contact(self) -> GuestContact {
        GuestContact {
            guest_name: self.guest_name,
            guest_address: self.guest_address,
            guest_postal_code: self.guest_postal_code,
            guest_city: self.guest_city,
            guest_phone: self.guest_phone,
            guest_email: self.guest_email,
            guest_affiliation: self
                .guest_affiliation
                .filter(|a| !a.trim().is_empty()),
        }
    }
}

/// One entry of a multi-segment request, always date-range shaped.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentRequest {
    pub start_date: String,
    pub end_date: String,
    pub start_half: Option<HalfDay>,
    pub end_half: Option<HalfDay>,
}

/// Booking creation payload. Exactly one of the four window shapes must
/// be present:
///
/// - single day: `date` (+ optional `half`, `startTime`/`endTime`)
/// - date range: `startDate` + `endDate` (+ optional halves)
/// - exact window: `startDateTime` + `endDateTime`, no other date fields
/// - multi-segment: `segments` (1..=10 date ranges)
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    // Single day
    pub date: Option<String>,
    pub half: Option<HalfDay>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    // Date range
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub start_half: Option<HalfDay>,
    pub end_half: Option<HalfDay>,
    // Exact instants
    pub start_date_time: Option<String>,
    pub end_date_time: Option<String>,
    // Multi-segment
    pub segments: Option<Vec<SegmentRequest>>,

    #[serde(flatten)]
    #[validate(nested)]
    pub guest: GuestContactRequest,
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// A fully resolved bookable interval plus the coarse columns stored
/// alongside it.
#[derive(Debug, Clone)]
pub struct ResolvedSegment {
    pub window: TimeWindow,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_half: Option<String>,
    pub end_half: Option<String>,
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

fn resolve_single(req: &BookingRequest, hours: &CabinHours) -> Result<ResolvedSegment, CoreError> {
    let date = parse_date(req.date.as_deref().unwrap_or_default())?;
    let half = req.half.unwrap_or(HalfDay::Full);
    let start_time = parse_clock("startTime", &req.start_time)?;
    let end_time = parse_clock("endTime", &req.end_time)?;
    if start_time.is_some() != end_time.is_some() {
        return Err(CoreError::Validation(
            "Both startTime and endTime must be provided for custom times".into(),
        ));
    }
    let window = resolve_single_day(date, half, start_time, end_time, hours)?;
    Ok(ResolvedSegment {
        window,
        start_date: date,
        end_date: date,
        start_half: Some(half.as_str().to_string()),
        end_half: Some(half.as_str().to_string()),
    })
}

fn resolve_range(
    start_date: &str,
    end_date: &str,
    start_half: Option<HalfDay>,
    end_half: Option<HalfDay>,
    hours: &CabinHours,
) -> Result<ResolvedSegment, CoreError> {
    let start_date = parse_date(start_date)?;
    let end_date = parse_date(end_date)?;
    if end_date <= start_date {
        return Err(CoreError::Validation(
            "endDate must be after startDate".into(),
        ));
    }
    let start_half = start_half.unwrap_or(HalfDay::Am);
    let end_half = end_half.unwrap_or(HalfDay::Pm);
    let window = resolve_date_range(start_date, end_date, start_half, end_half, hours)?;
    Ok(ResolvedSegment {
        window,
        start_date,
        end_date,
        start_half: Some(start_half.as_str().to_string()),
        end_half: Some(end_half.as_str().to_string()),
    })
}

fn resolve_exact_shape(start: &str, end: &str) -> Result<ResolvedSegment, CoreError> {
    let start = parse_utc(start)?;
    let end = parse_utc(end)?;
    let window = resolve_exact(start, end)?;
    Ok(ResolvedSegment {
        window,
        start_date: start.date_naive(),
        end_date: end.date_naive(),
        start_half: None,
        end_half: None,
    })
}

/// Resolve a creation payload into one or more segments, sorted by
/// start. Rejects ambiguous payloads that mix shapes.
pub fn resolve_request(
    req: &BookingRequest,
    hours: &CabinHours,
) -> Result<Vec<ResolvedSegment>, CoreError> {
    let has_exact = req.start_date_time.is_some() || req.end_date_time.is_some();
    let has_single = req.date.is_some();
    let has_range = req.start_date.is_some() || req.end_date.is_some();

    if let Some(segments) = &req.segments {
        if has_exact || has_single || has_range {
            return Err(CoreError::Validation(
                "segments cannot be combined with other date fields".into(),
            ));
        }
        if segments.is_empty() || segments.len() > MAX_SEGMENTS {
            return Err(CoreError::Validation(format!(
                "segments must contain between 1 and {MAX_SEGMENTS} entries"
            )));
        }
        let mut resolved = segments
            .iter()
            .map(|s| resolve_range(&s.start_date, &s.end_date, s.start_half, s.end_half, hours))
            .collect::<Result<Vec<_>, _>>()?;
        resolved.sort_by_key(|s| s.window.start);
        let windows: Vec<TimeWindow> = resolved.iter().map(|s| s.window).collect();
        ensure_disjoint(&windows)?;
        return Ok(resolved);
    }

    if has_exact {
        if has_single || has_range || req.half.is_some() {
            return Err(CoreError::Validation(
                "startDateTime/endDateTime cannot be combined with date fields".into(),
            ));
        }
        let (Some(start), Some(end)) = (&req.start_date_time, &req.end_date_time) else {
            return Err(CoreError::Validation(
                "Both startDateTime and endDateTime are required".into(),
            ));
        };
        return Ok(vec![resolve_exact_shape(start, end)?]);
    }

    if has_single {
        if has_range {
            return Err(CoreError::Validation(
                "date cannot be combined with startDate/endDate".into(),
            ));
        }
        return Ok(vec![resolve_single(req, hours)?]);
    }

    if has_range {
        let (Some(start), Some(end)) = (&req.start_date, &req.end_date) else {
            return Err(CoreError::Validation(
                "Both startDate and endDate are required".into(),
            ));
        };
        return Ok(vec![resolve_range(
            start,
            end,
            req.start_half,
            req.end_half,
            hours,
        )?]);
    }

    Err(CoreError::Validation(
        "Request must include a date, a date range, exact instants, or segments".into(),
    ))
}

/// A window is only bookable while its end instant is still ahead; a
/// range that started yesterday but ends tomorrow passes.
fn ensure_not_ended(segments: &[ResolvedSegment], now: Timestamp) -> Result<(), CoreError> {
    for seg in segments {
        if has_ended(&seg.window, now) {
            return Err(CoreError::PastDate("Cannot book dates in the past".into()));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// Create one booking per resolved segment, atomically.
///
/// The transaction takes the cabin's advisory lock, re-reads the
/// occupancy snapshot under it, verifies every segment, and only then
/// inserts. `booking.created` is published per segment after commit.
pub async fn create(
    pool: &PgPool,
    bus: &EventBus,
    cabin: &Cabin,
    user_id: Option<DbId>,
    req: BookingRequest,
) -> AppResult<Vec<Booking>> {
    req.validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;

    let hours = cabin.hours()?;
    let segments = resolve_request(&req, &hours)?;

    ensure_not_ended(&segments, now_utc())?;

    let guest = req.guest.into_contact();

    let mut tx = pool.begin().await?;
    let activity = CabinActivity::load_locked(&mut tx, cabin.id).await?;
    for seg in &segments {
        activity.ensure_free(&seg.window)?;
    }

    let mut created = Vec::with_capacity(segments.len());
    for seg in &segments {
        let input = CreateBooking {
            cabin_id: cabin.id,
            user_id,
            start_date: seg.start_date,
            end_date: seg.end_date,
            start_half: seg.start_half.clone(),
            end_half: seg.end_half.clone(),
            start_at: seg.window.start,
            end_at: seg.window.end,
            guest: guest.clone(),
            order_ref: Uuid::new_v4(),
        };
        created.push(BookingRepo::create(&mut *tx, &input).await?);
    }
    tx.commit().await?;

    let owner_email = owner_notification_email(pool, cabin).await;
    for booking in &created {
        tracing::info!(
            booking_id = booking.id,
            cabin_id = cabin.id,
            order_ref = %booking.order_ref,
            "Booking created"
        );
        publish(bus, "booking.created", cabin, booking, user_id, owner_email.clone(), true);
    }
    Ok(created)
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// Load a booking or 404.
pub async fn find(pool: &PgPool, id: DbId) -> AppResult<Booking> {
    BookingRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| CoreError::NotFound { entity: "Booking", id }.into())
}

async fn cabin_of(pool: &PgPool, booking: &Booking) -> AppResult<Cabin> {
    CabinRepo::find_by_id(pool, booking.cabin_id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound { entity: "Cabin", id: booking.cabin_id }.into()
        })
}

fn manages_cabin(user: &AuthUser, cabin: &Cabin) -> bool {
    user.is_admin() || cabin.owner_id == user.user_id
}

/// Guest-path cancellation. The requester must own the booking (or
/// manage the cabin); a rejected booking may still be cancelled, an
/// already-started one may not -- except by the cabin's manager.
pub async fn cancel(
    pool: &PgPool,
    bus: &EventBus,
    user: &AuthUser,
    booking_id: DbId,
) -> AppResult<Booking> {
    let booking = find(pool, booking_id).await?;
    let cabin = cabin_of(pool, &booking).await?;
    let manages = manages_cabin(user, &cabin);

    if !manages && booking.user_id != Some(user.user_id) {
        return Err(CoreError::Forbidden("You can only cancel your own bookings".into()).into());
    }
    booking.status()?.cancel_by_guest()?;
    if !manages && has_started(&booking.window(), now_utc()) {
        return Err(CoreError::Validation(
            "Cannot cancel a booking that has already started".into(),
        )
        .into());
    }

    // A guarded update matching no row means the status changed under
    // us, not that the booking vanished.
    let cancelled = BookingRepo::cancel(pool, booking_id, CancelledBy::Guest)
        .await?
        .ok_or_else(|| CoreError::Conflict("booking is already cancelled".into()))?;

    let owner_email = owner_notification_email(pool, &cabin).await;
    publish(bus, "booking.cancelled", &cabin, &cancelled, Some(user.user_id), owner_email, true);
    Ok(cancelled)
}

/// Owner-path cancellation: refuses rejected and cancelled bookings but
/// is allowed on bookings that already started.
pub async fn owner_cancel(
    pool: &PgPool,
    bus: &EventBus,
    user: &AuthUser,
    booking_id: DbId,
) -> AppResult<Booking> {
    let booking = find(pool, booking_id).await?;
    let cabin = cabin_of(pool, &booking).await?;
    if !manages_cabin(user, &cabin) {
        return Err(
            CoreError::Forbidden("Only the cabin owner can cancel this booking".into()).into(),
        );
    }
    booking.status()?.cancel_by_owner()?;

    let cancelled = BookingRepo::cancel(pool, booking_id, CancelledBy::Owner)
        .await?
        .ok_or_else(|| CoreError::Conflict("booking is already cancelled".into()))?;

    let owner_email = owner_notification_email(pool, &cabin).await;
    publish(bus, "booking.owner_cancelled", &cabin, &cancelled, Some(user.user_id), owner_email, true);
    Ok(cancelled)
}

pub async fn approve(
    pool: &PgPool,
    bus: &EventBus,
    user: &AuthUser,
    booking_id: DbId,
    send_email: bool,
) -> AppResult<Booking> {
    decide(pool, bus, user, booking_id, true, send_email).await
}

pub async fn reject(
    pool: &PgPool,
    bus: &EventBus,
    user: &AuthUser,
    booking_id: DbId,
    send_email: bool,
) -> AppResult<Booking> {
    decide(pool, bus, user, booking_id, false, send_email).await
}

/// Owner decision on a pending booking. `send_email` lets the owner
/// suppress the guest notification.
async fn decide(
    pool: &PgPool,
    bus: &EventBus,
    user: &AuthUser,
    booking_id: DbId,
    approve: bool,
    send_email: bool,
) -> AppResult<Booking> {
    let booking = find(pool, booking_id).await?;
    let cabin = cabin_of(pool, &booking).await?;
    if !manages_cabin(user, &cabin) {
        return Err(CoreError::Forbidden(
            "Only the cabin owner can decide on this booking".into(),
        )
        .into());
    }

    let status = booking.status()?;
    let (next, event_type) = if approve {
        (status.approve()?, "booking.approved")
    } else {
        (status.reject()?, "booking.rejected")
    };

    let updated = BookingRepo::update_status(pool, booking_id, next.as_str())
        .await?
        .ok_or_else(|| CoreError::Conflict("booking is no longer pending".into()))?;

    let owner_email = owner_notification_email(pool, &cabin).await;
    publish(bus, event_type, &cabin, &updated, Some(user.user_id), owner_email, send_email);
    Ok(updated)
}

// ---------------------------------------------------------------------------
// Event publication
// ---------------------------------------------------------------------------

/// The address owner notifications go to: the cabin's contact email,
/// falling back to the owner account's login email.
async fn owner_notification_email(pool: &PgPool, cabin: &Cabin) -> Option<String> {
    if let Some(email) = &cabin.email {
        return Some(email.clone());
    }
    match UserRepo::find_by_id(pool, cabin.owner_id).await {
        Ok(owner) => owner.map(|u| u.email),
        Err(err) => {
            tracing::warn!(cabin_id = cabin.id, %err, "Could not load cabin owner for notification");
            None
        }
    }
}

fn publish(
    bus: &EventBus,
    event_type: &str,
    cabin: &Cabin,
    booking: &Booking,
    actor: Option<DbId>,
    owner_email: Option<String>,
    send_email: bool,
) {
    let window = booking.window();
    let notice = BookingNotice {
        cabin_name: cabin.name.clone(),
        guest_name: booking.guest_name.clone(),
        guest_email: booking.guest_email.clone(),
        owner_email,
        start_at: window.start,
        end_at: window.end,
        order_ref: booking.order_ref.to_string(),
        status: booking.status.clone(),
        send_email,
    };
    let mut event = BookingEvent::new(event_type)
        .with_cabin(cabin.id)
        .with_booking(booking.id)
        .with_payload(notice.into_payload());
    if let Some(actor) = actor {
        event = event.with_actor(actor);
    }
    bus.publish(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn guest() -> GuestContactRequest {
        GuestContactRequest {
            guest_name: "Kari Nordmann".into(),
            guest_address: "Storgata 1".into(),
            guest_postal_code: "0155".into(),
            guest_city: "Oslo".into(),
            guest_phone: "+47 99 88 77 66".into(),
            guest_email: "kari@example.com".into(),
            guest_affiliation: None,
        }
    }

    fn base_request() -> BookingRequest {
        BookingRequest {
            date: None,
            half: None,
            start_time: None,
            end_time: None,
            start_date: None,
            end_date: None,
            start_half: None,
            end_half: None,
            start_date_time: None,
            end_date_time: None,
            segments: None,
            guest: guest(),
        }
    }

    fn hours() -> CabinHours {
        CabinHours::default()
    }

    #[test]
    fn single_day_defaults_to_full() {
        let mut req = base_request();
        req.date = Some("2025-08-01".into());
        let segments = resolve_request(&req, &hours()).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start_half.as_deref(), Some("FULL"));
        assert_eq!(segments[0].start_date, segments[0].end_date);
        assert_eq!(
            segments[0].window.start,
            parse_utc("2025-08-01T00:00:00Z").unwrap()
        );
        assert_eq!(
            segments[0].window.end,
            parse_utc("2025-08-01T23:59:59.999Z").unwrap()
        );
    }

    #[test]
    fn single_day_requires_both_custom_times() {
        let mut req = base_request();
        req.date = Some("2025-08-01".into());
        req.half = Some(HalfDay::Am);
        req.start_time = Some("08:00".into());
        assert_matches!(
            resolve_request(&req, &hours()),
            Err(CoreError::Validation(_))
        );

        req.end_time = Some("11:00".into());
        let segments = resolve_request(&req, &hours()).unwrap();
        assert_eq!(
            segments[0].window.end,
            parse_utc("2025-08-01T11:00:00.999Z").unwrap()
        );
    }

    #[test]
    fn range_defaults_to_am_pm_halves() {
        let mut req = base_request();
        req.start_date = Some("2025-08-01".into());
        req.end_date = Some("2025-08-03".into());
        let segments = resolve_request(&req, &hours()).unwrap();
        assert_eq!(segments[0].start_half.as_deref(), Some("AM"));
        assert_eq!(segments[0].end_half.as_deref(), Some("PM"));
        assert_eq!(
            segments[0].window.end,
            parse_utc("2025-08-03T23:59:59.999Z").unwrap()
        );
    }

    #[test]
    fn range_rejects_inverted_or_equal_dates() {
        let mut req = base_request();
        req.start_date = Some("2025-08-03".into());
        req.end_date = Some("2025-08-03".into());
        assert_matches!(
            resolve_request(&req, &hours()),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn exact_shape_rejects_mixing_with_date_fields() {
        let mut req = base_request();
        req.start_date_time = Some("2025-08-01T10:00:00Z".into());
        req.end_date_time = Some("2025-08-01T14:00:00Z".into());
        req.date = Some("2025-08-01".into());
        assert_matches!(
            resolve_request(&req, &hours()),
            Err(CoreError::Validation(_))
        );

        req.date = None;
        let segments = resolve_request(&req, &hours()).unwrap();
        assert!(segments[0].start_half.is_none());
        assert_eq!(
            segments[0].window.start,
            parse_utc("2025-08-01T10:00:00Z").unwrap()
        );
    }

    #[test]
    fn exact_shape_requires_both_instants() {
        let mut req = base_request();
        req.start_date_time = Some("2025-08-01T10:00:00Z".into());
        assert_matches!(
            resolve_request(&req, &hours()),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn segments_are_sorted_and_must_be_disjoint() {
        let mut req = base_request();
        req.segments = Some(vec![
            SegmentRequest {
                start_date: "2025-08-10".into(),
                end_date: "2025-08-12".into(),
                start_half: None,
                end_half: Some(HalfDay::Am),
            },
            SegmentRequest {
                start_date: "2025-08-01".into(),
                end_date: "2025-08-03".into(),
                start_half: None,
                end_half: None,
            },
        ]);
        let segments = resolve_request(&req, &hours()).unwrap();
        assert_eq!(segments[0].start_date.to_string(), "2025-08-01");
        assert_eq!(segments[1].start_date.to_string(), "2025-08-10");

        // Overlapping segments are refused before persistence.
        req.segments = Some(vec![
            SegmentRequest {
                start_date: "2025-08-01".into(),
                end_date: "2025-08-05".into(),
                start_half: None,
                end_half: None,
            },
            SegmentRequest {
                start_date: "2025-08-04".into(),
                end_date: "2025-08-08".into(),
                start_half: None,
                end_half: None,
            },
        ]);
        assert_matches!(
            resolve_request(&req, &hours()),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn segment_count_is_bounded() {
        let mut req = base_request();
        req.segments = Some(Vec::new());
        assert_matches!(
            resolve_request(&req, &hours()),
            Err(CoreError::Validation(_))
        );

        let many: Vec<SegmentRequest> = (0..11)
            .map(|i| SegmentRequest {
                start_date: format!("2025-{:02}-01", i % 12 + 1),
                end_date: format!("2025-{:02}-02", i % 12 + 1),
                start_half: None,
                end_half: None,
            })
            .collect();
        req.segments = Some(many);
        assert_matches!(
            resolve_request(&req, &hours()),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn empty_shape_is_rejected() {
        assert_matches!(
            resolve_request(&base_request(), &hours()),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn past_check_keys_off_the_end_instant() {
        let now = parse_utc("2025-08-15T20:00:00Z").unwrap();

        // Today's AM half ended before 20:00.
        let mut req = base_request();
        req.date = Some("2025-08-15".into());
        req.half = Some(HalfDay::Am);
        let segments = resolve_request(&req, &hours()).unwrap();
        assert_matches!(
            ensure_not_ended(&segments, now),
            Err(CoreError::PastDate(_))
        );

        // A range that started yesterday but ends tomorrow is bookable.
        let mut req = base_request();
        req.start_date = Some("2025-08-14".into());
        req.end_date = Some("2025-08-16".into());
        let segments = resolve_request(&req, &hours()).unwrap();
        assert!(ensure_not_ended(&segments, now).is_ok());

        // Today's full day still has time left at 20:00.
        let mut req = base_request();
        req.date = Some("2025-08-15".into());
        let segments = resolve_request(&req, &hours()).unwrap();
        assert!(ensure_not_ended(&segments, now).is_ok());
    }

    #[test]
    fn guest_contact_is_validated() {
        let mut req = base_request();
        req.date = Some("2025-08-01".into());
        req.guest.guest_email = "not-an-email".into();
        assert!(req.validate().is_err());

        req.guest.guest_email = "kari@example.com".into();
        req.guest.guest_name = "K".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn blank_affiliation_is_dropped() {
        let mut g = guest();
        g.guest_affiliation = Some("   ".into());
        assert!(g.into_contact().guest_affiliation.is_none());

        let mut g = guest();
        g.guest_affiliation = Some("Velforeningen".into());
        assert_eq!(
            g.into_contact().guest_affiliation.as_deref(),
            Some("Velforeningen")
        );
    }
}
