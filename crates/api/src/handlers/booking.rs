//! Handlers for booking creation, listings, and status transitions.
//!
//! Creation lives under `/cabins/{slug}/bookings` and accepts anonymous
//! requests; everything else lives under `/bookings` and requires a
//! token.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use hytte_core::error::CoreError;
use hytte_core::pagination::PageParams;
use hytte_core::types::DbId;
use hytte_db::models::booking::{Booking, BookingFilter};
use hytte_db::repositories::{BookingRepo, CabinRepo};

use crate::error::AppResult;
use crate::handlers::cabin::{load_cabin, require_manager};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::{DataResponse, PageResponse};
use crate::scheduling::lifecycle::{self, BookingRequest};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / request types
// ---------------------------------------------------------------------------

/// Query parameters shared by the booking listings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Status filter; `all` (or absent) matches everything.
    pub status: Option<String>,
    /// Owner listings may narrow to a single cabin.
    pub cabin_slug: Option<String>,
}

impl BookingListQuery {
    fn page_params(&self) -> PageParams {
        PageParams { page: self.page, limit: self.limit }
    }

    fn filter(&self) -> BookingFilter {
        BookingFilter { status: self.status.clone() }
    }
}

/// Optional body for approve/reject: `{ "sendEmail": false }` suppresses
/// the guest notification.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    pub send_email: Option<bool>,
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// POST /api/v1/cabins/{slug}/bookings
///
/// Create a booking (or several, for multi-segment payloads). Anonymous
/// requests are accepted; a present token attaches the requester.
pub async fn create_booking(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<BookingRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let cabin = load_cabin(&state.pool, &slug).await?;
    let user_id = user.map(|u| u.user_id);
    let created =
        lifecycle::create(&state.pool, &state.event_bus, &cabin, user_id, req).await?;

    // Single-shape requests get the booking object, multi-segment the list.
    let data = if created.len() == 1 {
        serde_json::json!({ "data": created[0] })
    } else {
        serde_json::json!({ "data": created })
    };
    Ok((StatusCode::CREATED, Json(data)))
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// GET /api/v1/bookings/mine
pub async fn list_my_bookings(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<BookingListQuery>,
) -> AppResult<Json<PageResponse<Booking>>> {
    let page = params.page_params();
    let filter = params.filter();
    let bookings =
        BookingRepo::list_for_user(&state.pool, user.user_id, &filter, page.limit(), page.offset())
            .await?;
    let total = BookingRepo::count_for_user(&state.pool, user.user_id, &filter).await?;
    Ok(Json(PageResponse::new(bookings, &page, total)))
}

/// GET /api/v1/bookings/owner
///
/// Bookings across every cabin the user owns, optionally narrowed to one
/// cabin via `cabinSlug`.
pub async fn list_owner_bookings(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<BookingListQuery>,
) -> AppResult<Json<PageResponse<Booking>>> {
    user.require_owner()?;
    let page = params.page_params();
    let filter = params.filter();
    owner_listing(&state, &user, &params, page, filter).await
}

/// GET /api/v1/bookings/pending
///
/// Owner inbox: pending bookings awaiting a decision.
pub async fn list_pending_bookings(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<BookingListQuery>,
) -> AppResult<Json<PageResponse<Booking>>> {
    user.require_owner()?;
    let page = params.page_params();
    let filter = BookingFilter { status: Some("pending".into()) };
    owner_listing(&state, &user, &params, page, filter).await
}

async fn owner_listing(
    state: &AppState,
    user: &AuthUser,
    params: &BookingListQuery,
    page: PageParams,
    filter: BookingFilter,
) -> AppResult<Json<PageResponse<Booking>>> {
    if let Some(slug) = &params.cabin_slug {
        let cabin = load_cabin(&state.pool, slug).await?;
        require_manager(user, &cabin)?;
        let bookings =
            BookingRepo::list_for_cabin(&state.pool, cabin.id, &filter, page.limit(), page.offset())
                .await?;
        let total = BookingRepo::count_for_cabin(&state.pool, cabin.id, &filter).await?;
        return Ok(Json(PageResponse::new(bookings, &page, total)));
    }

    let bookings = BookingRepo::list_for_owner(
        &state.pool,
        user.user_id,
        &filter,
        page.limit(),
        page.offset(),
    )
    .await?;
    let total = BookingRepo::count_for_owner(&state.pool, user.user_id, &filter).await?;
    Ok(Json(PageResponse::new(bookings, &page, total)))
}

/// GET /api/v1/cabins/{slug}/bookings
pub async fn list_cabin_bookings(
    user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<BookingListQuery>,
) -> AppResult<Json<PageResponse<Booking>>> {
    let cabin = load_cabin(&state.pool, &slug).await?;
    require_manager(&user, &cabin)?;
    let page = params.page_params();
    let filter = params.filter();
    let bookings =
        BookingRepo::list_for_cabin(&state.pool, cabin.id, &filter, page.limit(), page.offset())
            .await?;
    let total = BookingRepo::count_for_cabin(&state.pool, cabin.id, &filter).await?;
    Ok(Json(PageResponse::new(bookings, &page, total)))
}

/// GET /api/v1/bookings/{id}
///
/// Visible to the booking's creator and to the cabin's manager.
pub async fn get_booking(
    user: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let booking = lifecycle::find(&state.pool, booking_id).await?;

    let owns_booking = booking.user_id == Some(user.user_id);
    if !owns_booking && !user.is_admin() {
        let cabin = CabinRepo::find_by_id(&state.pool, booking.cabin_id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Cabin", id: booking.cabin_id })?;
        if cabin.owner_id != user.user_id {
            return Err(
                CoreError::Forbidden("You do not have access to this booking".into()).into(),
            );
        }
    }

    Ok(Json(DataResponse { data: booking }))
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// POST /api/v1/bookings/{id}/cancel
pub async fn cancel_booking(
    user: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let booking = lifecycle::cancel(&state.pool, &state.event_bus, &user, booking_id).await?;
    Ok(Json(DataResponse { data: booking }))
}

/// POST /api/v1/bookings/{id}/owner-cancel
pub async fn owner_cancel_booking(
    user: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let booking =
        lifecycle::owner_cancel(&state.pool, &state.event_bus, &user, booking_id).await?;
    Ok(Json(DataResponse { data: booking }))
}

/// POST /api/v1/bookings/{id}/approve
pub async fn approve_booking(
    user: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
    body: Option<Json<DecisionRequest>>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let send_email = body
        .map(|Json(b)| b.send_email.unwrap_or(true))
        .unwrap_or(true);
    let booking =
        lifecycle::approve(&state.pool, &state.event_bus, &user, booking_id, send_email).await?;
    Ok(Json(DataResponse { data: booking }))
}

/// POST /api/v1/bookings/{id}/reject
pub async fn reject_booking(
    user: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
    body: Option<Json<DecisionRequest>>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let send_email = body
        .map(|Json(b)| b.send_email.unwrap_or(true))
        .unwrap_or(true);
    let booking =
        lifecycle::reject(&state.pool, &state.event_bus, &user, booking_id, send_email).await?;
    Ok(Json(DataResponse { data: booking }))
}
