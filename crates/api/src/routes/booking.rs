//! Route definitions for the `/bookings` resource.
//!
//! All endpoints require authentication; creation lives under
//! `/cabins/{slug}/bookings` instead so anonymous guests can book.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::booking;
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// GET    /mine               -> list_my_bookings
/// GET    /owner              -> list_owner_bookings (owner)
/// GET    /pending            -> list_pending_bookings (owner)
/// GET    /{id}               -> get_booking
///
/// POST   /{id}/cancel        -> cancel_booking
/// POST   /{id}/owner-cancel  -> owner_cancel_booking (manager)
/// POST   /{id}/approve       -> approve_booking (manager)
/// POST   /{id}/reject        -> reject_booking (manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        // Listings
        .route("/mine", get(booking::list_my_bookings))
        .route("/owner", get(booking::list_owner_bookings))
        .route("/pending", get(booking::list_pending_bookings))
        .route("/{id}", get(booking::get_booking))
        // Status transitions
        .route("/{id}/cancel", post(booking::cancel_booking))
        .route("/{id}/owner-cancel", post(booking::owner_cancel_booking))
        .route("/{id}/approve", post(booking::approve_booking))
        .route("/{id}/reject", post(booking::reject_booking))
}
