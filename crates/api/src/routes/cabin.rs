//! Route definitions for the `/cabins` resource and its nested
//! sub-resources (bookings, blocks, calendar, notes, legend).
//!
//! Reads of the cabin itself, the availability probe, booked dates, and
//! the calendar are public; everything else requires a token.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{block, booking, cabin, calendar, legend, note};
use crate::state::AppState;

/// Routes mounted at `/cabins`.
///
/// ```text
/// GET    /                        -> list_cabins (public)
/// POST   /                        -> create_cabin (owner)
/// GET    /{slug}                  -> get_cabin (public)
/// PATCH  /{slug}                  -> update_cabin (manager)
/// DELETE /{slug}                  -> delete_cabin (manager)
///
/// GET    /{slug}/availability     -> check_availability (public)
/// GET    /{slug}/booked-dates     -> booked_dates (public)
/// GET    /{slug}/calendar         -> month_calendar (public)
///
/// POST   /{slug}/bookings         -> create_booking (public, token optional)
/// GET    /{slug}/bookings         -> list_cabin_bookings (manager)
///
/// POST   /{slug}/blocks           -> manage_blocks (manager)
/// GET    /{slug}/blocks           -> list_blocks (manager)
/// PATCH  /{slug}/blocks/{id}      -> update_block (manager)
/// DELETE /{slug}/blocks/{id}      -> delete_block (manager)
///
/// POST   /{slug}/legend           -> apply_legend (manager)
/// GET    /{slug}/notes            -> list_notes (manager)
/// PUT    /{slug}/notes            -> put_notes (manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        // Cabin CRUD
        .route("/", get(cabin::list_cabins).post(cabin::create_cabin))
        .route(
            "/{slug}",
            get(cabin::get_cabin)
                .patch(cabin::update_cabin)
                .delete(cabin::delete_cabin),
        )
        // Public read endpoints
        .route("/{slug}/availability", get(calendar::check_availability))
        .route("/{slug}/booked-dates", get(calendar::booked_dates))
        .route("/{slug}/calendar", get(calendar::month_calendar))
        // Bookings scoped to the cabin
        .route(
            "/{slug}/bookings",
            post(booking::create_booking).get(booking::list_cabin_bookings),
        )
        // Blackout blocks
        .route(
            "/{slug}/blocks",
            post(block::manage_blocks).get(block::list_blocks),
        )
        .route(
            "/{slug}/blocks/{id}",
            delete(block::delete_block).patch(block::update_block),
        )
        // Legend application and day notes
        .route("/{slug}/legend", post(legend::apply_legend))
        .route(
            "/{slug}/notes",
            get(note::list_notes).put(note::put_notes),
        )
}
