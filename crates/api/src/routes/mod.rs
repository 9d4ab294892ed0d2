pub mod auth;
pub mod booking;
pub mod cabin;
pub mod health;
pub mod legend;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                         register (public)
/// /auth/login                            login (public)
///
/// /cabins                                list, create
/// /cabins/{slug}                         get, update, delete
/// /cabins/{slug}/availability            availability probe (GET)
/// /cabins/{slug}/booked-dates            occupied windows (GET)
/// /cabins/{slug}/calendar                month view (GET, ?year&month)
/// /cabins/{slug}/bookings                create (POST, token optional), list (GET, manager)
/// /cabins/{slug}/blocks                  block/unblock dates (POST), list (GET)
/// /cabins/{slug}/blocks/{id}             update, delete (PATCH, DELETE)
/// /cabins/{slug}/legend                  apply legend to dates (POST)
/// /cabins/{slug}/notes                   list, batch upsert (GET, PUT)
///
/// /bookings/mine                         own bookings (GET)
/// /bookings/owner                        bookings across owned cabins (GET)
/// /bookings/pending                      owner decision inbox (GET)
/// /bookings/{id}                         get booking (GET)
/// /bookings/{id}/cancel                  guest cancel (POST)
/// /bookings/{id}/owner-cancel            owner cancel (POST)
/// /bookings/{id}/approve                 approve (POST, ?sendEmail body flag)
/// /bookings/{id}/reject                  reject (POST, ?sendEmail body flag)
///
/// /legends                               list, create (GET, POST)
/// /legends/{id}                          update, delete (PATCH, DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (register, login).
        .nest("/auth", auth::router())
        // Cabin CRUD plus nested bookings, blocks, calendar, notes.
        .nest("/cabins", cabin::router())
        // Booking listings and status transitions.
        .nest("/bookings", booking::router())
        // Shared day legends.
        .nest("/legends", legend::router())
}
