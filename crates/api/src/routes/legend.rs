//! Route definitions for the `/legends` resource.
//!
//! All endpoints require authentication; writes require an owner.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::legend;
use crate::state::AppState;

/// Routes mounted at `/legends`.
///
/// ```text
/// GET    /        -> list_legends
/// POST   /        -> create_legend (owner)
/// PATCH  /{id}    -> update_legend (owner)
/// DELETE /{id}    -> delete_legend (owner)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(legend::list_legends).post(legend::create_legend))
        .route(
            "/{id}",
            patch(legend::update_legend).delete(legend::delete_legend),
        )
}
