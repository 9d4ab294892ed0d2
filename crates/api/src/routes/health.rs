//! Liveness endpoint, mounted at the root rather than under `/api/v1`
//! so load balancers can probe it without the API prefix.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

/// GET /health
///
/// Always answers 200; a failing database ping downgrades `status` to
/// `degraded` instead of failing the probe.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = hytte_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
