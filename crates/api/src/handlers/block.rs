//! Handlers for `/cabins/{slug}/blocks`: owner-managed blackout blocks.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use hytte_core::types::DbId;
use hytte_db::models::block::{Block, UpdateBlock};
use hytte_db::repositories::BlockRepo;

use crate::error::AppResult;
use crate::handlers::cabin::{load_cabin, require_manager};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::scheduling::blocks::{self, BlockOutcome, BlockRequest};
use crate::state::AppState;

/// POST /api/v1/cabins/{slug}/blocks
///
/// Block or unblock the target dates, depending on `action`.
pub async fn manage_blocks(
    user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<BlockRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<BlockOutcome>>)> {
    let cabin = load_cabin(&state.pool, &slug).await?;
    require_manager(&user, &cabin)?;
    let outcome = blocks::block_dates(&state.pool, &cabin, user.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome })))
}

/// GET /api/v1/cabins/{slug}/blocks
pub async fn list_blocks(
    user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Block>>>> {
    let cabin = load_cabin(&state.pool, &slug).await?;
    require_manager(&user, &cabin)?;
    let blocks = BlockRepo::list_for_cabin(&state.pool, cabin.id).await?;
    Ok(Json(DataResponse { data: blocks }))
}

/// PATCH /api/v1/cabins/{slug}/blocks/{id}
pub async fn update_block(
    user: AuthUser,
    State(state): State<AppState>,
    Path((slug, block_id)): Path<(String, DbId)>,
    Json(upd): Json<UpdateBlock>,
) -> AppResult<Json<DataResponse<Block>>> {
    let cabin = load_cabin(&state.pool, &slug).await?;
    require_manager(&user, &cabin)?;
    let block = blocks::update_block(&state.pool, &cabin, block_id, upd).await?;
    Ok(Json(DataResponse { data: block }))
}

/// DELETE /api/v1/cabins/{slug}/blocks/{id}
pub async fn delete_block(
    user: AuthUser,
    State(state): State<AppState>,
    Path((slug, block_id)): Path<(String, DbId)>,
) -> AppResult<Json<DataResponse<Block>>> {
    let cabin = load_cabin(&state.pool, &slug).await?;
    require_manager(&user, &cabin)?;
    let removed = blocks::delete_block(&state.pool, &cabin, block_id).await?;
    Ok(Json(DataResponse { data: removed }))
}
