//! Handlers for the `/cabins` resource.
//!
//! Cabin reads are public; writes require the owner (or an admin).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use sqlx::PgPool;

use hytte_core::error::CoreError;
use hytte_core::pagination::PageParams;
use hytte_core::slug::{slugify, with_suffix};
use hytte_core::timewindow::now_utc;
use hytte_core::types::DbId;
use hytte_db::models::cabin::{Cabin, CabinFilter, CreateCabin, UpdateCabin};
use hytte_db::repositories::{BookingRepo, CabinRepo, UserRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Shared helpers (used by booking/block/calendar handlers too)
// ---------------------------------------------------------------------------

/// Look a cabin up by slug, falling back to the diacritic-folded form:
/// a request for `hytte-øst` finds the cabin stored as `hytte-ost`.
pub(crate) async fn load_cabin(pool: &PgPool, slug: &str) -> AppResult<Cabin> {
    if let Some(cabin) = CabinRepo::find_by_slug(pool, slug).await? {
        return Ok(cabin);
    }

    let folded = slugify(slug);
    if folded != slug && !folded.is_empty() {
        if let Some(cabin) = CabinRepo::find_by_slug(pool, &folded).await? {
            return Ok(cabin);
        }
    }
    if !folded.is_empty() {
        // Stored slugs may predate the folding rules; compare both sides
        // folded.
        for row in CabinRepo::list_slug_index(pool).await? {
            if slugify(&row.slug) == folded {
                if let Some(cabin) = CabinRepo::find_by_id(pool, row.id).await? {
                    return Ok(cabin);
                }
            }
        }
    }

    Err(CoreError::NotFoundKey { entity: "Cabin", key: slug.to_string() }.into())
}

/// 403 unless the user owns the cabin or is an admin.
pub(crate) fn require_manager(user: &AuthUser, cabin: &Cabin) -> AppResult<()> {
    if user.is_admin() || cabin.owner_id == user.user_id {
        Ok(())
    } else {
        Err(CoreError::Forbidden("You do not manage this cabin".into()).into())
    }
}

/// Slug from the cabin name, `-N`-suffixed until unique.
async fn unique_cabin_slug(
    pool: &PgPool,
    name: &str,
    excluding: Option<DbId>,
) -> AppResult<String> {
    let base = slugify(name);
    if base.is_empty() {
        return Err(
            CoreError::Validation("Cabin name must contain letters or digits".into()).into(),
        );
    }
    let mut candidate = base.clone();
    let mut n = 2;
    while CabinRepo::slug_exists(pool, &candidate, excluding).await? {
        candidate = with_suffix(&base, n);
        n += 1;
    }
    Ok(candidate)
}

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /cabins`.
#[derive(Debug, Deserialize)]
pub struct CabinListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub city: Option<String>,
    pub halfday: Option<bool>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/cabins
///
/// Public paginated listing with optional city / half-day filters.
pub async fn list_cabins(
    State(state): State<AppState>,
    Query(params): Query<CabinListQuery>,
) -> AppResult<Json<PageResponse<Cabin>>> {
    let page = PageParams { page: params.page, limit: params.limit };
    let filter = CabinFilter {
        city: params.city,
        halfday: params.halfday,
        owner_id: None,
    };
    let cabins = CabinRepo::list(&state.pool, &filter, page.limit(), page.offset()).await?;
    let total = CabinRepo::count(&state.pool, &filter).await?;
    Ok(Json(PageResponse::new(cabins, &page, total)))
}

/// POST /api/v1/cabins
///
/// Create a cabin owned by the authenticated user. The slug is generated
/// server-side from the name.
pub async fn create_cabin(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCabin>,
) -> AppResult<(StatusCode, Json<DataResponse<Cabin>>)> {
    user.require_owner()?;

    let owner = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "User", id: user.user_id })?;

    let slug = unique_cabin_slug(&state.pool, &input.name, None).await?;
    let cabin = CabinRepo::create(
        &state.pool,
        owner.id,
        owner.slug.as_deref(),
        owner.company_slug.as_deref(),
        &slug,
        &input,
    )
    .await?;

    tracing::info!(cabin_id = cabin.id, slug = %cabin.slug, "Cabin created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: cabin })))
}

/// GET /api/v1/cabins/{slug}
pub async fn get_cabin(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Cabin>>> {
    let cabin = load_cabin(&state.pool, &slug).await?;
    Ok(Json(DataResponse { data: cabin }))
}

/// PATCH /api/v1/cabins/{slug}
///
/// Patch any subset of cabin fields. A name change regenerates the slug.
pub async fn update_cabin(
    user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<UpdateCabin>,
) -> AppResult<Json<DataResponse<Cabin>>> {
    let cabin = load_cabin(&state.pool, &slug).await?;
    require_manager(&user, &cabin)?;

    let new_slug = match &input.name {
        Some(name) if name.trim() != cabin.name => {
            Some(unique_cabin_slug(&state.pool, name, Some(cabin.id)).await?)
        }
        _ => None,
    };

    let updated = CabinRepo::update(&state.pool, cabin.id, &input, new_slug.as_deref())
        .await?
        .ok_or(CoreError::NotFound { entity: "Cabin", id: cabin.id })?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/cabins/{slug}
///
/// Refused with 409 while the cabin has active bookings that have not
/// ended yet. Blocks and notes cascade with the row.
pub async fn delete_cabin(
    user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let cabin = load_cabin(&state.pool, &slug).await?;
    require_manager(&user, &cabin)?;

    let today = now_utc().date_naive();
    let active = BookingRepo::count_active_future_for_cabin(&state.pool, cabin.id, today).await?;
    if active > 0 {
        return Err(CoreError::Conflict(format!(
            "Cabin has {active} active booking(s) and cannot be deleted"
        ))
        .into());
    }

    CabinRepo::delete(&state.pool, cabin.id).await?;
    tracing::info!(cabin_id = cabin.id, slug = %cabin.slug, "Cabin deleted");
    Ok(Json(serde_json::json!({ "data": { "deleted": true } })))
}
