//! Handlers for the `/legends` resource and the per-cabin legend
//! application endpoint.
//!
//! Legends are shared, named day categories. Default legends are
//! system-provided and cannot be deleted.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use hytte_core::error::CoreError;
use hytte_core::timewindow::{day_bounds, parse_date};
use hytte_core::types::DbId;
use hytte_db::models::block::CreateBlock;
use hytte_db::models::legend::{CreateLegend, Legend, UpdateLegend};
use hytte_db::repositories::{BlockRepo, LegendRepo, NoteRepo, UserRepo};

use crate::error::AppResult;
use crate::handlers::cabin::{load_cabin, require_manager};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Longest date span a single legend application may cover.
const MAX_APPLY_DAYS: usize = 366;

// ---------------------------------------------------------------------------
// Legend CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/legends
///
/// Active legends visible to the user: defaults plus their company's
/// own.
pub async fn list_legends(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Legend>>>> {
    let company_slug = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .and_then(|u| u.company_slug);
    let legends = LegendRepo::list_visible(&state.pool, company_slug.as_deref()).await?;
    Ok(Json(DataResponse { data: legends }))
}

/// POST /api/v1/legends
pub async fn create_legend(
    user: AuthUser,
    State(state): State<AppState>,
    Json(mut input): Json<CreateLegend>,
) -> AppResult<(StatusCode, Json<DataResponse<Legend>>)> {
    user.require_owner()?;
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Legend name must not be empty".into()).into());
    }
    if input.company_slug.is_none() {
        input.company_slug = UserRepo::find_by_id(&state.pool, user.user_id)
            .await?
            .and_then(|u| u.company_slug);
    }
    let legend = LegendRepo::create(&state.pool, Some(user.user_id), &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: legend })))
}

/// PATCH /api/v1/legends/{id}
pub async fn update_legend(
    user: AuthUser,
    State(state): State<AppState>,
    Path(legend_id): Path<DbId>,
    Json(input): Json<UpdateLegend>,
) -> AppResult<Json<DataResponse<Legend>>> {
    user.require_owner()?;
    let legend = LegendRepo::update(&state.pool, legend_id, &input)
        .await?
        .ok_or(CoreError::NotFound { entity: "Legend", id: legend_id })?;
    Ok(Json(DataResponse { data: legend }))
}

/// DELETE /api/v1/legends/{id}
///
/// Default legends are refused. Day notes referencing the deleted legend
/// keep their id and degrade to a stub at read time.
pub async fn delete_legend(
    user: AuthUser,
    State(state): State<AppState>,
    Path(legend_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    user.require_owner()?;
    let legend = LegendRepo::find_by_id(&state.pool, legend_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Legend", id: legend_id })?;
    if legend.is_default {
        return Err(CoreError::Forbidden("Default legends cannot be deleted".into()).into());
    }
    LegendRepo::delete(&state.pool, legend_id).await?;
    Ok(Json(serde_json::json!({ "data": { "deleted": true } })))
}

// ---------------------------------------------------------------------------
// Applying a legend to cabin dates
// ---------------------------------------------------------------------------

/// Payload for `POST /cabins/{slug}/legend`. Target days come as a
/// `dates` list or an inclusive `startDate`/`endDate` range. A null
/// `legendId` clears the assignment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyLegendRequest {
    pub legend_id: Option<DbId>,
    pub dates: Option<Vec<String>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn resolve_apply_dates(req: &ApplyLegendRequest) -> Result<Vec<NaiveDate>, CoreError> {
    if let Some(dates) = &req.dates {
        if dates.is_empty() {
            return Err(CoreError::Validation("dates must not be empty".into()));
        }
        if dates.len() > MAX_APPLY_DAYS {
            return Err(CoreError::Validation(format!(
                "at most {MAX_APPLY_DAYS} dates per request"
            )));
        }
        return dates.iter().map(|d| parse_date(d)).collect();
    }

    if req.start_date.is_some() || req.end_date.is_some() {
        let (Some(start), Some(end)) = (&req.start_date, &req.end_date) else {
            return Err(CoreError::Validation(
                "Both startDate and endDate are required".into(),
            ));
        };
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        if end < start {
            return Err(CoreError::Validation(
                "endDate must not be before startDate".into(),
            ));
        }
        let days = start.iter_days().take_while(|d| *d <= end);
        let dates: Vec<NaiveDate> = days.take(MAX_APPLY_DAYS + 1).collect();
        if dates.len() > MAX_APPLY_DAYS {
            return Err(CoreError::Validation(format!(
                "date range covers more than {MAX_APPLY_DAYS} days"
            )));
        }
        return Ok(dates);
    }

    Err(CoreError::Validation(
        "Request must include dates or a startDate/endDate range".into(),
    ))
}

/// Only active legends apply, and a company-scoped legend only applies
/// to cabins of the same company. Default legends (no company) apply
/// anywhere.
fn ensure_applicable(legend: &Legend, cabin_company: Option<&str>) -> Result<(), CoreError> {
    if !legend.is_active {
        return Err(CoreError::Validation(format!(
            "Legend '{}' is not active",
            legend.name
        )));
    }
    if let Some(company) = legend.company_slug.as_deref() {
        if cabin_company != Some(company) {
            return Err(CoreError::Forbidden(
                "Legend belongs to a different company".into(),
            ));
        }
    }
    Ok(())
}

/// POST /api/v1/cabins/{slug}/legend
///
/// Assign (or clear) a legend on each target day, upserting day notes.
/// A non-bookable legend additionally blocks the days.
pub async fn apply_legend(
    user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<ApplyLegendRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let cabin = load_cabin(&state.pool, &slug).await?;
    require_manager(&user, &cabin)?;
    let dates = resolve_apply_dates(&req)?;

    let legend = match req.legend_id {
        Some(id) => {
            let legend = LegendRepo::find_by_id(&state.pool, id)
                .await?
                .ok_or(CoreError::NotFound { entity: "Legend", id })?;
            ensure_applicable(&legend, cabin.company_slug.as_deref())?;
            Some(legend)
        }
        None => None,
    };

    for date in &dates {
        NoteRepo::upsert_legend(&state.pool, cabin.id, *date, req.legend_id).await?;
    }

    let mut blocked = 0usize;
    if let Some(legend) = &legend {
        if !legend.is_bookable {
            let mut tx = state.pool.begin().await?;
            hytte_db::lock_cabin(&mut tx, cabin.id).await?;
            for date in &dates {
                let window = day_bounds(*date);
                let input = CreateBlock {
                    cabin_id: cabin.id,
                    start_at: window.start,
                    end_at: window.end,
                    reason: Some(legend.name.clone()),
                    created_by: Some(user.user_id),
                };
                BlockRepo::create(&mut *tx, &input).await?;
                blocked += 1;
            }
            tx.commit().await?;
        }
    }

    tracing::info!(
        cabin_id = cabin.id,
        applied = dates.len(),
        blocked,
        "Legend applied to dates"
    );
    Ok(Json(serde_json::json!({
        "data": {
            "applied": dates.len(),
            "blocked": blocked,
            "legendId": req.legend_id,
        }
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use hytte_core::timewindow::parse_utc;

    fn legend(name: &str) -> Legend {
        let now = parse_utc("2025-07-01T00:00:00Z").unwrap();
        Legend {
            id: 1,
            name: name.into(),
            color: "#cc0000".into(),
            bg_color: "bg-red-100".into(),
            border_color: "border-red-200".into(),
            text_color: "text-red-800".into(),
            description: String::new(),
            is_active: true,
            is_default: false,
            is_bookable: true,
            company_slug: None,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn empty_request() -> ApplyLegendRequest {
        ApplyLegendRequest {
            legend_id: None,
            dates: None,
            start_date: None,
            end_date: None,
        }
    }

    #[test]
    fn date_list_parses_each_entry() {
        let mut req = empty_request();
        req.dates = Some(vec!["2025-08-01".into(), "2025-08-03".into()]);
        let dates = resolve_apply_dates(&req).unwrap();
        assert_eq!(dates.len(), 2);
        assert_eq!(dates[1].to_string(), "2025-08-03");
    }

    #[test]
    fn range_expands_inclusively() {
        let mut req = empty_request();
        req.start_date = Some("2025-08-01".into());
        req.end_date = Some("2025-08-03".into());
        let dates = resolve_apply_dates(&req).unwrap();
        assert_eq!(dates.len(), 3);

        // Single-day range is fine.
        req.end_date = Some("2025-08-01".into());
        assert_eq!(resolve_apply_dates(&req).unwrap().len(), 1);
    }

    #[test]
    fn invalid_targets_are_rejected() {
        assert_matches!(
            resolve_apply_dates(&empty_request()),
            Err(CoreError::Validation(_))
        );

        let mut req = empty_request();
        req.dates = Some(Vec::new());
        assert_matches!(resolve_apply_dates(&req), Err(CoreError::Validation(_)));

        let mut req = empty_request();
        req.start_date = Some("2025-08-05".into());
        req.end_date = Some("2025-08-01".into());
        assert_matches!(resolve_apply_dates(&req), Err(CoreError::Validation(_)));

        let mut req = empty_request();
        req.start_date = Some("2024-01-01".into());
        req.end_date = Some("2026-01-01".into());
        assert_matches!(resolve_apply_dates(&req), Err(CoreError::Validation(_)));
    }

    #[test]
    fn inactive_legend_cannot_be_applied() {
        let mut l = legend("Vedlikehold");
        l.is_active = false;
        assert_matches!(
            ensure_applicable(&l, Some("acme")),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn company_legend_is_scoped_to_its_company() {
        let mut l = legend("Medlemshelg");
        l.company_slug = Some("acme".into());
        assert!(ensure_applicable(&l, Some("acme")).is_ok());
        assert_matches!(
            ensure_applicable(&l, Some("other")),
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(ensure_applicable(&l, None), Err(CoreError::Forbidden(_)));

        // Default legends (no company) apply to any cabin.
        assert!(ensure_applicable(&legend("Dugnad"), Some("other")).is_ok());
        assert!(ensure_applicable(&legend("Dugnad"), None).is_ok());
    }
}
