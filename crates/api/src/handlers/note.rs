//! Handlers for per-cabin day notes.
//!
//! Notes are manager-only annotations keyed by `(cabin, date)`. Writes
//! are batched: one PUT carries any number of entries, and an entry with
//! neither text nor legend clears the date.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use hytte_core::calendar::{days_in_month, LegendRef};
use hytte_core::error::CoreError;
use hytte_core::timewindow::parse_date;
use hytte_core::types::DbId;
use hytte_db::models::note::DayNote;
use hytte_db::repositories::{LegendRepo, NoteRepo};

use crate::error::AppResult;
use crate::handlers::cabin::{load_cabin, require_manager};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::scheduling::calendar::legend_ref;
use crate::state::AppState;

/// Query parameters for the note listing; pass both `year` and `month`
/// to narrow to one month, otherwise all notes come back.
#[derive(Debug, Deserialize)]
pub struct NoteListQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// A day note with its legend resolved for display.
#[derive(Debug, Serialize)]
pub struct NoteView {
    #[serde(flatten)]
    pub note: DayNote,
    pub legend: Option<LegendRef>,
}

/// One entry of a batch note write.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteEntry {
    pub date: String,
    pub note: Option<String>,
    pub legend_id: Option<DbId>,
}

/// Body of `PUT /cabins/{slug}/notes`.
#[derive(Debug, Deserialize)]
pub struct NotesRequest {
    pub notes: Vec<NoteEntry>,
}

async fn resolve_views(state: &AppState, notes: Vec<DayNote>) -> AppResult<Vec<NoteView>> {
    let mut legend_ids: Vec<DbId> = notes.iter().filter_map(|n| n.legend_id).collect();
    legend_ids.sort_unstable();
    legend_ids.dedup();
    let legends = LegendRepo::find_by_ids(&state.pool, &legend_ids).await?;

    Ok(notes
        .into_iter()
        .map(|note| {
            let legend = note.legend_id.map(|id| {
                legends
                    .iter()
                    .find(|l| l.id == id)
                    .map(legend_ref)
                    .unwrap_or_else(|| LegendRef::dangling(id))
            });
            NoteView { note, legend }
        })
        .collect())
}

/// GET /api/v1/cabins/{slug}/notes
pub async fn list_notes(
    user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<NoteListQuery>,
) -> AppResult<Json<DataResponse<Vec<NoteView>>>> {
    let cabin = load_cabin(&state.pool, &slug).await?;
    require_manager(&user, &cabin)?;

    let notes = match (query.year, query.month) {
        (Some(year), Some(month)) => {
            let last_day = days_in_month(year, month)?;
            let first = chrono::NaiveDate::from_ymd_opt(year, month, 1)
                .ok_or_else(|| CoreError::Validation(format!("invalid month: {year}-{month}")))?;
            let last = chrono::NaiveDate::from_ymd_opt(year, month, last_day)
                .ok_or_else(|| CoreError::Validation(format!("invalid month: {year}-{month}")))?;
            NoteRepo::list_for_range(&state.pool, cabin.id, first, last).await?
        }
        (None, None) => NoteRepo::list_for_cabin(&state.pool, cabin.id).await?,
        _ => {
            return Err(CoreError::Validation(
                "year and month must be provided together".into(),
            )
            .into())
        }
    };

    let views = resolve_views(&state, notes).await?;
    Ok(Json(DataResponse { data: views }))
}

/// PUT /api/v1/cabins/{slug}/notes
///
/// Upsert each entry; entries with blank text and no legend delete the
/// row for that date. Returns the surviving rows.
pub async fn put_notes(
    user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<NotesRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let cabin = load_cabin(&state.pool, &slug).await?;
    require_manager(&user, &cabin)?;

    let mut saved = Vec::new();
    let mut cleared = 0usize;
    for entry in &req.notes {
        let date = parse_date(&entry.date)?;
        let text = entry
            .note
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        if text.is_none() && entry.legend_id.is_none() {
            if NoteRepo::delete(&state.pool, cabin.id, date).await? {
                cleared += 1;
            }
        } else {
            let note =
                NoteRepo::upsert(&state.pool, cabin.id, date, text, entry.legend_id).await?;
            saved.push(note);
        }
    }

    let views = resolve_views(&state, saved).await?;
    Ok(Json(serde_json::json!({
        "data": { "saved": views, "cleared": cleared }
    })))
}
