//! Blackout block management.
//!
//! A single `block_dates` operation covers both directions: `block`
//! creates unavailability blocks for the target intervals, `unblock`
//! removes every block overlapping them. Targets come in three shapes: a
//! `dates` list (each entry a plain date or `{date, half}`), a single
//! `date` + `half`, or a date range with halves. Blocks always use the
//! fixed half-day boundaries -- cabin check-in hours only shape guest
//! bookings.
//!
//! Creation conflict-checks every interval against active bookings
//! inside the advisory-locked transaction that also inserts, so the
//! whole request is all-or-nothing. Blocks never conflict with other
//! blocks; stacking is allowed and `unblock` is idempotent.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use hytte_core::error::CoreError;
use hytte_core::timewindow::{
    parse_date, resolve_date_range, resolve_single_day, CabinHours, HalfDay, TimeWindow,
};
use hytte_core::types::{DbId, Timestamp};
use hytte_db::models::block::{Block, CreateBlock, UpdateBlock};
use hytte_db::models::cabin::Cabin;
use hytte_db::repositories::BlockRepo;

use crate::error::AppResult;
use crate::scheduling::availability::CabinActivity;

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockAction {
    Block,
    Unblock,
}

/// One entry of the `dates` list: either a bare date string or a date
/// with a half-day marker.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DateTarget {
    Plain(String),
    WithHalf { date: String, half: HalfDay },
}

/// Payload for `POST /cabins/{slug}/blocks`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRequest {
    pub action: BlockAction,
    pub reason: Option<String>,
    // Single date
    pub date: Option<String>,
    pub half: Option<HalfDay>,
    // Date range
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub start_half: Option<HalfDay>,
    pub end_half: Option<HalfDay>,
    // Date list
    pub dates: Option<Vec<DateTarget>>,
}

/// What a block operation did, echoed back to the caller.
#[derive(Debug, Serialize)]
pub struct BlockOutcome {
    pub message: String,
    pub blocks: Vec<Block>,
}

// ---------------------------------------------------------------------------
// Target resolution
// ---------------------------------------------------------------------------

// Blocks ignore cabin hours; the fixed AM/PM/FULL boundaries apply.
// `halfday` stays on so range resolution never reaches for full-day
// hours either.
const FIXED_HOURS: CabinHours = CabinHours {
    halfday: true,
    full_start: None,
    full_end: None,
    am_start: None,
    am_end: None,
    pm_start: None,
    pm_end: None,
};

fn single_day_window(date: &str, half: Option<HalfDay>) -> Result<TimeWindow, CoreError> {
    let date = parse_date(date)?;
    resolve_single_day(date, half.unwrap_or(HalfDay::Full), None, None, &FIXED_HOURS)
}

/// Resolve the request's target intervals. Exactly one target shape must
/// be present.
pub fn resolve_targets(req: &BlockRequest) -> Result<Vec<TimeWindow>, CoreError> {
    if let Some(dates) = &req.dates {
        if dates.is_empty() {
            return Err(CoreError::Validation("dates must not be empty".into()));
        }
        return dates
            .iter()
            .map(|t| match t {
                DateTarget::Plain(date) => single_day_window(date, None),
                DateTarget::WithHalf { date, half } => single_day_window(date, Some(*half)),
            })
            .collect();
    }

    if let Some(date) = &req.date {
        return Ok(vec![single_day_window(date, req.half)?]);
    }

    if req.start_date.is_some() || req.end_date.is_some() {
        let (Some(start), Some(end)) = (&req.start_date, &req.end_date) else {
            return Err(CoreError::Validation(
                "Both startDate and endDate are required".into(),
            ));
        };
        let start_date = parse_date(start)?;
        let end_date = parse_date(end)?;
        if end_date < start_date {
            return Err(CoreError::Validation(
                "endDate must not be before startDate".into(),
            ));
        }
        let window = resolve_date_range(
            start_date,
            end_date,
            req.start_half.unwrap_or(HalfDay::Am),
            req.end_half.unwrap_or(HalfDay::Pm),
            &FIXED_HOURS,
        )?;
        return Ok(vec![window]);
    }

    Err(CoreError::Validation(
        "Request must include dates, a date, or a date range".into(),
    ))
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Apply a block/unblock request against a cabin.
pub async fn block_dates(
    pool: &PgPool,
    cabin: &Cabin,
    user_id: DbId,
    req: BlockRequest,
) -> AppResult<BlockOutcome> {
    let targets = resolve_targets(&req)?;

    let mut tx = pool.begin().await?;
    let activity = CabinActivity::load_locked(&mut tx, cabin.id).await?;

    match req.action {
        BlockAction::Block => {
            for window in &targets {
                activity.ensure_no_booking(window)?;
            }
            let mut created = Vec::with_capacity(targets.len());
            for window in &targets {
                let input = CreateBlock {
                    cabin_id: cabin.id,
                    start_at: window.start,
                    end_at: window.end,
                    reason: req.reason.clone(),
                    created_by: Some(user_id),
                };
                created.push(BlockRepo::create(&mut *tx, &input).await?);
            }
            tx.commit().await?;
            tracing::info!(cabin_id = cabin.id, count = created.len(), "Blocks created");
            Ok(BlockOutcome {
                message: format!("Created {} block(s)", created.len()),
                blocks: created,
            })
        }
        BlockAction::Unblock => {
            let ids = activity.blocks_overlapping(&targets);
            let removed = BlockRepo::delete_many(&mut *tx, &ids).await?;
            tx.commit().await?;
            tracing::info!(cabin_id = cabin.id, count = removed.len(), "Blocks removed");
            Ok(BlockOutcome {
                message: format!("Removed {} block(s)", removed.len()),
                blocks: removed,
            })
        }
    }
}

/// Load a block scoped to a cabin; a block belonging to another cabin is
/// not found.
pub async fn find_for_cabin(pool: &PgPool, cabin: &Cabin, block_id: DbId) -> AppResult<Block> {
    let block = BlockRepo::find_by_id(pool, block_id)
        .await?
        .filter(|b| b.cabin_id == cabin.id)
        .ok_or(CoreError::NotFound { entity: "Block", id: block_id })?;
    Ok(block)
}

/// Edit a block's window or reason. A changed window is re-checked
/// against active bookings under the cabin lock.
pub async fn update_block(
    pool: &PgPool,
    cabin: &Cabin,
    block_id: DbId,
    upd: UpdateBlock,
) -> AppResult<Block> {
    let existing = find_for_cabin(pool, cabin, block_id).await?;

    let start_at: Timestamp = upd.start_at.unwrap_or(existing.start_at);
    let end_at: Timestamp = upd.end_at.unwrap_or(existing.end_at);
    if end_at <= start_at {
        return Err(CoreError::Validation("end must be after start".into()).into());
    }
    let reason = upd.reason.or(existing.reason);
    let window_changed = start_at != existing.start_at || end_at != existing.end_at;

    let mut tx = pool.begin().await?;
    if window_changed {
        let activity = CabinActivity::load_locked(&mut tx, cabin.id).await?;
        activity.ensure_no_booking(&TimeWindow::new(start_at, end_at))?;
    }
    let updated = BlockRepo::update(&mut *tx, block_id, start_at, end_at, reason.as_deref())
        .await?
        .ok_or(CoreError::NotFound { entity: "Block", id: block_id })?;
    tx.commit().await?;
    Ok(updated)
}

/// Delete one block, returning the removed row.
pub async fn delete_block(pool: &PgPool, cabin: &Cabin, block_id: DbId) -> AppResult<Block> {
    let block = find_for_cabin(pool, cabin, block_id).await?;
    let removed = BlockRepo::delete_many(pool, &[block.id]).await?;
    removed
        .into_iter()
        .next()
        .ok_or_else(|| CoreError::NotFound { entity: "Block", id: block_id }.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use hytte_core::timewindow::parse_utc;

    fn base_request(action: BlockAction) -> BlockRequest {
        BlockRequest {
            action,
            reason: None,
            date: None,
            half: None,
            start_date: None,
            end_date: None,
            start_half: None,
            end_half: None,
            dates: None,
        }
    }

    #[test]
    fn plain_date_list_blocks_full_days() {
        let mut req = base_request(BlockAction::Block);
        req.dates = Some(vec![
            DateTarget::Plain("2025-08-01".into()),
            DateTarget::WithHalf {
                date: "2025-08-02".into(),
                half: HalfDay::Am,
            },
        ]);
        let targets = resolve_targets(&req).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].start, parse_utc("2025-08-01T00:00:00Z").unwrap());
        assert_eq!(
            targets[0].end,
            parse_utc("2025-08-01T23:59:59.999Z").unwrap()
        );
        assert_eq!(
            targets[1].end,
            parse_utc("2025-08-02T11:59:59.999Z").unwrap()
        );
    }

    #[test]
    fn single_date_with_half_resolves_to_that_half() {
        let mut req = base_request(BlockAction::Block);
        req.date = Some("2025-08-05".into());
        req.half = Some(HalfDay::Pm);
        let targets = resolve_targets(&req).unwrap();
        assert_eq!(targets[0].start, parse_utc("2025-08-05T12:00:00Z").unwrap());
    }

    #[test]
    fn range_uses_fixed_boundaries() {
        let mut req = base_request(BlockAction::Unblock);
        req.start_date = Some("2025-08-01".into());
        req.end_date = Some("2025-08-03".into());
        req.end_half = Some(HalfDay::Am);
        let targets = resolve_targets(&req).unwrap();
        // AM end closes at noon sharp.
        assert_eq!(targets[0].end, parse_utc("2025-08-03T12:00:00Z").unwrap());
    }

    #[test]
    fn same_day_range_is_allowed() {
        let mut req = base_request(BlockAction::Block);
        req.start_date = Some("2025-08-01".into());
        req.end_date = Some("2025-08-01".into());
        let targets = resolve_targets(&req).unwrap();
        assert_eq!(targets[0].start, parse_utc("2025-08-01T00:00:00Z").unwrap());
        assert_eq!(
            targets[0].end,
            parse_utc("2025-08-01T23:59:59.999Z").unwrap()
        );
    }

    #[test]
    fn missing_and_malformed_targets_are_rejected() {
        assert_matches!(
            resolve_targets(&base_request(BlockAction::Block)),
            Err(CoreError::Validation(_))
        );

        let mut req = base_request(BlockAction::Block);
        req.dates = Some(Vec::new());
        assert_matches!(resolve_targets(&req), Err(CoreError::Validation(_)));

        let mut req = base_request(BlockAction::Block);
        req.start_date = Some("2025-08-05".into());
        assert_matches!(resolve_targets(&req), Err(CoreError::Validation(_)));

        let mut req = base_request(BlockAction::Block);
        req.start_date = Some("2025-08-05".into());
        req.end_date = Some("2025-08-01".into());
        assert_matches!(resolve_targets(&req), Err(CoreError::Validation(_)));
    }

    #[test]
    fn action_deserializes_lowercase() {
        let req: BlockRequest =
            serde_json::from_str(r#"{"action":"unblock","dates":["2025-08-01"]}"#).unwrap();
        assert_eq!(req.action, BlockAction::Unblock);
        assert!(matches!(
            req.dates.as_deref(),
            Some([DateTarget::Plain(_)])
        ));
    }
}
