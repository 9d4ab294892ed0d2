//! Repository for the `unavailability_blocks` table.

use sqlx::{PgExecutor, PgPool};

use hytte_core::types::{DbId, Timestamp};

use crate::models::block::{Block, CreateBlock};

/// Column list for unavailability_blocks queries.
const COLUMNS: &str =
    "id, cabin_id, start_at, end_at, reason, created_by, created_at, updated_at";

/// Provides CRUD operations for unavailability blocks.
pub struct BlockRepo;

impl BlockRepo {
    /// Insert a block. Runs inside the advisory-locked transaction when
    /// called from the block manager.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateBlock,
    ) -> Result<Block, sqlx::Error> {
        let query = format!(
            "INSERT INTO unavailability_blocks
                (cabin_id, start_at, end_at, reason, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Block>(&query)
            .bind(input.cabin_id)
            .bind(input.start_at)
            .bind(input.end_at)
            .bind(input.reason.as_deref().map(str::trim))
            .bind(input.created_by)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Block>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM unavailability_blocks WHERE id = $1");
        sqlx::query_as::<_, Block>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The whole per-cabin block set; overlap filtering happens in
    /// memory at the caller.
    pub async fn list_for_cabin<'e>(
        executor: impl PgExecutor<'e>,
        cabin_id: DbId,
    ) -> Result<Vec<Block>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM unavailability_blocks
             WHERE cabin_id = $1
             ORDER BY start_at ASC"
        );
        sqlx::query_as::<_, Block>(&query)
            .bind(cabin_id)
            .fetch_all(executor)
            .await
    }

    /// Patch a block. Runs inside the locked transaction when the dates
    /// changed, since the caller re-checks booking overlap first.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        start_at: Timestamp,
        end_at: Timestamp,
        reason: Option<&str>,
    ) -> Result<Option<Block>, sqlx::Error> {
        let query = format!(
            "UPDATE unavailability_blocks
             SET start_at = $2, end_at = $3, reason = $4, updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Block>(&query)
            .bind(id)
            .bind(start_at)
            .bind(end_at)
            .bind(reason.map(str::trim))
            .fetch_optional(executor)
            .await
    }

    /// Delete a set of blocks, returning the removed rows.
    pub async fn delete_many<'e>(
        executor: impl PgExecutor<'e>,
        ids: &[DbId],
    ) -> Result<Vec<Block>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "DELETE FROM unavailability_blocks
             WHERE id = ANY($1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Block>(&query)
            .bind(ids)
            .fetch_all(executor)
            .await
    }
}
