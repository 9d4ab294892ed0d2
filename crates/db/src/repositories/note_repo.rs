//! Repository for the `cabin_day_notes` table.

use chrono::NaiveDate;
use sqlx::PgPool;

use hytte_core::types::DbId;

use crate::models::note::DayNote;

/// Column list for cabin_day_notes queries.
const COLUMNS: &str = "id, cabin_id, date, note, legend_id, created_at, updated_at";

/// Provides upsert-style operations for day notes. The unique
/// `(cabin_id, date)` constraint makes every write an upsert.
pub struct NoteRepo;

impl NoteRepo {
    /// Set note text and legend for a date, replacing both.
    pub async fn upsert(
        pool: &PgPool,
        cabin_id: DbId,
        date: NaiveDate,
        note: Option<&str>,
        legend_id: Option<DbId>,
    ) -> Result<DayNote, sqlx::Error> {
        let query = format!(
            "INSERT INTO cabin_day_notes (cabin_id, date, note, legend_id)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT uq_cabin_day_notes_cabin_date
             DO UPDATE SET note = EXCLUDED.note, legend_id = EXCLUDED.legend_id,
                           updated_at = now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DayNote>(&query)
            .bind(cabin_id)
            .bind(date)
            .bind(note.map(str::trim))
            .bind(legend_id)
            .fetch_one(pool)
            .await
    }

    /// Assign a legend to a date, preserving any existing note text.
    pub async fn upsert_legend(
        pool: &PgPool,
        cabin_id: DbId,
        date: NaiveDate,
        legend_id: Option<DbId>,
    ) -> Result<DayNote, sqlx::Error> {
        let query = format!(
            "INSERT INTO cabin_day_notes (cabin_id, date, legend_id)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_cabin_day_notes_cabin_date
             DO UPDATE SET legend_id = EXCLUDED.legend_id, updated_at = now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DayNote>(&query)
            .bind(cabin_id)
            .bind(date)
            .bind(legend_id)
            .fetch_one(pool)
            .await
    }

    /// Remove the row for a date entirely (a blank note clears it).
    pub async fn delete(
        pool: &PgPool,
        cabin_id: DbId,
        date: NaiveDate,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cabin_day_notes WHERE cabin_id = $1 AND date = $2")
            .bind(cabin_id)
            .bind(date)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_for_range(
        pool: &PgPool,
        cabin_id: DbId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DayNote>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cabin_day_notes
             WHERE cabin_id = $1 AND date BETWEEN $2 AND $3
             ORDER BY date ASC"
        );
        sqlx::query_as::<_, DayNote>(&query)
            .bind(cabin_id)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    pub async fn list_for_cabin(
        pool: &PgPool,
        cabin_id: DbId,
    ) -> Result<Vec<DayNote>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cabin_day_notes
             WHERE cabin_id = $1
             ORDER BY date ASC"
        );
        sqlx::query_as::<_, DayNote>(&query)
            .bind(cabin_id)
            .fetch_all(pool)
            .await
    }
}
