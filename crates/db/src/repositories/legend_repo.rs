//! Repository for the `legends` table.

use sqlx::PgPool;

use hytte_core::types::DbId;

use crate::models::legend::{CreateLegend, Legend, UpdateLegend};

/// Column list for legends queries.
const COLUMNS: &str = "id, name, color, bg_color, border_color, text_color, description, \
    is_active, is_default, is_bookable, company_slug, created_by, created_at, updated_at";

/// Provides CRUD operations for legends.
pub struct LegendRepo;

impl LegendRepo {
    pub async fn create(
        pool: &PgPool,
        created_by: Option<DbId>,
        input: &CreateLegend,
    ) -> Result<Legend, sqlx::Error> {
        let query = format!(
            "INSERT INTO legends
                (name, color, bg_color, border_color, text_color, description,
                 is_active, is_default, is_bookable, company_slug, created_by)
             VALUES ($1, $2,
                     COALESCE($3, 'bg-gray-100'),
                     COALESCE($4, 'border-gray-200'),
                     COALESCE($5, 'text-gray-800'),
                     COALESCE($6, ''),
                     COALESCE($7, TRUE),
                     COALESCE($8, FALSE),
                     COALESCE($9, TRUE),
                     $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Legend>(&query)
            .bind(input.name.trim())
            .bind(input.color.to_lowercase())
            .bind(&input.bg_color)
            .bind(&input.border_color)
            .bind(&input.text_color)
            .bind(&input.description)
            .bind(input.is_active)
            .bind(input.is_default)
            .bind(input.is_bookable)
            .bind(&input.company_slug)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Legend>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM legends WHERE id = $1");
        sqlx::query_as::<_, Legend>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a batch of legend ids in one round trip (calendar and
    /// note listings).
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Legend>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM legends WHERE id = ANY($1)");
        sqlx::query_as::<_, Legend>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Active legends visible to a company: defaults plus the company's
    /// own. Without a company, just the active set.
    pub async fn list_visible(
        pool: &PgPool,
        company_slug: Option<&str>,
    ) -> Result<Vec<Legend>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM legends
             WHERE is_active = TRUE
               AND (is_default = TRUE OR $1::text IS NULL OR company_slug = $1)
             ORDER BY is_default DESC, name ASC"
        );
        sqlx::query_as::<_, Legend>(&query)
            .bind(company_slug)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLegend,
    ) -> Result<Option<Legend>, sqlx::Error> {
        let query = format!(
            "UPDATE legends SET
                name = COALESCE($2, name),
                color = COALESCE($3, color),
                bg_color = COALESCE($4, bg_color),
                border_color = COALESCE($5, border_color),
                text_color = COALESCE($6, text_color),
                description = COALESCE($7, description),
                is_active = COALESCE($8, is_active),
                is_default = COALESCE($9, is_default),
                is_bookable = COALESCE($10, is_bookable),
                company_slug = COALESCE($11, company_slug),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Legend>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.color.as_deref().map(|c| c.to_lowercase()))
            .bind(&input.bg_color)
            .bind(&input.border_color)
            .bind(&input.text_color)
            .bind(&input.description)
            .bind(input.is_active)
            .bind(input.is_default)
            .bind(input.is_bookable)
            .bind(&input.company_slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM legends WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
