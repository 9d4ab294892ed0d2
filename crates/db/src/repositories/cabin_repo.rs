//! Repository for the `cabins` table.

use sqlx::{FromRow, PgPool};

use hytte_core::types::DbId;

use crate::models::cabin::{Cabin, CabinFilter, CreateCabin, UpdateCabin};

/// Column list for cabins queries.
const COLUMNS: &str = "id, owner_id, owner_slug, company_slug, name, slug, address, \
    postal_code, city, phone, email, contact_person_name, image, color, \
    halfday_availability, affiliations, full_day_start_time, full_day_end_time, \
    am_start_time, am_end_time, pm_start_time, pm_end_time, created_at, updated_at";

/// Minimal projection used by the diacritic-folded slug fallback.
#[derive(Debug, Clone, FromRow)]
pub struct SlugRow {
    pub id: DbId,
    pub slug: String,
}

/// Provides CRUD operations for cabins.
pub struct CabinRepo;

impl CabinRepo {
    /// Insert a cabin with a pre-generated unique slug.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        owner_slug: Option<&str>,
        company_slug: Option<&str>,
        slug: &str,
        input: &CreateCabin,
    ) -> Result<Cabin, sqlx::Error> {
        let query = format!(
            "INSERT INTO cabins
                (owner_id, owner_slug, company_slug, name, slug, address, postal_code,
                 city, phone, email, contact_person_name, image, color,
                 halfday_availability, affiliations, full_day_start_time,
                 full_day_end_time, am_start_time, am_end_time, pm_start_time,
                 pm_end_time)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                     COALESCE($13, '#3B82F6'), $14, $15, $16, $17, $18, $19, $20, $21)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Cabin>(&query)
            .bind(owner_id)
            .bind(owner_slug)
            .bind(company_slug)
            .bind(input.name.trim())
            .bind(slug)
            .bind(input.address.trim())
            .bind(input.postal_code.trim())
            .bind(input.city.trim())
            .bind(&input.phone)
            .bind(input.email.as_deref().map(|e| e.to_lowercase()))
            .bind(&input.contact_person_name)
            .bind(&input.image)
            .bind(&input.color)
            .bind(input.halfday_availability)
            .bind(&input.affiliations)
            .bind(&input.full_day_start_time)
            .bind(&input.full_day_end_time)
            .bind(&input.am_start_time)
            .bind(&input.am_end_time)
            .bind(&input.pm_start_time)
            .bind(&input.pm_end_time)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Cabin>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cabins WHERE id = $1");
        sqlx::query_as::<_, Cabin>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Cabin>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cabins WHERE slug = $1");
        sqlx::query_as::<_, Cabin>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Whether a slug is taken, optionally ignoring one cabin (used when
    /// renaming regenerates the slug).
    pub async fn slug_exists(
        pool: &PgPool,
        slug: &str,
        excluding: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                SELECT 1 FROM cabins WHERE slug = $1 AND ($2::bigint IS NULL OR id <> $2)
             )",
        )
        .bind(slug)
        .bind(excluding)
        .fetch_one(pool)
        .await?;
        Ok(exists.0)
    }

    /// All slugs with their ids, for the folded-lookup fallback.
    pub async fn list_slug_index(pool: &PgPool) -> Result<Vec<SlugRow>, sqlx::Error> {
        sqlx::query_as::<_, SlugRow>("SELECT id, slug FROM cabins ORDER BY id")
            .fetch_all(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        filter: &CabinFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Cabin>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cabins
             WHERE ($1::text IS NULL OR lower(city) = lower($1))
               AND ($2::boolean IS NULL OR halfday_availability = $2)
               AND ($3::bigint IS NULL OR owner_id = $3)
             ORDER BY name ASC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Cabin>(&query)
            .bind(&filter.city)
            .bind(filter.halfday)
            .bind(filter.owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, filter: &CabinFilter) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM cabins
             WHERE ($1::text IS NULL OR lower(city) = lower($1))
               AND ($2::boolean IS NULL OR halfday_availability = $2)
               AND ($3::bigint IS NULL OR owner_id = $3)",
        )
        .bind(&filter.city)
        .bind(filter.halfday)
        .bind(filter.owner_id)
        .fetch_one(pool)
        .await?;
        Ok(count.0)
    }

    /// Patch a cabin. `new_slug` is set when a name change regenerated
    /// the slug.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCabin,
        new_slug: Option<&str>,
    ) -> Result<Option<Cabin>, sqlx::Error> {
        let query = format!(
            "UPDATE cabins SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                address = COALESCE($4, address),
                postal_code = COALESCE($5, postal_code),
                city = COALESCE($6, city),
                phone = COALESCE($7, phone),
                email = COALESCE($8, email),
                contact_person_name = COALESCE($9, contact_person_name),
                image = COALESCE($10, image),
                color = COALESCE($11, color),
                halfday_availability = COALESCE($12, halfday_availability),
                affiliations = COALESCE($13, affiliations),
                full_day_start_time = COALESCE($14, full_day_start_time),
                full_day_end_time = COALESCE($15, full_day_end_time),
                am_start_time = COALESCE($16, am_start_time),
                am_end_time = COALESCE($17, am_end_time),
                pm_start_time = COALESCE($18, pm_start_time),
                pm_end_time = COALESCE($19, pm_end_time),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Cabin>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(new_slug)
            .bind(input.address.as_deref().map(str::trim))
            .bind(input.postal_code.as_deref().map(str::trim))
            .bind(input.city.as_deref().map(str::trim))
            .bind(&input.phone)
            .bind(input.email.as_deref().map(|e| e.to_lowercase()))
            .bind(&input.contact_person_name)
            .bind(&input.image)
            .bind(&input.color)
            .bind(input.halfday_availability)
            .bind(&input.affiliations)
            .bind(&input.full_day_start_time)
            .bind(&input.full_day_end_time)
            .bind(&input.am_start_time)
            .bind(&input.am_end_time)
            .bind(&input.pm_start_time)
            .bind(&input.pm_end_time)
            .fetch_optional(pool)
            .await
    }

    /// Delete a cabin. Bookings, blocks, and notes cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cabins WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
