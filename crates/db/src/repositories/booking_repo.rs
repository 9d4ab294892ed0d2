//! Repository for the `bookings` table.

use chrono::NaiveDate;
use sqlx::{PgExecutor, PgPool};

use hytte_core::status::CancelledBy;
use hytte_core::types::DbId;

use crate::models::booking::{Booking, BookingFilter, CreateBooking};

/// Column list for bookings queries.
const COLUMNS: &str = "id, cabin_id, user_id, status, start_date, end_date, start_half, \
    end_half, start_at, end_at, guest_name, guest_address, guest_postal_code, \
    guest_city, guest_phone, guest_email, guest_affiliation, order_ref, cancelled_by, \
    cancelled_at, created_at, updated_at";

/// Statuses that occupy their window. Interpolated, never user input.
const ACTIVE: &str = "'pending', 'approved'";

fn decide_sql() -> String {
    format!(
        "UPDATE bookings SET status = $2, updated_at = now()
         WHERE id = $1 AND status = 'pending'
         RETURNING {COLUMNS}"
    )
}

fn cancel_sql() -> String {
    format!(
        "UPDATE bookings
         SET status = 'cancelled', cancelled_by = $2, cancelled_at = now(),
             updated_at = now()
         WHERE id = $1 AND status <> 'cancelled'
         RETURNING {COLUMNS}"
    )
}

/// Provides CRUD operations for bookings.
pub struct BookingRepo;

impl BookingRepo {
    /// Insert a booking. Runs on a pool or inside the advisory-locked
    /// create transaction.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateBooking,
    ) -> Result<Booking, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings
                (cabin_id, user_id, start_date, end_date, start_half, end_half,
                 start_at, end_at, guest_name, guest_address, guest_postal_code,
                 guest_city, guest_phone, guest_email, guest_affiliation, order_ref)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(input.cabin_id)
            .bind(input.user_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.start_half)
            .bind(&input.end_half)
            .bind(input.start_at)
            .bind(input.end_at)
            .bind(input.guest.guest_name.trim())
            .bind(input.guest.guest_address.trim())
            .bind(input.guest.guest_postal_code.trim())
            .bind(input.guest.guest_city.trim())
            .bind(input.guest.guest_phone.trim())
            .bind(input.guest.guest_email.to_lowercase())
            .bind(input.guest.guest_affiliation.as_deref().map(str::trim))
            .bind(input.order_ref)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every booking that occupies its window for a cabin. Overlap
    /// filtering against a candidate window happens in memory at the
    /// caller; this is the whole per-cabin active set.
    pub async fn list_active_for_cabin<'e>(
        executor: impl PgExecutor<'e>,
        cabin_id: DbId,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE cabin_id = $1 AND status IN ({ACTIVE})
             ORDER BY start_at ASC NULLS LAST, start_date ASC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(cabin_id)
            .fetch_all(executor)
            .await
    }

    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        filter: &BookingFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(user_id)
            .bind(filter.status_bind())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_user(
        pool: &PgPool,
        user_id: DbId,
        filter: &BookingFilter,
    ) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM bookings
             WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)",
        )
        .bind(user_id)
        .bind(filter.status_bind())
        .fetch_one(pool)
        .await?;
        Ok(count.0)
    }

    pub async fn list_for_cabin(
        pool: &PgPool,
        cabin_id: DbId,
        filter: &BookingFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE cabin_id = $1 AND ($2::text IS NULL OR status = $2)
             ORDER BY start_date ASC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(cabin_id)
            .bind(filter.status_bind())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_cabin(
        pool: &PgPool,
        cabin_id: DbId,
        filter: &BookingFilter,
    ) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM bookings
             WHERE cabin_id = $1 AND ($2::text IS NULL OR status = $2)",
        )
        .bind(cabin_id)
        .bind(filter.status_bind())
        .fetch_one(pool)
        .await?;
        Ok(count.0)
    }

    /// Bookings across every cabin the owner holds.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: DbId,
        filter: &BookingFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT b.id, b.cabin_id, b.user_id, b.status, b.start_date, b.end_date,
                    b.start_half, b.end_half, b.start_at, b.end_at, b.guest_name,
                    b.guest_address, b.guest_postal_code, b.guest_city, b.guest_phone,
                    b.guest_email, b.guest_affiliation, b.order_ref, b.cancelled_by,
                    b.cancelled_at, b.created_at, b.updated_at
             FROM bookings b
             JOIN cabins c ON c.id = b.cabin_id
             WHERE c.owner_id = $1
               AND ($2::text IS NULL OR b.status = $2)
             ORDER BY b.created_at DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(owner_id)
            .bind(filter.status_bind())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_owner(
        pool: &PgPool,
        owner_id: DbId,
        filter: &BookingFilter,
    ) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*)
             FROM bookings b
             JOIN cabins c ON c.id = b.cabin_id
             WHERE c.owner_id = $1
               AND ($2::text IS NULL OR b.status = $2)",
        )
        .bind(owner_id)
        .bind(filter.status_bind())
        .fetch_one(pool)
        .await?;
        Ok(count.0)
    }

    /// Decide on a booking. The `status = 'pending'` guard makes the
    /// transition atomic: of two concurrent decisions exactly one
    /// matches a row, the other gets `None`.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&decide_sql())
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Cancel a booking, recording who did it and when. The status guard
    /// keeps a concurrent double-cancel from matching twice.
    pub async fn cancel(
        pool: &PgPool,
        id: DbId,
        by: CancelledBy,
    ) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&cancel_sql())
            .bind(id)
            .bind(by.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Active bookings ending today or later, used to guard cabin
    /// deletion.
    pub async fn count_active_future_for_cabin(
        pool: &PgPool,
        cabin_id: DbId,
        today: NaiveDate,
    ) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM bookings
             WHERE cabin_id = $1 AND status IN ({ACTIVE}) AND end_date >= $2"
        );
        let count: (i64,) = sqlx::query_as(&query)
            .bind(cabin_id)
            .bind(today)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_updates_guard_on_current_status() {
        assert!(decide_sql().contains("status = 'pending'"));
        assert!(cancel_sql().contains("status <> 'cancelled'"));
    }
}
