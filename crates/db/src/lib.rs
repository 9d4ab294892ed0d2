//! Database access layer: connection pool, migrations, and repositories.

pub mod models;
pub mod repositories;

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};

use hytte_core::types::DbId;

/// Create a connection pool against the given database URL.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Verify the database answers trivial queries.
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Take a transaction-scoped advisory lock keyed by cabin id.
///
/// Every write path that depends on an availability read (booking
/// creation, block creation, block date changes) takes this lock first,
/// so concurrent requests against the same cabin serialize and the
/// check-then-insert sequence cannot interleave. The lock releases at
/// commit or rollback.
pub async fn lock_cabin(
    tx: &mut Transaction<'_, Postgres>,
    cabin_id: DbId,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(cabin_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
