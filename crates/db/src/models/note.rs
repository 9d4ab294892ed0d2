//! Day note entity models.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

use hytte_core::types::{DbId, Timestamp};

/// A row from the `cabin_day_notes` table. At most one row exists per
/// `(cabin_id, date)`; the legend reference is resolved lazily at read
/// time and may dangle.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DayNote {
    pub id: DbId,
    pub cabin_id: DbId,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub legend_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
