//! Unavailability block entity models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use hytte_core::timewindow::TimeWindow;
use hytte_core::types::{DbId, Timestamp};

/// A row from the `unavailability_blocks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Block {
    pub id: DbId,
    pub cabin_id: DbId,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    pub reason: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Block {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_at, self.end_at)
    }
}

/// Resolved insert payload for a block.
#[derive(Debug, Clone)]
pub struct CreateBlock {
    pub cabin_id: DbId,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    pub reason: Option<String>,
    pub created_by: Option<DbId>,
}

/// DTO for editing an existing block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBlock {
    pub start_at: Option<Timestamp>,
    pub end_at: Option<Timestamp>,
    pub reason: Option<String>,
}
