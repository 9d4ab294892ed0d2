//! Legend entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use hytte_core::types::{DbId, Timestamp};

/// A row from the `legends` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Legend {
    pub id: DbId,
    pub name: String,
    pub color: String,
    pub bg_color: String,
    pub border_color: String,
    pub text_color: String,
    pub description: String,
    pub is_active: bool,
    pub is_default: bool,
    pub is_bookable: bool,
    pub company_slug: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a legend.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLegend {
    pub name: String,
    pub color: String,
    pub bg_color: Option<String>,
    pub border_color: Option<String>,
    pub text_color: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub is_default: Option<bool>,
    pub is_bookable: Option<bool>,
    pub company_slug: Option<String>,
}

/// DTO for updating a legend; all fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLegend {
    pub name: Option<String>,
    pub color: Option<String>,
    pub bg_color: Option<String>,
    pub border_color: Option<String>,
    pub text_color: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub is_default: Option<bool>,
    pub is_bookable: Option<bool>,
    pub company_slug: Option<String>,
}
