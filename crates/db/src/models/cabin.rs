//! Cabin entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use hytte_core::timewindow::{CabinHours, ClockTime};
use hytte_core::types::{DbId, Timestamp};
use hytte_core::CoreError;

/// A row from the `cabins` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Cabin {
    pub id: DbId,
    pub owner_id: DbId,
    pub owner_slug: Option<String>,
    pub company_slug: Option<String>,
    pub name: String,
    pub slug: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub contact_person_name: Option<String>,
    pub image: Option<String>,
    pub color: String,
    pub halfday_availability: bool,
    pub affiliations: Vec<String>,
    pub full_day_start_time: Option<String>,
    pub full_day_end_time: Option<String>,
    pub am_start_time: Option<String>,
    pub am_end_time: Option<String>,
    pub pm_start_time: Option<String>,
    pub pm_end_time: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn parse_opt(col: &str, v: &Option<String>) -> Result<Option<ClockTime>, CoreError> {
    match v.as_deref() {
        None => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| CoreError::Internal(format!("cabin column {col} holds invalid time: {s}"))),
    }
}

impl Cabin {
    /// The cabin's custom check-in/check-out hours, parsed from the
    /// `HH:MM` text columns. Invalid stored values surface as internal
    /// errors rather than silently falling back.
    pub fn hours(&self) -> Result<CabinHours, CoreError> {
        Ok(CabinHours {
            halfday: self.halfday_availability,
            full_start: parse_opt("full_day_start_time", &self.full_day_start_time)?,
            full_end: parse_opt("full_day_end_time", &self.full_day_end_time)?,
            am_start: parse_opt("am_start_time", &self.am_start_time)?,
            am_end: parse_opt("am_end_time", &self.am_end_time)?,
            pm_start: parse_opt("pm_start_time", &self.pm_start_time)?,
            pm_end: parse_opt("pm_end_time", &self.pm_end_time)?,
        })
    }
}

/// DTO for creating a cabin. The slug is generated server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCabin {
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub contact_person_name: Option<String>,
    pub image: Option<String>,
    pub color: Option<String>,
    #[serde(default)]
    pub halfday_availability: bool,
    #[serde(default)]
    pub affiliations: Vec<String>,
    pub full_day_start_time: Option<String>,
    pub full_day_end_time: Option<String>,
    pub am_start_time: Option<String>,
    pub am_end_time: Option<String>,
    pub pm_start_time: Option<String>,
    pub pm_end_time: Option<String>,
}

/// DTO for updating a cabin; all fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCabin {
    pub name: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub contact_person_name: Option<String>,
    pub image: Option<String>,
    pub color: Option<String>,
    pub halfday_availability: Option<bool>,
    pub affiliations: Option<Vec<String>>,
    pub full_day_start_time: Option<String>,
    pub full_day_end_time: Option<String>,
    pub am_start_time: Option<String>,
    pub am_end_time: Option<String>,
    pub pm_start_time: Option<String>,
    pub pm_end_time: Option<String>,
}

/// Filters for cabin listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CabinFilter {
    pub city: Option<String>,
    pub halfday: Option<bool>,
    pub owner_id: Option<DbId>,
}
