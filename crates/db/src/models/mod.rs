//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - Create/update DTOs where the entity is written through the API

pub mod block;
pub mod booking;
pub mod cabin;
pub mod legend;
pub mod note;
pub mod user;
