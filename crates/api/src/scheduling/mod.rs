//! Scheduling orchestration: everything between the HTTP handlers and
//! the repositories.
//!
//! - [`availability`] — in-memory conflict detection against a cabin's
//!   active bookings and blocks.
//! - [`lifecycle`] — booking creation (all four request shapes, inside
//!   an advisory-locked transaction) and the status transitions.
//! - [`blocks`] — blackout block management (`block`/`unblock`, edits).
//! - [`calendar`] — month-view assembly over the pure core projection.

pub mod availability;
pub mod blocks;
pub mod calendar;
pub mod lifecycle;
