//! Pure domain logic for the cabin booking backend.
//!
//! This crate has zero internal dependencies so it can be used by the
//! repository layer, the API server, and any future CLI tooling:
//!
//! - [`timewindow`] — resolves heterogeneous booking inputs (half-day
//!   markers, date ranges, exact windows, multi-segment requests) into
//!   canonical UTC instant intervals.
//! - [`status`] — the booking status state machine.
//! - [`calendar`] — month-granularity occupancy projection.
//! - [`slug`] — slug generation and diacritic-folding normalization.
//! - [`pagination`] — page/limit clamping and `has_more` math.

pub mod calendar;
pub mod error;
pub mod pagination;
pub mod slug;
pub mod status;
pub mod timewindow;
pub mod types;

pub use error::CoreError;
