//! Event bus and notification delivery.
//!
//! Write paths publish [`bus::BookingEvent`]s after their transaction
//! commits; the [`notifier::Notifier`] task subscribes and delivers
//! guest/owner emails. Delivery is fire-and-forget: a failed send is
//! logged and never affects the originating request.

pub mod bus;
pub mod delivery;
pub mod messages;
pub mod notifier;

pub use bus::{BookingEvent, EventBus};
pub use delivery::email::EmailConfig;
pub use notifier::{BookingNotice, Notifier};
