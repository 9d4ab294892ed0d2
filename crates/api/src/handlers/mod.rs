//! HTTP request handlers, one module per resource.

pub mod auth;
pub mod block;
pub mod booking;
pub mod cabin;
pub mod calendar;
pub mod legend;
pub mod note;
