//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Plain reads take `&PgPool`; methods that must run under the per-cabin
//! advisory lock take a generic executor so they work inside a
//! transaction as well.

pub mod block_repo;
pub mod booking_repo;
pub mod cabin_repo;
pub mod legend_repo;
pub mod note_repo;
pub mod user_repo;

pub use block_repo::BlockRepo;
pub use booking_repo::BookingRepo;
pub use cabin_repo::CabinRepo;
pub use legend_repo::LegendRepo;
pub use note_repo::NoteRepo;
pub use user_repo::UserRepo;
