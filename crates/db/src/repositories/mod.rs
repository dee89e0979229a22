//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Methods that take part in multi-entity mutations accept any
//! [`sqlx::PgExecutor`], so callers can pass either `&PgPool` or
//! `&mut *tx`.

pub mod event_repo;
pub mod game_repo;
pub mod user_repo;

pub use event_repo::EventRepo;
pub use game_repo::GameRepo;
pub use user_repo::UserRepo;
