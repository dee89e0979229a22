pub mod events;
pub mod games;
pub mod user;
