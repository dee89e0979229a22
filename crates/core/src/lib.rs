//! Domain types, error taxonomy and pure business rules for GamePlan.
//!
//! Nothing in this crate performs I/O. Repositories and services load the
//! state, hand it to these functions, and persist whatever they return.

pub mod error;
pub mod events;
pub mod types;
