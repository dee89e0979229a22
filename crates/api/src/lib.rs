//! GamePlan API server library.
//!
//! Exposes the building blocks (config, state, error handling, services,
//! routes) so integration tests, the seed binary and the server entrypoint
//! can all access them.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod services;
pub mod state;
