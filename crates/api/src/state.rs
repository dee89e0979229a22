use std::sync::Arc;

use gameplan_catalog::GameCatalog;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: gameplan_db::DbPool,
    /// Server configuration, loaded once at startup.
    pub config: Arc<ServerConfig>,
    /// Remote game catalog (BoardGameGeek in production, a stub in tests).
    pub catalog: Arc<dyn GameCatalog>,
}
