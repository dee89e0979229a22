//! Route definitions for the `/games` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::games;
use crate::state::AppState;

/// ```text
/// GET  /games/search     -> search
/// POST /games/add        -> add_to_collection
/// GET  /games/{bggRef}   -> get_by_ref
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/games/search", get(games::search))
        .route("/games/add", post(games::add_to_collection))
        .route("/games/{bgg_ref}", get(games::get_by_ref))
}
