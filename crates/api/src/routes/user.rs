//! Route definitions for the `/user` resource.

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// ```text
/// POST   /user/register          -> register
/// POST   /user/login             -> login
/// POST   /user/password-reset    -> reset_password
/// PATCH  /user/update            -> update
/// GET    /user                   -> profile
/// DELETE /user                   -> delete
/// GET    /user/events            -> events
/// GET    /user/collection        -> collection
/// DELETE /user/collection/{id}   -> remove_game
/// ```
///
/// `/user/` is served as well as `/user`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user/register", post(user::register))
        .route("/user/login", post(user::login))
        .route("/user/password-reset", post(user::reset_password))
        .route("/user/update", patch(user::update))
        .route("/user", get(user::profile).delete(user::delete))
        .route("/user/", get(user::profile).delete(user::delete))
        .route("/user/events", get(user::events))
        .route("/user/collection", get(user::collection))
        .route("/user/collection/{id}", delete(user::remove_game))
}
