//! Route definitions for the `/events` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

/// ```text
/// GET    /events                  -> list_public
/// POST   /events/new              -> create
/// GET    /events/{id}             -> get_by_id
/// PATCH  /events/{id}             -> edit
/// DELETE /events/{id}             -> delete
/// POST   /events/{id}/register    -> register
/// DELETE /events/{id}/leave       -> leave
/// ```
///
/// `/events/` is served as well as `/events`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(events::list_public))
        .route("/events/", get(events::list_public))
        .route("/events/new", post(events::create))
        .route(
            "/events/{id}",
            get(events::get_by_id)
                .patch(events::edit)
                .delete(events::delete),
        )
        .route("/events/{id}/register", post(events::register))
        .route("/events/{id}/leave", delete(events::leave))
}
