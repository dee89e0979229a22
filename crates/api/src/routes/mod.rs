pub mod events;
pub mod games;
pub mod health;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree, mounted at the root.
///
/// Route hierarchy:
///
/// ```text
/// /user/register                       register (public)
/// /user/login                          login (public)
/// /user/password-reset                 reset via security questions (public)
/// /user/update                         update profile (PATCH)
/// /user                                profile (GET), delete account (DELETE)
/// /user/events                         hosted or attended events (?hosted=)
/// /user/collection                     owned games (?search=)
/// /user/collection/{id}                remove owned game (DELETE)
///
/// /games/search                        catalog search (?query=&strict=)
/// /games/add                           add to collection (POST)
/// /games/{bggRef}                      catalog detail
///
/// /events                              public published events (public)
/// /events/new                          create (POST)
/// /events/{id}                         get (optional auth), edit (PATCH), delete
/// /events/{id}/register                join (POST)
/// /events/{id}/leave                   withdraw (DELETE)
/// ```
///
/// Everything except the routes marked public requires a bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(user::router())
        .merge(games::router())
        .merge(events::router())
}
