//! Handlers for the `/games` resource.

use axum::extract::State;
use gameplan_core::error::CoreError;
use gameplan_db::models::game::Game;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::query::CatalogSearchParams;
use crate::response::{ApiResponse, GamePayload, GamesPayload};
use crate::services::games::{self, AddGameRequest, GameRecord, SearchResults};
use crate::state::AppState;

/// GET /games/search?query=&strict=
pub async fn search(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppQuery(params): AppQuery<CatalogSearchParams>,
) -> AppResult<ApiResponse<GamesPayload<SearchResults>>> {
    let games = games::search(&state, params.query.as_deref(), params.strict).await?;
    Ok(ApiResponse::ok("Games retrieved successfully", GamesPayload { games }))
}

/// GET /games/{bggRef}
///
/// Served from the local cache when present, otherwise live from the
/// catalog without caching.
pub async fn get_by_ref(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppPath(bgg_ref): AppPath<i64>,
) -> AppResult<ApiResponse<GamePayload<GameRecord>>> {
    let game = games::lookup(&state, bgg_ref)
        .await?
        .ok_or_else(|| CoreError::not_found("Game", bgg_ref))?;
    Ok(ApiResponse::ok("Game retrieved successfully", GamePayload { game }))
}

/// POST /games/add
pub async fn add_to_collection(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<AddGameRequest>,
) -> AppResult<ApiResponse<GamePayload<Game>>> {
    let game = games::add_to_collection(&state, auth.user_id, input).await?;
    Ok(ApiResponse::ok(
        format!("{} added to collection successfully", game.name),
        GamePayload { game },
    ))
}
