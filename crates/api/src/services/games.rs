//! Game catalog gateway: local cache first, BoardGameGeek second.

use serde::{Deserialize, Serialize};
use gameplan_catalog::{CatalogGame, SearchHit};
use gameplan_core::error::CoreError;
use gameplan_core::types::{DbId, Timestamp};
use gameplan_db::models::game::{CreateGame, Game};
use gameplan_db::repositories::GameRepo;

use crate::error::{AppError, AppResult};
use crate::query::non_blank;
use crate::services::accounts::load_user;
use crate::state::AppState;

/// A game as served by `GET /games/{bggRef}`. Cached and live records share
/// this shape; `id` and `createdAt` stay null until the game is cached.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: Option<DbId>,
    pub bgg_ref: i64,
    pub name: String,
    pub year_published: String,
    pub min_players: i32,
    pub max_players: i32,
    pub play_time: i32,
    pub description: String,
    pub thumbnail: String,
    pub image: String,
    pub url: String,
    pub created_at: Option<Timestamp>,
}

impl From<Game> for GameRecord {
    fn from(game: Game) -> Self {
        Self {
            id: Some(game.id),
            bgg_ref: game.bgg_ref,
            name: game.name,
            year_published: game.year_published,
            min_players: game.min_players,
            max_players: game.max_players,
            play_time: game.play_time,
            description: game.description,
            thumbnail: game.thumbnail,
            image: game.image,
            url: game.url,
            created_at: Some(game.created_at),
        }
    }
}

impl From<CatalogGame> for GameRecord {
    fn from(game: CatalogGame) -> Self {
        Self {
            id: None,
            bgg_ref: game.bgg_ref,
            name: game.name,
            year_published: game.year_published,
            min_players: game.min_players,
            max_players: game.max_players,
            play_time: game.play_time,
            description: game.description,
            thumbnail: game.thumbnail,
            image: game.image,
            url: game.url,
            created_at: None,
        }
    }
}

/// Result of `GET /games/search`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SearchResults {
    /// `strict=true`: at most one full record.
    Exact(Vec<CatalogGame>),
    Partial(Vec<SearchHit>),
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Exact(games) => games.is_empty(),
            Self::Partial(hits) => hits.is_empty(),
        }
    }
}

/// Catalog reference as sent by clients, either `31481` or `"31481"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GameRef {
    Number(i64),
    Text(String),
}

/// Request body for `POST /games/add`.
#[derive(Debug, Deserialize)]
pub struct AddGameRequest {
    #[serde(default)]
    pub id: Option<GameRef>,
}

fn cache_row(game: CatalogGame) -> CreateGame {
    CreateGame {
        bgg_ref: game.bgg_ref,
        name: game.name,
        year_published: game.year_published,
        min_players: game.min_players,
        max_players: game.max_players,
        play_time: game.play_time,
        description: game.description,
        thumbnail: game.thumbnail,
        image: game.image,
        url: game.url,
    }
}

/// Cache-aside lookup: the local row, else fetch, persist and return it.
pub async fn resolve(state: &AppState, bgg_ref: i64) -> AppResult<Option<Game>> {
    if let Some(game) = GameRepo::find_by_bgg_ref(&state.pool, bgg_ref).await? {
        return Ok(Some(game));
    }

    let Some(remote) = state.catalog.fetch_game(bgg_ref).await? else {
        return Ok(None);
    };
    let game = GameRepo::create(&state.pool, &cache_row(remote)).await?;
    tracing::info!(game_id = game.id, bgg_ref, name = %game.name, "Cached catalog game");
    Ok(Some(game))
}

/// Local row or live record, without persisting anything.
pub async fn lookup(state: &AppState, bgg_ref: i64) -> AppResult<Option<GameRecord>> {
    if let Some(game) = GameRepo::find_by_bgg_ref(&state.pool, bgg_ref).await? {
        return Ok(Some(game.into()));
    }
    Ok(state.catalog.fetch_game(bgg_ref).await?.map(GameRecord::from))
}

/// Search the catalog by name.
pub async fn search(state: &AppState, query: Option<&str>, strict: bool) -> AppResult<SearchResults> {
    let query = non_blank(query).ok_or_else(|| CoreError::validation("Missing search query"))?;

    let results = if strict {
        SearchResults::Exact(state.catalog.search_exact(query).await?.into_iter().collect())
    } else {
        SearchResults::Partial(state.catalog.search(query).await?)
    };

    if results.is_empty() {
        return Err(AppError::NotFound("No games found".into()));
    }
    Ok(results)
}

/// Add a catalog game to the caller's collection, caching it first.
pub async fn add_to_collection(state: &AppState, user_id: DbId, input: AddGameRequest) -> AppResult<Game> {
    let bgg_ref = match input.id {
        None => return Err(CoreError::validation("Missing game ID").into()),
        Some(GameRef::Text(text)) if text.trim().is_empty() => {
            return Err(CoreError::validation("Missing game ID").into())
        }
        Some(GameRef::Text(text)) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| CoreError::not_found("Game", &text))?,
        Some(GameRef::Number(n)) => n,
    };

    load_user(state, user_id).await?;
    let game = resolve(state, bgg_ref)
        .await?
        .ok_or_else(|| CoreError::not_found("Game", bgg_ref))?;

    if !GameRepo::add_to_collection(&state.pool, user_id, game.id).await? {
        return Err(CoreError::Conflict("Game already in collection".into()).into());
    }

    tracing::info!(user_id, game_id = game.id, "Game added to collection");
    Ok(game)
}
