//! Game catalog record.

use serde::Serialize;
use sqlx::FromRow;
use gameplan_core::events::GameDefaults;
use gameplan_core::types::{DbId, Timestamp};

/// A row from the `games` table. Immutable once inserted.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: DbId,
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
    pub created_at: Timestamp,
}

impl Game {
    /// Values used to fill absent event fields.
    pub fn defaults(&self) -> GameDefaults {
        GameDefaults {
            min_players: self.min_players,
            max_players: self.max_players,
            play_time: self.play_time,
        }
    }
}

/// DTO for caching a catalog record.
#[derive(Debug, Clone)]
pub struct CreateGame {
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
}
