//! Repository for the `games` table and the `user_games` collection.

use sqlx::{PgExecutor, PgPool};
use gameplan_core::types::DbId;

use crate::models::game::{CreateGame, Game};

const COLUMNS: &str = "id, bgg_ref, name, year_published, min_players, max_players, \
                        play_time, description, thumbnail, image, url, created_at";

pub struct GameRepo;

impl GameRepo {
    /// Insert a catalog record, or return the existing row for the same
    /// `bgg_ref`. Concurrent first inserts resolve to a single row.
    pub async fn create(pool: &PgPool, input: &CreateGame) -> Result<Game, sqlx::Error> {
        let query = format!(
            "INSERT INTO games (bgg_ref, name, year_published, min_players, max_players, \
                play_time, description, thumbnail, image, url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             ON CONFLICT (bgg_ref) DO UPDATE SET bgg_ref = EXCLUDED.bgg_ref
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Game>(&query)
            .bind(input.bgg_ref)
            .bind(&input.name)
            .bind(&input.year_published)
            .bind(input.min_players)
            .bind(input.max_players)
            .bind(input.play_time)
            .bind(&input.description)
            .bind(&input.thumbnail)
            .bind(&input.image)
            .bind(&input.url)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Game>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM games WHERE id = $1");
        sqlx::query_as::<_, Game>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_bgg_ref(pool: &PgPool, bgg_ref: i64) -> Result<Option<Game>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM games WHERE bgg_ref = $1");
        sqlx::query_as::<_, Game>(&query)
            .bind(bgg_ref)
            .fetch_optional(pool)
            .await
    }

    /// Games in a user's collection ordered by name, optionally filtered
    /// by a case-insensitive substring of the name.
    pub async fn list_owned(
        pool: &PgPool,
        user_id: DbId,
        search: Option<&str>,
    ) -> Result<Vec<Game>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM games
             WHERE id IN (SELECT game_id FROM user_games WHERE user_id = $1)
               AND ($2::TEXT IS NULL OR POSITION(LOWER($2) IN LOWER(name)) > 0)
             ORDER BY name, id"
        );
        sqlx::query_as::<_, Game>(&query)
            .bind(user_id)
            .bind(search)
            .fetch_all(pool)
            .await
    }

    pub async fn is_owned<'e, E>(executor: E, user_id: DbId, game_id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let (owned,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM user_games WHERE user_id = $1 AND game_id = $2)",
        )
        .bind(user_id)
        .bind(game_id)
        .fetch_one(executor)
        .await?;
        Ok(owned)
    }

    /// Add a game to a collection. Returns `false` if it was already there.
    pub async fn add_to_collection(
        pool: &PgPool,
        user_id: DbId,
        game_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO user_games (user_id, game_id) VALUES ($1, $2)
             ON CONFLICT (user_id, game_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(game_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a game from a collection. Returns `false` if it was not there.
    pub async fn remove_from_collection(
        pool: &PgPool,
        user_id: DbId,
        game_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_games WHERE user_id = $1 AND game_id = $2")
            .bind(user_id)
            .bind(game_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
