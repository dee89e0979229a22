//! Repository for the `events` table and its participant edge.

use sqlx::{PgExecutor, PgPool};
use gameplan_core::types::DbId;

use crate::models::event::{CreateEvent, Event, UpdateEvent};

/// Column list shared across queries. `participants` is read from the
/// single stored edge, in join order.
const COLUMNS: &str = "e.id, e.host_id, e.game_id, e.title, e.event_date, e.location, \
    e.game_image, e.game_thumbnail, e.min_participants, e.max_participants, e.game_length, \
    e.is_public, e.is_published, \
    ARRAY(SELECT ep.user_id FROM event_participants ep \
          WHERE ep.event_id = e.id ORDER BY ep.joined_at, ep.user_id) AS participants, \
    e.created_at, e.updated_at";

/// Listing order: soonest first, undated drafts last.
const ORDER: &str = "ORDER BY e.event_date ASC NULLS LAST, e.id ASC";

pub struct EventRepo;

impl EventRepo {
    /// Insert a new event, returning the created row (no participants yet).
    pub async fn create<'e, E>(executor: E, input: &CreateEvent) -> Result<Event, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let f = &input.fields;
        let query = format!(
            "INSERT INTO events AS e (host_id, game_id, title, event_date, location, \
                game_image, game_thumbnail, min_participants, max_participants, game_length, \
                is_public, is_published)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(input.host_id)
            .bind(input.game_id)
            .bind(&f.title)
            .bind(f.event_date)
            .bind(&f.location)
            .bind(&input.game_image)
            .bind(&input.game_thumbnail)
            .bind(f.min_participants)
            .bind(f.max_participants)
            .bind(f.game_length)
            .bind(f.is_public)
            .bind(f.is_published)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Event>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM events e WHERE e.id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Take a row lock on the event for the rest of the transaction.
    ///
    /// Concurrent membership changes to the same event queue behind this
    /// lock, so capacity checks made after it see every committed
    /// registration. Returns `false` if the event does not exist.
    pub async fn lock<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let row: Option<(DbId,)> = sqlx::query_as("SELECT id FROM events WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row.is_some())
    }

    /// Public, published events.
    pub async fn list_public(pool: &PgPool) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events e WHERE e.is_public AND e.is_published {ORDER}"
        );
        sqlx::query_as::<_, Event>(&query).fetch_all(pool).await
    }

    /// Every event a user hosts, drafts included.
    pub async fn list_hosted_by(pool: &PgPool, user_id: DbId) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events e WHERE e.host_id = $1 {ORDER}");
        sqlx::query_as::<_, Event>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Every event a user is a participant of.
    pub async fn list_attended_by(pool: &PgPool, user_id: DbId) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events e
             WHERE EXISTS (SELECT 1 FROM event_participants ep
                           WHERE ep.event_id = e.id AND ep.user_id = $1)
             {ORDER}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Overwrite the mutable columns with already-merged values.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e, E>(
        executor: E,
        id: DbId,
        input: &UpdateEvent,
    ) -> Result<Option<Event>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let f = &input.fields;
        let query = format!(
            "UPDATE events AS e SET
                game_id = $2,
                game_image = $3,
                game_thumbnail = $4,
                title = $5,
                event_date = $6,
                location = $7,
                min_participants = $8,
                max_participants = $9,
                game_length = $10,
                is_public = $11,
                is_published = $12
             WHERE e.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(input.game_id)
            .bind(&input.game_image)
            .bind(&input.game_thumbnail)
            .bind(&f.title)
            .bind(f.event_date)
            .bind(&f.location)
            .bind(f.min_participants)
            .bind(f.max_participants)
            .bind(f.game_length)
            .bind(f.is_public)
            .bind(f.is_published)
            .fetch_optional(executor)
            .await
    }

    /// Delete an event; its participant rows cascade in the same statement.
    pub async fn delete<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns `false` if the user was already a participant.
    pub async fn add_participant<'e, E>(
        executor: E,
        event_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "INSERT INTO event_participants (event_id, user_id) VALUES ($1, $2)
             ON CONFLICT (event_id, user_id) DO NOTHING",
        )
        .bind(event_id)
        .bind(user_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns `false` if the user was not a participant.
    pub async fn remove_participant<'e, E>(
        executor: E,
        event_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result =
            sqlx::query("DELETE FROM event_participants WHERE event_id = $1 AND user_id = $2")
                .bind(event_id)
                .bind(user_id)
                .execute(executor)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
