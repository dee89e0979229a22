//! Accounts: the `users` table.

use sqlx::{PgExecutor, PgPool};
use gameplan_core::types::DbId;

use crate::models::user::{CreateUser, UpdateUser, User};

/// Column list shared across queries. Collection and attendance are
/// derived from their join tables rather than stored on the row.
const COLUMNS: &str = "u.id, u.email, u.username, u.password_hash, \
    u.security_answer_one, u.security_answer_two, u.security_answer_three, \
    u.location, u.bio, \
    ARRAY(SELECT ug.game_id FROM user_games ug \
          WHERE ug.user_id = u.id ORDER BY ug.added_at, ug.game_id) AS games_owned, \
    ARRAY(SELECT ep.event_id FROM event_participants ep \
          WHERE ep.user_id = u.id ORDER BY ep.joined_at, ep.event_id) AS events_attending, \
    u.created_at, u.updated_at";

/// Account queries. Secrets arrive already hashed.
pub struct UserRepo;

impl UserRepo {
    /// Fails with a unique violation on `uq_users_email` or
    /// `uq_users_username` when either is taken.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let [one, two, three] = &input.security_answer_hashes;
        let query = format!(
            "INSERT INTO users AS u (email, username, password_hash, \
                security_answer_one, security_answer_two, security_answer_three, location, bio)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(one)
            .bind(two)
            .bind(three)
            .bind(&input.location)
            .bind(&input.bio)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<User>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM users u WHERE u.id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Exact, case-sensitive match, as used by login.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users u WHERE u.username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Exact match, as used by password recovery.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users u WHERE u.email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Profile edit; `None` fields keep their stored value. `Ok(None)`
    /// means the account is gone.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users AS u SET
                email = COALESCE($2, email),
                username = COALESCE($3, username),
                location = COALESCE($4, location),
                bio = COALESCE($5, bio),
                password_hash = COALESCE($6, password_hash)
             WHERE u.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(&input.username)
            .bind(&input.location)
            .bind(&input.bio)
            .bind(&input.password_hash)
            .fetch_optional(pool)
            .await
    }

    /// Returns `false` if the account is gone.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Foreign keys cascade in the same statement: hosted events (and
    /// their participant rows), the user's own participant rows, and the
    /// collection.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
