//! User entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use gameplan_core::types::{DbId, Timestamp};

/// Full user row from the `users` table, with the derived collection and
/// attendance lists.
///
/// Contains the password and security-answer hashes -- NEVER serialize this
/// to API responses directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub security_answer_one: String,
    pub security_answer_two: String,
    pub security_answer_three: String,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub games_owned: Vec<DbId>,
    pub events_attending: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Stored security answer hashes, in question order.
    pub fn security_answer_hashes(&self) -> [&str; 3] {
        [
            &self.security_answer_one,
            &self.security_answer_two,
            &self.security_answer_three,
        ]
    }
}

/// Safe user representation for API responses (no hashes).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub username: String,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub games_owned: Vec<DbId>,
    pub events_attending: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            location: user.location,
            bio: user.bio,
            games_owned: user.games_owned,
            events_attending: user.events_attending,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// DTO for creating a new user. Secrets arrive already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub security_answer_hashes: [String; 3],
    pub location: Option<String>,
    pub bio: Option<String>,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub username: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub password_hash: Option<String>,
}
