//! Event entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use gameplan_core::events::EventFields;
use gameplan_core::types::{DbId, Timestamp};

/// A row from the `events` table with its participant ids, in join order.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: DbId,
    #[serde(rename = "host")]
    pub host_id: DbId,
    #[serde(rename = "game")]
    pub game_id: DbId,
    pub title: Option<String>,
    pub event_date: Option<Timestamp>,
    pub location: Option<String>,
    pub game_image: String,
    pub game_thumbnail: String,
    pub min_participants: Option<i32>,
    pub max_participants: Option<i32>,
    pub game_length: Option<i32>,
    pub is_public: bool,
    pub is_published: bool,
    pub participants: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Event {
    /// The rule-bearing fields, for the lifecycle checks in `gameplan_core::events`.
    pub fn fields(&self) -> EventFields {
        EventFields {
            title: self.title.clone(),
            event_date: self.event_date,
            location: self.location.clone(),
            min_participants: self.min_participants,
            max_participants: self.max_participants,
            game_length: self.game_length,
            is_public: self.is_public,
            is_published: self.is_published,
        }
    }

    /// Title for messages, falling back for untitled drafts.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("untitled")
    }
}

/// DTO for inserting an event.
#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub host_id: DbId,
    pub game_id: DbId,
    pub game_image: String,
    pub game_thumbnail: String,
    pub fields: EventFields,
}

/// DTO for overwriting an event's mutable columns with merged values.
#[derive(Debug, Clone)]
pub struct UpdateEvent {
    pub game_id: DbId,
    pub game_image: String,
    pub game_thumbnail: String,
    pub fields: EventFields,
}
