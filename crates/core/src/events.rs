//! Event lifecycle rules.
//!
//! Pure functions over pre-loaded event state: the publish rule table,
//! draft preparation, patch merging, registration and withdrawal checks,
//! capacity and visibility. Callers run these inside the transaction that
//! persists the outcome.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Publish rule table
// ---------------------------------------------------------------------------

/// A field that must be present before an event can be published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PublishField {
    Title,
    EventDate,
    Location,
    MaxParticipants,
    GameLength,
}

/// Fields required when `is_published` is true. Create and edit both
/// consult this table.
pub const PUBLISH_REQUIRED_FIELDS: &[PublishField] = &[
    PublishField::Title,
    PublishField::EventDate,
    PublishField::Location,
    PublishField::MaxParticipants,
    PublishField::GameLength,
];

impl PublishField {
    /// Wire name of the field.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::EventDate => "eventDate",
            Self::Location => "location",
            Self::MaxParticipants => "maxParticipants",
            Self::GameLength => "gameLength",
        }
    }

    /// Human-readable label used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::EventDate => "event date",
            Self::Location => "location",
            Self::MaxParticipants => "max participants",
            Self::GameLength => "game length",
        }
    }

    /// The per-field error entry.
    pub fn missing_message(&self) -> String {
        format!("Missing required {} for published event", self.label())
    }

    fn is_present(&self, fields: &EventFields) -> bool {
        match self {
            Self::Title => has_text(&fields.title),
            Self::EventDate => fields.event_date.is_some(),
            Self::Location => has_text(&fields.location),
            Self::MaxParticipants => is_positive(fields.max_participants),
            Self::GameLength => is_positive(fields.game_length),
        }
    }
}

/// Catalog games without player counts or a play time default to 0, which
/// is no better than absent.
fn is_positive(value: Option<i32>) -> bool {
    value.is_some_and(|n| n > 0)
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

fn missing_fields_message(missing: &[PublishField]) -> String {
    match missing {
        [only] => only.missing_message(),
        _ => "Missing required fields for published event".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Rule violations raised by the event lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    #[error("Event not found")]
    EventNotFound(DbId),

    #[error("User not found")]
    UserNotFound(DbId),

    #[error("Game not found")]
    GameNotFound(DbId),

    #[error("Game not owned")]
    GameNotOwned(DbId),

    #[error("{}", missing_fields_message(.0))]
    MissingPublishFields(Vec<PublishField>),

    #[error("This event is not ready yet!")]
    NotPublished,

    #[error("User already registered for this event")]
    AlreadyRegistered,

    #[error("This event is full")]
    EventFull,

    #[error("You are not attending this event")]
    NotAttending,

    #[error("Hosts cannot leave their own event")]
    HostCannotLeave,

    #[error("Only the host may perform this action")]
    NotHost,

    #[error("A published event cannot be returned to draft")]
    CannotUnpublish,

    #[error("Max participants cannot be lower than the current number of participants ({0})")]
    CapacityBelowParticipants(usize),

    #[error("Min participants cannot be greater than max participants")]
    ParticipantRange,
}

impl From<EventError> for CoreError {
    fn from(err: EventError) -> Self {
        let message = err.to_string();
        match err {
            EventError::EventNotFound(id) => CoreError::not_found("Event", id),
            EventError::UserNotFound(id) => CoreError::not_found("User", id),
            EventError::GameNotFound(id) => CoreError::not_found("Game", id),
            EventError::GameNotOwned(_) | EventError::NotHost | EventError::HostCannotLeave => {
                CoreError::Forbidden(message)
            }
            EventError::MissingPublishFields(ref missing) => CoreError::Validation {
                errors: missing.iter().map(PublishField::missing_message).collect(),
                message,
            },
            EventError::AlreadyRegistered => CoreError::Conflict(message),
            EventError::EventFull | EventError::CapacityBelowParticipants(_) => {
                CoreError::CapacityExceeded(message)
            }
            EventError::NotPublished
            | EventError::NotAttending
            | EventError::CannotUnpublish
            | EventError::ParticipantRange => CoreError::validation(message),
        }
    }
}

// ---------------------------------------------------------------------------
// Event state
// ---------------------------------------------------------------------------

/// The mutable, rule-bearing fields of an event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventFields {
    pub title: Option<String>,
    pub event_date: Option<Timestamp>,
    pub location: Option<String>,
    pub min_participants: Option<i32>,
    pub max_participants: Option<i32>,
    pub game_length: Option<i32>,
    pub is_public: bool,
    pub is_published: bool,
}

/// Canonical values of the bound game, used to fill draft defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameDefaults {
    pub min_players: i32,
    pub max_players: i32,
    pub play_time: i32,
}

/// Input to event creation.
#[derive(Debug, Clone, Default)]
pub struct EventDraft {
    pub title: Option<String>,
    pub event_date: Option<Timestamp>,
    pub game: DbId,
    pub location: Option<String>,
    pub min_participants: Option<i32>,
    pub max_participants: Option<i32>,
    pub game_length: Option<i32>,
    pub is_public: Option<bool>,
    pub is_published: bool,
}

/// Partial update of an event. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub event_date: Option<Timestamp>,
    pub game: Option<DbId>,
    pub location: Option<String>,
    pub min_participants: Option<i32>,
    pub max_participants: Option<i32>,
    pub game_length: Option<i32>,
    pub is_public: Option<bool>,
    pub is_published: Option<bool>,
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Required fields absent from `fields`, in rule-table order.
pub fn missing_publish_fields(fields: &EventFields) -> Vec<PublishField> {
    PUBLISH_REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !field.is_present(fields))
        .collect()
}

/// Reject a published event that lacks any required field.
pub fn ensure_publishable(fields: &EventFields) -> Result<(), EventError> {
    if !fields.is_published {
        return Ok(());
    }
    let missing = missing_publish_fields(fields);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(EventError::MissingPublishFields(missing))
    }
}

fn check_participant_range(fields: &EventFields) -> Result<(), EventError> {
    match (fields.min_participants, fields.max_participants) {
        (Some(min), Some(max)) if min > max => Err(EventError::ParticipantRange),
        _ => Ok(()),
    }
}

/// Validate a draft and fill defaults from the bound game.
///
/// The publish check runs on the draft as submitted, before defaults are
/// applied. A defaulted minimum never exceeds an explicit maximum.
pub fn prepare_new_event(
    draft: &EventDraft,
    defaults: &GameDefaults,
) -> Result<EventFields, EventError> {
    let requested = EventFields {
        title: draft.title.clone(),
        event_date: draft.event_date,
        location: draft.location.clone(),
        min_participants: draft.min_participants,
        max_participants: draft.max_participants,
        game_length: draft.game_length,
        is_public: draft.is_public.unwrap_or(false),
        is_published: draft.is_published,
    };
    ensure_publishable(&requested)?;

    let max = requested.max_participants.unwrap_or(defaults.max_players);
    let min = requested
        .min_participants
        .unwrap_or(defaults.min_players.min(max));
    let fields = EventFields {
        min_participants: Some(min),
        max_participants: Some(max),
        game_length: Some(requested.game_length.unwrap_or(defaults.play_time)),
        is_public: requested.is_published && requested.is_public,
        ..requested
    };
    check_participant_range(&fields)?;
    Ok(fields)
}

/// Participants of a newly created event.
pub fn initial_participants(host_id: DbId, fields: &EventFields) -> Vec<DbId> {
    if fields.is_published {
        vec![host_id]
    } else {
        Vec::new()
    }
}

/// Merge `patch` onto `current`, enforcing the publish rules on the result.
pub fn apply_patch(current: &EventFields, patch: &EventPatch) -> Result<EventFields, EventError> {
    if current.is_published && patch.is_published == Some(false) {
        return Err(EventError::CannotUnpublish);
    }

    let is_published = patch.is_published.unwrap_or(current.is_published);
    let is_public = patch.is_public.unwrap_or(current.is_public);
    let merged = EventFields {
        title: patch.title.clone().or_else(|| current.title.clone()),
        event_date: patch.event_date.or(current.event_date),
        location: patch.location.clone().or_else(|| current.location.clone()),
        min_participants: patch.min_participants.or(current.min_participants),
        max_participants: patch.max_participants.or(current.max_participants),
        game_length: patch.game_length.or(current.game_length),
        is_public: is_published && is_public,
        is_published,
    };

    ensure_publishable(&merged)?;
    check_participant_range(&merged)?;
    Ok(merged)
}

/// Whether an edit moves the event from draft to published.
pub fn is_publish_transition(before: &EventFields, after: &EventFields) -> bool {
    !before.is_published && after.is_published
}

/// A published event must have room for every current participant.
pub fn check_capacity(fields: &EventFields, participant_count: usize) -> Result<(), EventError> {
    if !fields.is_published {
        return Ok(());
    }
    match fields.max_participants {
        Some(max) if (max.max(0) as usize) < participant_count => {
            Err(EventError::CapacityBelowParticipants(participant_count))
        }
        _ => Ok(()),
    }
}

/// Checks run in order: published, not already registered, room left.
pub fn check_registration(
    fields: &EventFields,
    participants: &[DbId],
    user_id: DbId,
) -> Result<(), EventError> {
    if !fields.is_published {
        return Err(EventError::NotPublished);
    }
    if participants.contains(&user_id) {
        return Err(EventError::AlreadyRegistered);
    }
    let capacity = fields.max_participants.unwrap_or(0).max(0) as usize;
    if participants.len() >= capacity {
        return Err(EventError::EventFull);
    }
    Ok(())
}

/// The host check precedes the attendance check, so a host is refused on
/// every attempt, including drafts they have not joined.
pub fn check_withdrawal(host_id: DbId, participants: &[DbId], user_id: DbId) -> Result<(), EventError> {
    if user_id == host_id {
        return Err(EventError::HostCannotLeave);
    }
    if !participants.contains(&user_id) {
        return Err(EventError::NotAttending);
    }
    Ok(())
}

pub fn ensure_host(host_id: DbId, caller_id: DbId) -> Result<(), EventError> {
    if host_id == caller_id {
        Ok(())
    } else {
        Err(EventError::NotHost)
    }
}

/// Public published events are open to anyone; any other event only to
/// its host and participants.
pub fn is_visible_to(
    fields: &EventFields,
    host_id: DbId,
    participants: &[DbId],
    viewer: Option<DbId>,
) -> bool {
    if fields.is_public && fields.is_published {
        return true;
    }
    viewer.is_some_and(|id| id == host_id || participants.contains(&id))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
