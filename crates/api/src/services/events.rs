//! Event lifecycle orchestration.
//!
//! Every mutation runs in one transaction. Membership changes and edits
//! take a row lock on the event first, so the rule checks in
//! `gameplan_core::events` always see the committed participant list.

use serde::Deserialize;
use validator::Validate;
use gameplan_core::events::{
    apply_patch, check_capacity, check_registration, check_withdrawal, ensure_host,
    initial_participants, is_publish_transition, is_visible_to, prepare_new_event, EventDraft,
    EventError, EventPatch,
};
use gameplan_core::types::{DbId, Timestamp};
use gameplan_db::models::event::{CreateEvent, Event, UpdateEvent};
use gameplan_db::models::user::UserResponse;
use gameplan_db::repositories::{EventRepo, GameRepo, UserRepo};
use sqlx::PgConnection;

use crate::error::AppResult;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /events/new`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(length(max = 100, message = "Title must be at most 100 characters"))]
    pub title: Option<String>,
    pub event_date: Option<Timestamp>,
    pub game: DbId,
    #[validate(length(max = 100, message = "Location must be at most 100 characters"))]
    pub location: Option<String>,
    #[validate(range(min = 1, message = "Min participants must be at least 1"))]
    pub min_participants: Option<i32>,
    #[validate(range(min = 1, message = "Max participants must be at least 1"))]
    pub max_participants: Option<i32>,
    #[serde(alias = "gamelength")]
    #[validate(range(min = 1, message = "Game length must be at least 1 minute"))]
    pub game_length: Option<i32>,
    pub is_public: Option<bool>,
    #[serde(default)]
    pub is_published: bool,
}

/// Request body for `PATCH /events/{id}`. Absent and `null` both keep the
/// stored value.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditEventRequest {
    #[validate(length(max = 100, message = "Title must be at most 100 characters"))]
    pub title: Option<String>,
    pub event_date: Option<Timestamp>,
    pub game: Option<DbId>,
    #[validate(length(max = 100, message = "Location must be at most 100 characters"))]
    pub location: Option<String>,
    #[validate(range(min = 1, message = "Min participants must be at least 1"))]
    pub min_participants: Option<i32>,
    #[validate(range(min = 1, message = "Max participants must be at least 1"))]
    pub max_participants: Option<i32>,
    #[serde(alias = "gamelength")]
    #[validate(range(min = 1, message = "Game length must be at least 1 minute"))]
    pub game_length: Option<i32>,
    pub is_public: Option<bool>,
    pub is_published: Option<bool>,
}

impl From<CreateEventRequest> for EventDraft {
    fn from(req: CreateEventRequest) -> Self {
        EventDraft {
            title: req.title,
            event_date: req.event_date,
            game: req.game,
            location: req.location,
            min_participants: req.min_participants,
            max_participants: req.max_participants,
            game_length: req.game_length,
            is_public: req.is_public,
            is_published: req.is_published,
        }
    }
}

impl From<EditEventRequest> for EventPatch {
    fn from(req: EditEventRequest) -> Self {
        EventPatch {
            title: req.title,
            event_date: req.event_date,
            game: req.game,
            location: req.location,
            min_participants: req.min_participants,
            max_participants: req.max_participants,
            game_length: req.game_length,
            is_public: req.is_public,
            is_published: req.is_published,
        }
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Create an event hosted by `host_id`. A published event starts with the
/// host as its only participant.
pub async fn create(state: &AppState, host_id: DbId, input: CreateEventRequest) -> AppResult<Event> {
    let draft = EventDraft::from(input);
    let mut tx = state.pool.begin().await?;

    UserRepo::find_by_id(&mut *tx, host_id)
        .await?
        .ok_or(EventError::UserNotFound(host_id))?;
    if !GameRepo::is_owned(&mut *tx, host_id, draft.game).await? {
        return Err(EventError::GameNotOwned(draft.game).into());
    }
    let game = GameRepo::find_by_id(&mut *tx, draft.game)
        .await?
        .ok_or(EventError::GameNotFound(draft.game))?;

    let fields = prepare_new_event(&draft, &game.defaults())?;
    let participants = initial_participants(host_id, &fields);
    let created = EventRepo::create(
        &mut *tx,
        &CreateEvent {
            host_id,
            game_id: game.id,
            game_image: game.image,
            game_thumbnail: game.thumbnail,
            fields,
        },
    )
    .await?;
    for user_id in participants {
        EventRepo::add_participant(&mut *tx, created.id, user_id).await?;
    }

    let event = reload(&mut tx, created.id).await?;
    tx.commit().await?;

    tracing::info!(
        event_id = event.id,
        host_id,
        published = event.is_published,
        "Event created"
    );
    Ok(event)
}

/// Add `user_id` to a published event with room left.
pub async fn register(
    state: &AppState,
    user_id: DbId,
    event_id: DbId,
) -> AppResult<(Event, UserResponse)> {
    let mut tx = state.pool.begin().await?;

    if !EventRepo::lock(&mut *tx, event_id).await? {
        return Err(EventError::EventNotFound(event_id).into());
    }
    let event = reload(&mut tx, event_id).await?;
    UserRepo::find_by_id(&mut *tx, user_id)
        .await?
        .ok_or(EventError::UserNotFound(user_id))?;

    check_registration(&event.fields(), &event.participants, user_id)?;
    EventRepo::add_participant(&mut *tx, event_id, user_id).await?;

    let event = reload(&mut tx, event_id).await?;
    let user = UserRepo::find_by_id(&mut *tx, user_id)
        .await?
        .ok_or(EventError::UserNotFound(user_id))?;
    tx.commit().await?;

    tracing::info!(
        event_id,
        user_id,
        participants = event.participants.len(),
        "User registered for event"
    );
    Ok((event, user.into()))
}

/// Remove `user_id` from an event. Hosts can never leave.
pub async fn withdraw(
    state: &AppState,
    user_id: DbId,
    event_id: DbId,
) -> AppResult<(Event, UserResponse)> {
    let mut tx = state.pool.begin().await?;

    UserRepo::find_by_id(&mut *tx, user_id)
        .await?
        .ok_or(EventError::UserNotFound(user_id))?;
    if !EventRepo::lock(&mut *tx, event_id).await? {
        return Err(EventError::EventNotFound(event_id).into());
    }
    let event = reload(&mut tx, event_id).await?;

    check_withdrawal(event.host_id, &event.participants, user_id)?;
    EventRepo::remove_participant(&mut *tx, event_id, user_id).await?;

    let event = reload(&mut tx, event_id).await?;
    let user = UserRepo::find_by_id(&mut *tx, user_id)
        .await?
        .ok_or(EventError::UserNotFound(user_id))?;
    tx.commit().await?;

    tracing::info!(event_id, user_id, "User left event");
    Ok((event, user.into()))
}

/// Host-only partial update. Publishing a draft makes the host a participant.
pub async fn edit(
    state: &AppState,
    host_id: DbId,
    event_id: DbId,
    input: EditEventRequest,
) -> AppResult<Event> {
    let patch = EventPatch::from(input);
    let mut tx = state.pool.begin().await?;

    if !EventRepo::lock(&mut *tx, event_id).await? {
        return Err(EventError::EventNotFound(event_id).into());
    }
    let current = reload(&mut tx, event_id).await?;
    ensure_host(current.host_id, host_id)?;

    let before = current.fields();
    let merged = apply_patch(&before, &patch)?;

    let (game_id, game_image, game_thumbnail) = match patch.game {
        Some(game_id) => {
            if !GameRepo::is_owned(&mut *tx, host_id, game_id).await? {
                return Err(EventError::GameNotOwned(game_id).into());
            }
            let game = GameRepo::find_by_id(&mut *tx, game_id)
                .await?
                .ok_or(EventError::GameNotFound(game_id))?;
            (game.id, game.image, game.thumbnail)
        }
        None => (current.game_id, current.game_image, current.game_thumbnail),
    };

    let mut participant_count = current.participants.len();
    if is_publish_transition(&before, &merged)
        && EventRepo::add_participant(&mut *tx, event_id, host_id).await?
    {
        participant_count += 1;
    }
    check_capacity(&merged, participant_count)?;

    let event = EventRepo::update(
        &mut *tx,
        event_id,
        &UpdateEvent {
            game_id,
            game_image,
            game_thumbnail,
            fields: merged,
        },
    )
    .await?
    .ok_or(EventError::EventNotFound(event_id))?;
    tx.commit().await?;

    tracing::info!(event_id, host_id, published = event.is_published, "Event updated");
    Ok(event)
}

/// Host-only delete. Participant rows cascade with the event.
pub async fn delete(state: &AppState, host_id: DbId, event_id: DbId) -> AppResult<()> {
    let mut tx = state.pool.begin().await?;

    if !EventRepo::lock(&mut *tx, event_id).await? {
        return Err(EventError::EventNotFound(event_id).into());
    }
    let event = reload(&mut tx, event_id).await?;
    ensure_host(event.host_id, host_id)?;

    EventRepo::delete(&mut *tx, event_id).await?;
    tx.commit().await?;

    tracing::info!(event_id, host_id, "Event deleted");
    Ok(())
}

pub async fn list_public(state: &AppState) -> AppResult<Vec<Event>> {
    Ok(EventRepo::list_public(&state.pool).await?)
}

/// Fetch an event the viewer may see. Hidden events look missing.
pub async fn get_visible(state: &AppState, event_id: DbId, viewer: Option<DbId>) -> AppResult<Event> {
    let event = EventRepo::find_by_id(&state.pool, event_id)
        .await?
        .ok_or(EventError::EventNotFound(event_id))?;

    if !is_visible_to(&event.fields(), event.host_id, &event.participants, viewer) {
        tracing::debug!(event_id, ?viewer, "Event hidden from viewer");
        return Err(EventError::EventNotFound(event_id).into());
    }
    Ok(event)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn reload(conn: &mut PgConnection, event_id: DbId) -> AppResult<Event> {
    EventRepo::find_by_id(conn, event_id)
        .await?
        .ok_or_else(|| EventError::EventNotFound(event_id).into())
}
