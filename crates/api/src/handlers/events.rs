//! Handlers for the `/events` resource.

use axum::extract::State;
use gameplan_core::types::DbId;

use crate::error::AppResult;
use crate::extract::{AppPath, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::response::{ApiResponse, Empty, EventPayload, EventsPayload, RegistrationPayload};
use crate::services::events::{self, CreateEventRequest, EditEventRequest};
use crate::state::AppState;

/// GET /events
pub async fn list_public(State(state): State<AppState>) -> AppResult<ApiResponse<EventsPayload>> {
    let events = events::list_public(&state).await?;
    Ok(ApiResponse::ok("Events retrieved successfully", EventsPayload { events }))
}

/// GET /events/{id}
///
/// Authentication is optional; drafts and private events are only visible
/// to their host and participants.
pub async fn get_by_id(
    State(state): State<AppState>,
    viewer: Option<AuthUser>,
    AppPath(event_id): AppPath<DbId>,
) -> AppResult<ApiResponse<EventPayload>> {
    let event = events::get_visible(&state, event_id, viewer.map(|v| v.user_id)).await?;
    Ok(ApiResponse::ok("Event retrieved successfully", EventPayload { event }))
}

/// POST /events/new
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateEventRequest>,
) -> AppResult<ApiResponse<EventPayload>> {
    let event = events::create(&state, auth.user_id, input).await?;
    Ok(ApiResponse::created("Event created successfully", EventPayload { event }))
}

/// POST /events/{id}/register
pub async fn register(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(event_id): AppPath<DbId>,
) -> AppResult<ApiResponse<RegistrationPayload>> {
    let (event, user) = events::register(&state, auth.user_id, event_id).await?;
    Ok(ApiResponse::ok(
        format!(
            "User has successfully registered for the {} event",
            event.display_title()
        ),
        RegistrationPayload { event, user },
    ))
}

/// DELETE /events/{id}/leave
pub async fn leave(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(event_id): AppPath<DbId>,
) -> AppResult<ApiResponse<RegistrationPayload>> {
    let (event, user) = events::withdraw(&state, auth.user_id, event_id).await?;
    Ok(ApiResponse::ok(
        format!("You have left the {} event", event.display_title()),
        RegistrationPayload { event, user },
    ))
}

/// PATCH /events/{id}
pub async fn edit(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(event_id): AppPath<DbId>,
    ValidatedJson(input): ValidatedJson<EditEventRequest>,
) -> AppResult<ApiResponse<EventPayload>> {
    let event = events::edit(&state, auth.user_id, event_id, input).await?;
    Ok(ApiResponse::ok("Event updated successfully", EventPayload { event }))
}

/// DELETE /events/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(event_id): AppPath<DbId>,
) -> AppResult<ApiResponse<Empty>> {
    events::delete(&state, auth.user_id, event_id).await?;
    Ok(ApiResponse::message("Event deleted successfully"))
}
