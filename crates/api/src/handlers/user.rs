//! Handlers for the `/user` resource.

use axum::extract::State;
use gameplan_core::types::DbId;
use gameplan_db::models::game::Game;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::query::{CollectionParams, HostedParams};
use crate::response::{ApiResponse, AuthPayload, Empty, EventsPayload, GamesPayload, UserPayload};
use crate::services::accounts::{
    self, LoginRequest, PasswordResetRequest, RegisterRequest, UpdateUserRequest,
};
use crate::state::AppState;

/// POST /user/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> AppResult<ApiResponse<AuthPayload>> {
    let (token, user) = accounts::register(&state, input).await?;
    Ok(ApiResponse::created(
        "User registered successfully",
        AuthPayload { token, user },
    ))
}

/// POST /user/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<ApiResponse<AuthPayload>> {
    let (token, user) = accounts::login(&state, input).await?;
    Ok(ApiResponse::ok(
        format!("{} has logged in!", user.username),
        AuthPayload { token, user },
    ))
}

/// POST /user/password-reset
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<PasswordResetRequest>,
) -> AppResult<ApiResponse<Empty>> {
    accounts::reset_password(&state, input).await?;
    Ok(ApiResponse::message("Password reset successfully"))
}

/// PATCH /user/update
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<UpdateUserRequest>,
) -> AppResult<ApiResponse<UserPayload>> {
    let user = accounts::update(&state, auth.user_id, input).await?;
    Ok(ApiResponse::ok("User details have been updated!", UserPayload { user }))
}

/// GET /user
pub async fn profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<ApiResponse<UserPayload>> {
    let user = accounts::profile(&state, auth.user_id).await?;
    Ok(ApiResponse::ok("User retrieved successfully", UserPayload { user }))
}

/// DELETE /user
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<ApiResponse<Empty>> {
    accounts::delete(&state, auth.user_id).await?;
    Ok(ApiResponse::message("User deleted successfully"))
}

/// GET /user/events?hosted=
pub async fn events(
    State(state): State<AppState>,
    auth: AuthUser,
    AppQuery(params): AppQuery<HostedParams>,
) -> AppResult<ApiResponse<EventsPayload>> {
    let events = accounts::events(&state, auth.user_id, params.hosted).await?;
    Ok(ApiResponse::ok("Events retrieved successfully", EventsPayload { events }))
}

/// GET /user/collection?search=
pub async fn collection(
    State(state): State<AppState>,
    auth: AuthUser,
    AppQuery(params): AppQuery<CollectionParams>,
) -> AppResult<ApiResponse<GamesPayload<Vec<Game>>>> {
    let games = accounts::collection(&state, auth.user_id, params.search.as_deref()).await?;
    Ok(ApiResponse::ok("Games retrieved successfully", GamesPayload { games }))
}

/// DELETE /user/collection/{id}
pub async fn remove_game(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(game_id): AppPath<DbId>,
) -> AppResult<ApiResponse<Empty>> {
    let message = accounts::remove_game(&state, auth.user_id, game_id).await?;
    Ok(ApiResponse::message(message))
}
