//! Account store: registration, login, password recovery and profile.

use serde::Deserialize;
use validator::Validate;
use gameplan_core::error::CoreError;
use gameplan_core::types::DbId;
use gameplan_db::models::event::Event;
use gameplan_db::models::game::Game;
use gameplan_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use gameplan_db::repositories::{EventRepo, GameRepo, UserRepo};

use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::auth::recovery::{hash_answers, normalize_answer, RecoveryChallenge, SecurityAnswers, SecurityQuestions};
use crate::error::{is_unique_violation, AppError, AppResult};
use crate::query::non_blank;
use crate::state::AppState;

const DUPLICATE_ACCOUNT: &str = "This email address or username is already in use!";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /user/register`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,
    #[validate(length(max = 100, message = "Location must be at most 100 characters"))]
    pub location: Option<String>,
    #[validate(length(max = 100, message = "Bio must be at most 100 characters"))]
    pub bio: Option<String>,
    #[validate(length(min = 1, message = "All three security questions must be answered"))]
    pub security_question_one: String,
    #[validate(length(min = 1, message = "All three security questions must be answered"))]
    pub security_question_two: String,
    #[validate(length(min = 1, message = "All three security questions must be answered"))]
    pub security_question_three: String,
}

/// Request body for `POST /user/login`. Both fields are checked by hand so
/// that a missing one gets the login-specific message.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Request body for `POST /user/password-reset`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    pub security_question_one: String,
    pub security_question_two: String,
    pub security_question_three: String,
    pub password: String,
}

/// Request body for `PATCH /user/update`. Absent fields are kept.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: Option<String>,
    #[validate(length(max = 100, message = "Location must be at most 100 characters"))]
    pub location: Option<String>,
    #[validate(length(max = 100, message = "Bio must be at most 100 characters"))]
    pub bio: Option<String>,
    pub password: Option<String>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Create an account and sign the caller in.
pub async fn register(state: &AppState, input: RegisterRequest) -> AppResult<(String, UserResponse)> {
    validate_password_strength(&input.password).map_err(CoreError::validation)?;

    let answers = [
        input.security_question_one,
        input.security_question_two,
        input.security_question_three,
    ];
    if answers.iter().any(|a| normalize_answer(a).is_empty()) {
        return Err(CoreError::validation("All three security questions must be answered").into());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::internal(format!("Password hashing error: {e}")))?;
    let security_answer_hashes = hash_answers(&answers)
        .map_err(|e| AppError::internal(format!("Answer hashing error: {e}")))?;

    let create = CreateUser {
        email: input.email,
        username: input.username,
        password_hash,
        security_answer_hashes,
        location: input.location,
        bio: input.bio,
    };
    let user = UserRepo::create(&state.pool, &create)
        .await
        .map_err(duplicate_account)?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    let token = issue_token(state, user.id)?;
    Ok((token, user.into()))
}

/// Verify credentials and issue a token.
pub async fn login(state: &AppState, input: LoginRequest) -> AppResult<(String, UserResponse)> {
    let (Some(username), Some(password)) = (
        non_blank(input.username.as_deref()),
        input.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(CoreError::validation("Missing login details").into());
    };

    let user = UserRepo::find_by_username(&state.pool, username)
        .await?
        .ok_or_else(|| CoreError::not_found("User", username))?;

    let password_valid = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::internal(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected: incorrect password");
        return Err(CoreError::Unauthorized("Incorrect password".into()).into());
    }

    tracing::info!(user_id = user.id, username = %user.username, "User logged in");

    let token = issue_token(state, user.id)?;
    Ok((token, user.into()))
}

/// Reset a password after the recovery challenge passes.
pub async fn reset_password(state: &AppState, input: PasswordResetRequest) -> AppResult<()> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| CoreError::not_found("User", &input.email))?;

    let answers = SecurityAnswers([
        input.security_question_one,
        input.security_question_two,
        input.security_question_three,
    ]);
    let passed = SecurityQuestions
        .verify(&user, &answers)
        .map_err(|e| AppError::internal(format!("Answer verification error: {e}")))?;
    if !passed {
        tracing::info!(user_id = user.id, "Password reset rejected: wrong answers");
        return Err(CoreError::Unauthorized("Incorrect security details provided".into()).into());
    }

    validate_password_strength(&input.password).map_err(CoreError::validation)?;
    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::internal(format!("Password hashing error: {e}")))?;

    if !UserRepo::update_password(&state.pool, user.id, &password_hash).await? {
        return Err(CoreError::not_found("User", user.id).into());
    }

    tracing::info!(user_id = user.id, "Password reset");
    Ok(())
}

/// Apply a partial profile update.
pub async fn update(
    state: &AppState,
    user_id: DbId,
    input: UpdateUserRequest,
) -> AppResult<UserResponse> {
    let password_hash = match input.password.as_deref() {
        Some(password) => {
            validate_password_strength(password).map_err(CoreError::validation)?;
            Some(
                hash_password(password)
                    .map_err(|e| AppError::internal(format!("Password hashing error: {e}")))?,
            )
        }
        None => None,
    };

    let update = UpdateUser {
        email: input.email,
        username: input.username,
        location: input.location,
        bio: input.bio,
        password_hash,
    };
    let user = UserRepo::update(&state.pool, user_id, &update)
        .await
        .map_err(duplicate_account)?
        .ok_or_else(|| CoreError::not_found("User", user_id))?;

    tracing::info!(user_id, "User updated");
    Ok(user.into())
}

pub async fn profile(state: &AppState, user_id: DbId) -> AppResult<UserResponse> {
    Ok(load_user(state, user_id).await?.into())
}

/// Delete the account. Hosted events, their participant rows, the
/// caller's own participant rows and the collection go with it.
pub async fn delete(state: &AppState, user_id: DbId) -> AppResult<()> {
    if !UserRepo::delete(&state.pool, user_id).await? {
        return Err(CoreError::not_found("User", user_id).into());
    }
    tracing::info!(user_id, "User deleted");
    Ok(())
}

/// Hosted events (drafts included) or attended events.
pub async fn events(state: &AppState, user_id: DbId, hosted: bool) -> AppResult<Vec<Event>> {
    load_user(state, user_id).await?;
    let events = if hosted {
        EventRepo::list_hosted_by(&state.pool, user_id).await?
    } else {
        EventRepo::list_attended_by(&state.pool, user_id).await?
    };
    Ok(events)
}

/// Owned games, optionally filtered by a name substring.
pub async fn collection(
    state: &AppState,
    user_id: DbId,
    search: Option<&str>,
) -> AppResult<Vec<Game>> {
    load_user(state, user_id).await?;
    Ok(GameRepo::list_owned(&state.pool, user_id, non_blank(search)).await?)
}

/// Remove a game from the collection, returning the confirmation message.
pub async fn remove_game(state: &AppState, user_id: DbId, game_id: DbId) -> AppResult<String> {
    let user = load_user(state, user_id).await?;
    let game = GameRepo::find_by_id(&state.pool, game_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Game", game_id))?;

    if !GameRepo::remove_from_collection(&state.pool, user_id, game_id).await? {
        return Err(CoreError::validation("Game not in collection").into());
    }

    tracing::info!(user_id, game_id, "Game removed from collection");
    Ok(format!(
        "Game: {} has been removed from {}'s collection successfully",
        game.name, user.username
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load the caller, failing with 404 when their account is gone.
pub async fn load_user(state: &AppState, user_id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", user_id).into())
}

fn issue_token(state: &AppState, user_id: DbId) -> AppResult<String> {
    generate_token(user_id, &state.config.jwt)
        .map_err(|e| AppError::internal(format!("Token generation error: {e}")))
}

fn duplicate_account(err: sqlx::Error) -> AppError {
    if is_unique_violation(&err) {
        CoreError::Conflict(DUPLICATE_ACCOUNT.into()).into()
    } else {
        err.into()
    }
}
