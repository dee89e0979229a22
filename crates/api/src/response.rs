//! Shared response envelope types for API handlers.
//!
//! Every success response is `{ "status": u16, "message": String, ...payload }`.
//! The payload struct's fields are flattened into the top level, so a handler
//! returning [`EventPayload`] produces `{status, message, event}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use gameplan_db::models::event::Event;
use gameplan_db::models::user::UserResponse;

/// Standard success envelope.
///
/// # Example
///
/// ```ignore
/// Ok(ApiResponse::ok("Event retrieved successfully", EventPayload { event }))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip)]
    code: StatusCode,
    pub status: u16,
    pub message: String,
    #[serde(flatten)]
    pub payload: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(code: StatusCode, message: impl Into<String>, payload: T) -> Self {
        Self {
            code,
            status: code.as_u16(),
            message: message.into(),
            payload,
        }
    }

    /// 200 OK.
    pub fn ok(message: impl Into<String>, payload: T) -> Self {
        Self::new(StatusCode::OK, message, payload)
    }

    /// 201 Created.
    pub fn created(message: impl Into<String>, payload: T) -> Self {
        Self::new(StatusCode::CREATED, message, payload)
    }
}

impl ApiResponse<Empty> {
    /// 200 OK with no payload beyond the message.
    pub fn message(message: impl Into<String>) -> Self {
        Self::ok(message, Empty {})
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.code, Json(self)).into_response()
    }
}

/// No payload.
#[derive(Debug, Serialize)]
pub struct Empty {}

#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserPayload {
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct EventPayload {
    pub event: Event,
}

#[derive(Debug, Serialize)]
pub struct EventsPayload {
    pub events: Vec<Event>,
}

/// Both sides of a membership change.
#[derive(Debug, Serialize)]
pub struct RegistrationPayload {
    pub event: Event,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct GamePayload<G: Serialize> {
    pub game: G,
}

#[derive(Debug, Serialize)]
pub struct GamesPayload<G: Serialize> {
    pub games: G,
}
