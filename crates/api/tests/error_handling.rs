//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values, so they need
//! neither a server nor a database.

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use gameplan_api::error::AppError;
use gameplan_catalog::CatalogError;
use gameplan_core::error::CoreError;
use gameplan_core::events::{EventError, PublishField};
use http_body_util::BodyExt;
use serde_json::json;
use validator::Validate;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::not_found("Event", 42));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
    assert_eq!(json["message"], "Event not found");
    assert_eq!(json["errors"], json!(["This event does not exist"]));
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("invalid field value".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert_eq!(json["message"], "invalid field value");
    assert_eq!(json["errors"], json!(["invalid field value"]));
}

#[tokio::test]
async fn conflict_error_returns_409() {
    let err = AppError::Core(CoreError::Conflict("Game already in collection".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["message"], "Game already in collection");
}

#[tokio::test]
async fn unauthorized_error_returns_401() {
    let err = AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Invalid or expired token");
}

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::internal("argon2 exploded at /srv/secret");
    assert_matches!(err, AppError::Core(CoreError::Internal(_)));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "An internal error occurred");
    assert!(!json.to_string().contains("/srv/secret"));
}

#[tokio::test]
async fn database_error_returns_500_and_sanitizes_message() {
    let err = AppError::Database(sqlx::Error::PoolTimedOut);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "An internal error occurred");
}

#[tokio::test]
async fn catalog_error_returns_502_without_upstream_body() {
    let err = AppError::from(CatalogError::ApiError {
        status: 500,
        body: "<html>stack trace</html>".into(),
    });
    assert_matches!(err, AppError::Core(CoreError::UpstreamUnavailable(_)));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["message"], "The game catalog is currently unavailable");
    assert!(!json.to_string().contains("stack trace"));
}

// ---------------------------------------------------------------------------
// Event rule violations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn event_rules_map_to_their_statuses() {
    let cases = [
        (EventError::GameNotOwned(7), StatusCode::FORBIDDEN),
        (EventError::NotHost, StatusCode::FORBIDDEN),
        (EventError::HostCannotLeave, StatusCode::FORBIDDEN),
        (EventError::AlreadyRegistered, StatusCode::CONFLICT),
        (EventError::EventFull, StatusCode::CONFLICT),
        (EventError::CapacityBelowParticipants(3), StatusCode::CONFLICT),
        (EventError::NotPublished, StatusCode::BAD_REQUEST),
        (EventError::NotAttending, StatusCode::BAD_REQUEST),
        (EventError::CannotUnpublish, StatusCode::BAD_REQUEST),
        (EventError::EventNotFound(1), StatusCode::NOT_FOUND),
        (EventError::GameNotFound(1), StatusCode::NOT_FOUND),
    ];

    for (err, expected) in cases {
        let message = err.to_string();
        let (status, json) = error_to_response(err.into()).await;
        assert_eq!(status, expected, "{message}");
        assert_eq!(json["message"], message);
    }
}

#[tokio::test]
async fn missing_publish_fields_list_each_field() {
    let err = EventError::MissingPublishFields(vec![PublishField::Title, PublishField::GameLength]);

    let (status, json) = error_to_response(err.into()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Missing required fields for published event");
    assert_eq!(
        json["errors"],
        json!([
            "Missing required title for published event",
            "Missing required game length for published event",
        ])
    );
}

// ---------------------------------------------------------------------------
// Request validation
// ---------------------------------------------------------------------------

#[derive(Validate)]
struct Signup {
    #[validate(email(message = "Please enter a valid email address"))]
    email: String,
    #[validate(length(min = 3, message = "Username must be between 3 and 50 characters"))]
    username: String,
}

#[tokio::test]
async fn single_validation_failure_becomes_the_message() {
    let input = Signup {
        email: "nope".into(),
        username: "ada".into(),
    };
    let err = AppError::from(input.validate().unwrap_err());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Please enter a valid email address");
    assert_eq!(json["errors"], json!(["Please enter a valid email address"]));
}

#[tokio::test]
async fn several_validation_failures_are_listed() {
    let input = Signup {
        email: "nope".into(),
        username: "x".into(),
    };
    let err = AppError::from(input.validate().unwrap_err());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid request data");
    assert_eq!(
        json["errors"],
        json!([
            "Please enter a valid email address",
            "Username must be between 3 and 50 characters",
        ])
    );
}
