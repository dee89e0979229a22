use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use gameplan_catalog::CatalogError;
use gameplan_core::error::CoreError;
use gameplan_core::events::EventError;

const INTERNAL_MESSAGE: &str = "An internal error occurred";
const UPSTREAM_MESSAGE: &str = "The game catalog is currently unavailable";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the `{status, message, errors}`
/// failure envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `gameplan_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Request DTO failed `validator` checks.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// A lookup that is not keyed by a single entity id came back empty.
    #[error("{0}")]
    NotFound(String),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Unexpected failure. `detail` is logged, never sent to the client.
    pub fn internal(detail: impl Into<String>) -> Self {
        AppError::Core(CoreError::Internal(detail.into()))
    }
}

/// The catalog could not be reached or answered garbage.
impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError::Core(CoreError::UpstreamUnavailable(err.to_string()))
    }
}

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        AppError::Core(err.into())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => {
                let status = match core {
                    CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                    CoreError::Validation { .. } => StatusCode::BAD_REQUEST,
                    CoreError::Conflict(_) | CoreError::CapacityExceeded(_) => {
                        StatusCode::CONFLICT
                    }
                    CoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                    CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
                    CoreError::UpstreamUnavailable(msg) => {
                        tracing::warn!(error = %msg, "Game catalog request failed");
                        return envelope(StatusCode::BAD_GATEWAY, UPSTREAM_MESSAGE.into(), None);
                    }
                    CoreError::Internal(msg) => {
                        tracing::error!(error = %msg, "Internal error");
                        return envelope(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            INTERNAL_MESSAGE.into(),
                            None,
                        );
                    }
                };
                (status, core.to_string(), core.details())
            }

            // --- Database errors ---
            AppError::Database(err) => {
                let (status, message) = classify_sqlx_error(err);
                (status, message.clone(), vec![message])
            }

            // --- HTTP-specific errors ---
            AppError::Validation(errors) => {
                let messages = flatten_validation_errors(errors);
                let message = match messages.as_slice() {
                    [only] => only.clone(),
                    _ => "Invalid request data".to_string(),
                };
                (StatusCode::BAD_REQUEST, message, messages)
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), vec![msg.clone()]),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), vec![msg.clone()]),
        };

        envelope(status, message, Some(errors))
    }
}

/// Build the failure envelope. `errors` defaults to `[message]`.
fn envelope(status: StatusCode, message: String, errors: Option<Vec<String>>) -> Response {
    let errors = errors.unwrap_or_else(|| vec![message.clone()]);
    let body = json!({
        "status": status.as_u16(),
        "message": message,
        "errors": errors,
    });

    (status, axum::Json(body)).into_response()
}

/// Flatten `validator` field errors into sorted human-readable messages.
fn flatten_validation_errors(errors: &validator::ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"))
            })
        })
        .collect();
    messages.sort();
    messages
}

/// Whether `err` is a PostgreSQL unique violation (SQLSTATE `23505`).
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505"))
}

/// Classify a sqlx error into an HTTP status and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Check constraint violations (constraint name starting with `ck_`) map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String) {
    match err {
        sqlx::Error::RowNotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                // PostgreSQL unique constraint violation
                Some("23505") if constraint.starts_with("uq_") => {
                    return (
                        StatusCode::CONFLICT,
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
                // PostgreSQL check constraint violation
                Some("23514") if constraint.starts_with("ck_") => {
                    return (
                        StatusCode::BAD_REQUEST,
                        format!("Value violates check constraint: {constraint}"),
                    );
                }
                _ => {}
            }
            tracing::error!(error = %db_err, "Database error");
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
        }
    }
}
