use std::fmt::Display;

/// Error taxonomy shared by every layer.
///
/// The `Display` output of each variant is the human-readable message the
/// API puts in its response envelope, so keep it free of internal detail.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str, key: String },

    #[error("{message}")]
    Validation { message: String, errors: Vec<String> },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    CapacityExceeded(String),

    #[error("{0}")]
    UpstreamUnavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl CoreError {
    /// Entity lookup failure keyed by id, username, email, ...
    pub fn not_found(entity: &'static str, key: impl Display) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Single-message validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Validation {
            errors: vec![message.clone()],
            message,
        }
    }

    /// The detail list reported alongside the message.
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::NotFound { entity, .. } => {
                vec![format!("This {} does not exist", entity.to_lowercase())]
            }
            Self::Validation { errors, .. } => errors.clone(),
            other => vec![other.to_string()],
        }
    }
}
