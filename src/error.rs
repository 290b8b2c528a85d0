//! Registration errors and how they look on the wire.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::accounts::validation::ValidationError;

pub const DUPLICATE_USERNAME_MESSAGE: &str = r#"An account already exists with that "username""#;

#[derive(Debug, Error)]
pub enum RegisterError {
    /// Payload failed the schema; the message is safe to show the client.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("username {0:?} is already taken")]
    DuplicateUsername(String),

    /// Anything else. Logged where it happens, opaque to the caller.
    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl From<ValidationError> for RegisterError {
    fn from(e: ValidationError) -> Self {
        RegisterError::Validation(e.0)
    }
}

impl RegisterError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RegisterError::Validation(_) | RegisterError::DuplicateUsername(_) => {
                StatusCode::BAD_REQUEST
            }
            RegisterError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RegisterError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            RegisterError::Validation(message) => (
                status,
                Json(json!({ "error": "ValidationError", "message": message })),
            )
                .into_response(),
            RegisterError::DuplicateUsername(username) => (
                status,
                Json(json!({ "error": username, "message": DUPLICATE_USERNAME_MESSAGE })),
            )
                .into_response(),
            RegisterError::Internal(_) => status.into_response(),
        }
    }
}
