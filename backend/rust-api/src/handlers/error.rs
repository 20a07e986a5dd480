use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::storage::StorageError;

/// Error shape every failing endpoint answers with: `{"error": "..."}` plus
/// 400 for rejected input, 404 for missing rows, 500 for storage failures.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    /// Payload validation failure; the validator message carries field detail.
    pub fn validation(errors: validator::ValidationErrors) -> Self {
        Self::bad_request(errors.to_string())
    }

    /// Maps a storage failure. Bad references and constraint violations keep
    /// their own message as a 400; everything else is logged in full and
    /// answered with the generic `public_message` only.
    pub fn storage(public_message: &str, err: StorageError) -> Self {
        match err {
            StorageError::InvalidReference(message) | StorageError::Constraint(message) => {
                Self::bad_request(message)
            }
            other => {
                tracing::error!("{}: {}", public_message, other);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: public_message.to_string(),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
