use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::{
    handlers::error::ApiError, metrics::track_storage_operation, models::CreateMessageRequest,
    storage::AppState,
};

/// GET /api/messages
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let messages = state
        .storage
        .list_messages()
        .await
        .map_err(|e| ApiError::storage("Failed to fetch messages", e))?;
    Ok(Json(messages))
}

/// POST /api/messages
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::validation)?;

    let message = state
        .storage
        .create_message(req)
        .await
        .map_err(|e| ApiError::storage("Failed to create message", e))?;

    Ok((StatusCode::CREATED, Json(message)))
}

/// DELETE /api/messages/:id
pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .storage
        .delete_message(id)
        .await
        .map_err(|e| ApiError::storage("Failed to delete message", e))?;

    Ok(Json(json!({ "success": true })))
}

/// DELETE /api/messages - empties the whole conversation
pub async fn clear_messages(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    track_storage_operation("clear", "message", state.storage.clear_messages())
        .await
        .map_err(|e| ApiError::storage("Failed to clear messages", e))?;

    Ok(Json(json!({ "success": true })))
}
