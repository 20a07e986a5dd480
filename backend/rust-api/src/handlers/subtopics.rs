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
    handlers::error::ApiError, models::CreateSubtopicRequest, storage::AppState,
};

/// GET /api/subtopics
pub async fn list_subtopics(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let subtopics = state
        .storage
        .list_subtopics()
        .await
        .map_err(|e| ApiError::storage("Failed to fetch subtopics", e))?;
    Ok(Json(subtopics))
}

/// GET /api/subtopics/chapter/:chapterId
pub async fn list_subtopics_by_chapter(
    State(state): State<Arc<AppState>>,
    Path(chapter_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let subtopics = state
        .storage
        .list_subtopics_by_chapter(chapter_id)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch subtopics", e))?;
    Ok(Json(subtopics))
}

/// POST /api/subtopics
pub async fn create_subtopic(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSubtopicRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::validation)?;

    let subtopic = state
        .storage
        .create_subtopic(req)
        .await
        .map_err(|e| ApiError::storage("Failed to create subtopic", e))?;

    Ok((StatusCode::CREATED, Json(subtopic)))
}

/// DELETE /api/subtopics/:id
pub async fn delete_subtopic(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .storage
        .delete_subtopic(id)
        .await
        .map_err(|e| ApiError::storage("Failed to delete subtopic", e))?;

    Ok(Json(json!({ "success": true })))
}
