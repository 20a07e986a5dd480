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
    handlers::error::ApiError,
    metrics::track_storage_operation,
    models::{CreateChapterRequest, UpdateChapterRequest},
    storage::AppState,
};

/// GET /api/chapters
pub async fn list_chapters(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let chapters = state
        .storage
        .list_chapters()
        .await
        .map_err(|e| ApiError::storage("Failed to fetch chapters", e))?;
    Ok(Json(chapters))
}

/// GET /api/chapters/subject/:subjectId
pub async fn list_chapters_by_subject(
    State(state): State<Arc<AppState>>,
    Path(subject_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let chapters = state
        .storage
        .list_chapters_by_subject(subject_id)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch chapters", e))?;
    Ok(Json(chapters))
}

/// GET /api/chapters/:id
pub async fn get_chapter(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let chapter = state
        .storage
        .get_chapter(id)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch chapter", e))?;

    match chapter {
        Some(chapter) => Ok(Json(chapter)),
        None => Err(ApiError::not_found("Chapter not found")),
    }
}

/// POST /api/chapters
pub async fn create_chapter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateChapterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::validation)?;

    let chapter = state
        .storage
        .create_chapter(req)
        .await
        .map_err(|e| ApiError::storage("Failed to create chapter", e))?;

    Ok((StatusCode::CREATED, Json(chapter)))
}

/// PUT /api/chapters/:id
pub async fn update_chapter(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateChapterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::validation)?;

    let updated = state
        .storage
        .update_chapter(id, req)
        .await
        .map_err(|e| ApiError::storage("Failed to update chapter", e))?;

    match updated {
        Some(chapter) => Ok(Json(chapter)),
        None => Err(ApiError::not_found("Chapter not found")),
    }
}

/// DELETE /api/chapters/:id - cascades over questions, subtopics and quiz data
pub async fn delete_chapter(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(chapter_id = id, "Deleting chapter with cascade");

    track_storage_operation("cascade_delete", "chapter", state.storage.delete_chapter(id))
        .await
        .map_err(|e| ApiError::storage("Failed to delete chapter", e))?;

    Ok(Json(json!({ "success": true })))
}
