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
    models::{CreateSubjectRequest, UpdateSubjectRequest},
    storage::AppState,
};

/// GET /api/subjects
pub async fn list_subjects(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let subjects = state
        .storage
        .list_subjects()
        .await
        .map_err(|e| ApiError::storage("Failed to fetch subjects", e))?;
    Ok(Json(subjects))
}

/// POST /api/subjects
pub async fn create_subject(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSubjectRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::validation)?;

    let subject = state
        .storage
        .create_subject(req)
        .await
        .map_err(|e| ApiError::storage("Failed to create subject", e))?;

    Ok((StatusCode::CREATED, Json(subject)))
}

/// PUT /api/subjects/:id
pub async fn update_subject(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateSubjectRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::validation)?;

    let updated = state
        .storage
        .update_subject(id, req)
        .await
        .map_err(|e| ApiError::storage("Failed to update subject", e))?;

    match updated {
        Some(subject) => Ok(Json(subject)),
        None => Err(ApiError::not_found("Subject not found")),
    }
}

/// DELETE /api/subjects/:id - cascades over the subject's chapters
pub async fn delete_subject(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(subject_id = id, "Deleting subject with cascade");

    track_storage_operation("cascade_delete", "subject", state.storage.delete_subject(id))
        .await
        .map_err(|e| ApiError::storage("Failed to delete subject", e))?;

    Ok(Json(json!({ "success": true })))
}
