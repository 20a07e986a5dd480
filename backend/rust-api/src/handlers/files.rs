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
    models::{CreateFileRequest, CreateFolderRequest},
    storage::AppState,
};

// Files

/// GET /api/files
pub async fn list_files(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let files = state
        .storage
        .list_files()
        .await
        .map_err(|e| ApiError::storage("Failed to fetch files", e))?;
    Ok(Json(files))
}

/// POST /api/files
pub async fn create_file(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateFileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::validation)?;

    let file = state
        .storage
        .create_file(req)
        .await
        .map_err(|e| ApiError::storage("Failed to create file", e))?;

    Ok((StatusCode::CREATED, Json(file)))
}

/// DELETE /api/files/:id
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .storage
        .delete_file(id)
        .await
        .map_err(|e| ApiError::storage("Failed to delete file", e))?;

    Ok(Json(json!({ "success": true })))
}

// Folders

/// GET /api/folders
pub async fn list_folders(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let folders = state
        .storage
        .list_folders()
        .await
        .map_err(|e| ApiError::storage("Failed to fetch folders", e))?;
    Ok(Json(folders))
}

/// POST /api/folders
pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateFolderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::validation)?;

    let folder = state
        .storage
        .create_folder(req)
        .await
        .map_err(|e| ApiError::storage("Failed to create folder", e))?;

    Ok((StatusCode::CREATED, Json(folder)))
}

/// DELETE /api/folders/:id
pub async fn delete_folder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .storage
        .delete_folder(id)
        .await
        .map_err(|e| ApiError::storage("Failed to delete folder", e))?;

    Ok(Json(json!({ "success": true })))
}
