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
    models::{CreateScheduleEventRequest, CreateStudySessionRequest, UpdateScheduleEventRequest},
    storage::AppState,
};

// Study sessions

/// GET /api/study-sessions
pub async fn list_study_sessions(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let sessions = state
        .storage
        .list_study_sessions()
        .await
        .map_err(|e| ApiError::storage("Failed to fetch study sessions", e))?;
    Ok(Json(sessions))
}

/// POST /api/study-sessions
pub async fn create_study_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateStudySessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::validation)?;

    let session = state
        .storage
        .create_study_session(req)
        .await
        .map_err(|e| ApiError::storage("Failed to create study session", e))?;

    Ok((StatusCode::CREATED, Json(session)))
}

// Schedule events

/// GET /api/schedule-events
pub async fn list_schedule_events(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let events = state
        .storage
        .list_schedule_events()
        .await
        .map_err(|e| ApiError::storage("Failed to fetch schedule events", e))?;
    Ok(Json(events))
}

/// POST /api/schedule-events
pub async fn create_schedule_event(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateScheduleEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::validation)?;

    let event = state
        .storage
        .create_schedule_event(req)
        .await
        .map_err(|e| ApiError::storage("Failed to create schedule event", e))?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// PUT /api/schedule-events/:id
pub async fn update_schedule_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateScheduleEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::validation)?;

    let updated = state
        .storage
        .update_schedule_event(id, req)
        .await
        .map_err(|e| ApiError::storage("Failed to update schedule event", e))?;

    match updated {
        Some(event) => Ok(Json(event)),
        None => Err(ApiError::not_found("Schedule event not found")),
    }
}

/// DELETE /api/schedule-events/:id
pub async fn delete_schedule_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .storage
        .delete_schedule_event(id)
        .await
        .map_err(|e| ApiError::storage("Failed to delete schedule event", e))?;

    Ok(Json(json!({ "success": true })))
}
