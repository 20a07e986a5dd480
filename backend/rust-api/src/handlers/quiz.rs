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
    metrics::QUIZ_SESSIONS_TOTAL,
    models::{
        CreateQuizAnswerRequest, CreateQuizSessionRequest, CreateQuizStatRequest,
        UpdateQuizSessionRequest,
    },
    storage::AppState,
};

// Quiz sessions

/// GET /api/quiz-sessions
pub async fn list_quiz_sessions(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let sessions = state
        .storage
        .list_quiz_sessions()
        .await
        .map_err(|e| ApiError::storage("Failed to fetch quiz sessions", e))?;
    Ok(Json(sessions))
}

/// POST /api/quiz-sessions
pub async fn create_quiz_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateQuizSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::validation)?;

    let session = state
        .storage
        .create_quiz_session(req)
        .await
        .map_err(|e| ApiError::storage("Failed to create quiz session", e))?;

    QUIZ_SESSIONS_TOTAL.with_label_values(&["started"]).inc();
    tracing::info!(session_id = session.id, chapter_id = session.chapter_id, "Quiz session started");

    Ok((StatusCode::CREATED, Json(session)))
}

/// PUT /api/quiz-sessions/:id
pub async fn update_quiz_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateQuizSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::validation)?;

    let updated = state
        .storage
        .update_quiz_session(id, req)
        .await
        .map_err(|e| ApiError::storage("Failed to update quiz session", e))?;

    match updated {
        Some(session) => Ok(Json(session)),
        None => Err(ApiError::not_found("Quiz session not found")),
    }
}

/// DELETE /api/quiz-sessions/:id
pub async fn delete_quiz_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .storage
        .delete_quiz_session(id)
        .await
        .map_err(|e| ApiError::storage("Failed to delete quiz session", e))?;

    Ok(Json(json!({ "success": true })))
}

// Quiz answers

/// GET /api/quiz-answers
pub async fn list_quiz_answers(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let answers = state
        .storage
        .list_quiz_answers()
        .await
        .map_err(|e| ApiError::storage("Failed to fetch quiz answers", e))?;
    Ok(Json(answers))
}

/// GET /api/quiz-answers/session/:sessionId
pub async fn list_quiz_answers_by_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let answers = state
        .storage
        .list_quiz_answers_by_session(session_id)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch quiz answers", e))?;
    Ok(Json(answers))
}

/// POST /api/quiz-answers
pub async fn create_quiz_answer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateQuizAnswerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::validation)?;

    let answer = state
        .storage
        .create_quiz_answer(req)
        .await
        .map_err(|e| ApiError::storage("Failed to create quiz answer", e))?;

    Ok((StatusCode::CREATED, Json(answer)))
}

// Quiz stats

/// GET /api/quiz-stats
pub async fn list_quiz_stats(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state
        .storage
        .list_quiz_stats()
        .await
        .map_err(|e| ApiError::storage("Failed to fetch quiz stats", e))?;
    Ok(Json(stats))
}

/// POST /api/quiz-stats
pub async fn create_quiz_stat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateQuizStatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::validation)?;

    let stat = state
        .storage
        .create_quiz_stat(req)
        .await
        .map_err(|e| ApiError::storage("Failed to create quiz stat", e))?;

    Ok((StatusCode::CREATED, Json(stat)))
}
