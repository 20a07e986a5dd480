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
    metrics::{track_storage_operation, QUESTIONS_CREATED_TOTAL},
    models::{BulkCreateQuestionsRequest, CreateQuestionRequest, UpdateQuestionRequest},
    storage::AppState,
};

/// GET /api/questions
pub async fn list_questions(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let questions = state
        .storage
        .list_questions()
        .await
        .map_err(|e| ApiError::storage("Failed to fetch questions", e))?;
    Ok(Json(questions))
}

/// GET /api/questions/chapter/:chapterId
pub async fn list_questions_by_chapter(
    State(state): State<Arc<AppState>>,
    Path(chapter_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let questions = state
        .storage
        .list_questions_by_chapter(chapter_id)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch questions", e))?;
    Ok(Json(questions))
}

/// GET /api/questions/subtopic/:subtopicId
pub async fn list_questions_by_subtopic(
    State(state): State<Arc<AppState>>,
    Path(subtopic_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let questions = state
        .storage
        .list_questions_by_subtopic(subtopic_id)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch questions", e))?;
    Ok(Json(questions))
}

/// POST /api/questions
pub async fn create_question(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::validation)?;

    let question = state
        .storage
        .create_question(req)
        .await
        .map_err(|e| ApiError::storage("Failed to create question", e))?;

    QUESTIONS_CREATED_TOTAL.with_label_values(&["single"]).inc();

    Ok((StatusCode::CREATED, Json(question)))
}

/// POST /api/questions/bulk - imports a batch of questions into one chapter
pub async fn bulk_create_questions(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BulkCreateQuestionsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::validation)?;

    tracing::info!(
        chapter_id = req.chapter_id,
        count = req.questions.len(),
        "Bulk creating questions"
    );

    let questions = track_storage_operation(
        "bulk_create",
        "question",
        state.storage.bulk_create_questions(req.chapter_id, req.questions),
    )
    .await
    .map_err(|e| ApiError::storage("Failed to create questions", e))?;

    QUESTIONS_CREATED_TOTAL
        .with_label_values(&["bulk"])
        .inc_by(questions.len() as u64);

    Ok((StatusCode::CREATED, Json(questions)))
}

/// PUT /api/questions/:id
pub async fn update_question(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateQuestionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::validation)?;

    let updated = state
        .storage
        .update_question(id, req)
        .await
        .map_err(|e| ApiError::storage("Failed to update question", e))?;

    match updated {
        Some(question) => Ok(Json(question)),
        None => Err(ApiError::not_found("Question not found")),
    }
}

/// DELETE /api/questions/:id
pub async fn delete_question(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .storage
        .delete_question(id)
        .await
        .map_err(|e| ApiError::storage("Failed to delete question", e))?;

    Ok(Json(json!({ "success": true })))
}
