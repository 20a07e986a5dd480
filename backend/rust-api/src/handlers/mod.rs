use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::handlers::error::ApiError;
use crate::metrics::{self, track_storage_operation};
use crate::storage::AppState;

pub mod chapters;
pub mod error;
pub mod files;
pub mod messages;
pub mod planner;
pub mod questions;
pub mod quiz;
pub mod subjects;
pub mod subtopics;

/// GET /health - reports storage connectivity alongside service metadata
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let storage_health = check_storage(&state).await;
    let healthy = storage_health.get("status").and_then(|v| v.as_str()) == Some("healthy");

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(json!({
            "status": if healthy { "healthy" } else { "degraded" },
            "service": "studyhub-api",
            "version": env!("CARGO_PKG_VERSION"),
            "dependencies": { "storage": storage_health }
        })),
    )
}

async fn check_storage(state: &AppState) -> serde_json::Map<String, serde_json::Value> {
    let mut result = serde_json::Map::new();

    match tokio::time::timeout(std::time::Duration::from_secs(1), state.storage.ping()).await {
        Ok(Ok(())) => {
            result.insert("status".to_string(), json!("healthy"));
        }
        Ok(Err(e)) => {
            result.insert("status".to_string(), json!("unhealthy"));
            result.insert("error".to_string(), json!(format!("Storage error: {}", e)));
        }
        Err(_) => {
            result.insert("status".to_string(), json!("unhealthy"));
            result.insert("error".to_string(), json!("Storage timeout after 1s"));
        }
    }

    result
}

/// GET /metrics
pub async fn metrics_handler() -> impl IntoResponse {
    match metrics::render_metrics() {
        Ok(metrics_text) => (StatusCode::OK, metrics_text),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to render metrics: {}", e),
        ),
    }
}

/// DELETE /api/clear-all - wipes every entity, children before parents
pub async fn clear_all(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    tracing::warn!("Clearing all data");

    track_storage_operation("clear", "all", state.storage.clear_all())
        .await
        .map_err(|e| ApiError::storage("Failed to clear all data", e))?;

    Ok(Json(json!({ "success": true })))
}
