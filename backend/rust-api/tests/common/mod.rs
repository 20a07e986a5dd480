use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use studyhub_api::{config::Config, create_router, storage::AppState};

/// Builds the full application over a fresh in-memory backend. Every test
/// gets its own state, so tests never interfere with each other.
pub async fn create_test_app() -> Router {
    // Initialize tracing for tests
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let config = Config {
        database_url: "memory://".to_string(),
        database_name: "studyhub-test".to_string(),
        port: 0,
    };

    let app_state = Arc::new(
        AppState::new(config)
            .await
            .expect("Failed to initialize test app state"),
    );

    create_router(app_state)
}

/// Sends one request through the router and returns status plus parsed body.
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let is_json = response
        .headers()
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    let value = if is_json && !bytes.is_empty() {
        serde_json::from_slice(&bytes).expect("response body is not JSON")
    } else {
        Value::Null
    };

    (status, value)
}

/// Creates a subject and returns its id.
#[allow(dead_code)]
pub async fn seed_subject(app: &Router, name: &str) -> i64 {
    let (status, body) = request(
        app,
        "POST",
        "/api/subjects",
        Some(serde_json::json!({ "name": name, "color": "#3B82F6" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "seed subject failed: {}", body);
    body["id"].as_i64().unwrap()
}

/// Creates a chapter under the given subject and returns its id.
#[allow(dead_code)]
pub async fn seed_chapter(app: &Router, subject_id: i64, title: &str) -> i64 {
    let (status, body) = request(
        app,
        "POST",
        "/api/chapters",
        Some(serde_json::json!({
            "subjectId": subject_id,
            "title": title,
            "description": "Seeded chapter",
            "difficulty": "Beginner"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "seed chapter failed: {}", body);
    body["id"].as_i64().unwrap()
}

/// Creates a question in the given chapter and returns its id.
#[allow(dead_code)]
pub async fn seed_question(app: &Router, chapter_id: i64) -> i64 {
    let (status, body) = request(
        app,
        "POST",
        "/api/questions",
        Some(serde_json::json!({
            "chapterId": chapter_id,
            "question": "What is the SI unit of force?",
            "options": ["Joule", "Newton", "Watt", "Pascal"],
            "correctAnswer": 1,
            "explanation": "Force is measured in newtons.",
            "difficulty": "easy"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "seed question failed: {}", body);
    body["id"].as_i64().unwrap()
}
