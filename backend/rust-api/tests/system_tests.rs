use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{create_test_app, request, seed_chapter, seed_question, seed_subject};

#[tokio::test]
async fn test_health_check_reports_storage() {
    let app = create_test_app().await;

    let (status, body) = request(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "studyhub-api");
    assert_eq!(body["dependencies"]["storage"]["status"], "healthy");
}

#[tokio::test]
async fn test_metrics_endpoint_renders_prometheus_text() {
    let app = create_test_app().await;

    // The health request below is itself counted by the metrics middleware.
    request(&app, "GET", "/health", None).await;

    let (status, _) = request(&app, "GET", "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_clear_all_resets_every_entity() {
    let app = create_test_app().await;

    let subject_id = seed_subject(&app, "Physics").await;
    let chapter_id = seed_chapter(&app, subject_id, "Mechanics").await;
    seed_question(&app, chapter_id).await;
    request(
        &app,
        "POST",
        "/api/messages",
        Some(json!({ "text": "hello", "sender": "student" })),
    )
    .await;
    request(
        &app,
        "POST",
        "/api/quiz-stats",
        Some(json!({
            "chapterTitle": "Mechanics",
            "subjectTitle": "Physics",
            "score": 1,
            "totalQuestions": 1,
            "percentage": 100.0
        })),
    )
    .await;

    let (status, body) = request(&app, "DELETE", "/api/clear-all", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    for uri in [
        "/api/subjects",
        "/api/chapters",
        "/api/questions",
        "/api/messages",
        "/api/quiz-stats",
    ] {
        let (status, listed) = request(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(
            listed.as_array().unwrap().is_empty(),
            "{} should be empty after clear-all",
            uri
        );
    }
}

#[tokio::test]
async fn test_ids_keep_incrementing_after_clear_all() {
    let app = create_test_app().await;

    let first = seed_subject(&app, "Physics").await;
    request(&app, "DELETE", "/api/clear-all", None).await;
    let second = seed_subject(&app, "Biology").await;

    // Sequences survive a reset, like database serials.
    assert!(second > first);
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = create_test_app().await;

    let (status, _) = request(&app, "GET", "/api/unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
