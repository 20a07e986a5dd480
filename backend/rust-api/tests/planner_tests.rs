use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{create_test_app, request};

#[tokio::test]
async fn test_study_session_round_trip() {
    let app = create_test_app().await;

    // Study sessions reference chapters loosely; no chapter has to exist.
    let (status, created) = request(
        &app,
        "POST",
        "/api/study-sessions",
        Some(json!({ "chapterId": 12, "duration": 45 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["duration"], 45);
    assert!(created["date"].is_string());

    let (status, listed) = request(&app, "GET", "/api/study-sessions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_study_session_rejects_zero_duration() {
    let app = create_test_app().await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/study-sessions",
        Some(json!({ "chapterId": 12, "duration": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_schedule_event_crud() {
    let app = create_test_app().await;

    let (status, created) = request(
        &app,
        "POST",
        "/api/schedule-events",
        Some(json!({
            "title": "Mechanics revision",
            "description": "Chapters 1-3",
            "date": "2025-06-01T00:00:00Z",
            "time": "14:30",
            "type": "revision"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["type"], "revision");
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = request(
        &app,
        "PUT",
        &format!("/api/schedule-events/{}", id),
        Some(json!({ "time": "16:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["time"], "16:00");
    assert_eq!(updated["title"], "Mechanics revision");

    let (status, _) = request(&app, "DELETE", &format!("/api/schedule-events/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = request(&app, "GET", "/api/schedule-events", None).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_missing_schedule_event_returns_404() {
    let app = create_test_app().await;

    let (status, body) = request(
        &app,
        "PUT",
        "/api/schedule-events/5",
        Some(json!({ "time": "10:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Schedule event not found");
}
