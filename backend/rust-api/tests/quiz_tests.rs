use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{create_test_app, request, seed_chapter, seed_question, seed_subject};

#[tokio::test]
async fn test_create_quiz_session_defaults_and_timestamp() {
    let app = create_test_app().await;
    let subject_id = seed_subject(&app, "Physics").await;
    let chapter_id = seed_chapter(&app, subject_id, "Mechanics").await;

    let (status, session) = request(
        &app,
        "POST",
        "/api/quiz-sessions",
        Some(json!({ "chapterId": chapter_id, "totalQuestions": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(session["currentQuestion"], 0);
    assert_eq!(session["score"], 0);
    assert_eq!(session["isCompleted"], false);
    assert!(session["createdAt"].is_string());
}

#[tokio::test]
async fn test_create_quiz_session_requires_existing_chapter() {
    let app = create_test_app().await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/quiz-sessions",
        Some(json!({ "chapterId": 3, "totalQuestions": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_quiz_session_score_cannot_exceed_total_questions() {
    let app = create_test_app().await;
    let subject_id = seed_subject(&app, "Physics").await;
    let chapter_id = seed_chapter(&app, subject_id, "Mechanics").await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/quiz-sessions",
        Some(json!({ "chapterId": chapter_id, "totalQuestions": 5, "score": 6 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("exceeds"));
}

#[tokio::test]
async fn test_complete_quiz_session_via_update() {
    let app = create_test_app().await;
    let subject_id = seed_subject(&app, "Physics").await;
    let chapter_id = seed_chapter(&app, subject_id, "Mechanics").await;

    let (_, session) = request(
        &app,
        "POST",
        "/api/quiz-sessions",
        Some(json!({ "chapterId": chapter_id, "totalQuestions": 2 })),
    )
    .await;
    let session_id = session["id"].as_i64().unwrap();

    let (status, updated) = request(
        &app,
        "PUT",
        &format!("/api/quiz-sessions/{}", session_id),
        Some(json!({ "currentQuestion": 2, "score": 2, "isCompleted": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["isCompleted"], true);
    assert_eq!(updated["score"], 2);

    // The rejected merge path: score above the stored total.
    let (status, _) = request(
        &app,
        "PUT",
        &format!("/api/quiz-sessions/{}", session_id),
        Some(json!({ "score": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_quiz_answers_by_session() {
    let app = create_test_app().await;
    let subject_id = seed_subject(&app, "Physics").await;
    let chapter_id = seed_chapter(&app, subject_id, "Mechanics").await;
    let question_id = seed_question(&app, chapter_id).await;

    let (_, first) = request(
        &app,
        "POST",
        "/api/quiz-sessions",
        Some(json!({ "chapterId": chapter_id, "totalQuestions": 1 })),
    )
    .await;
    let (_, second) = request(
        &app,
        "POST",
        "/api/quiz-sessions",
        Some(json!({ "chapterId": chapter_id, "totalQuestions": 1 })),
    )
    .await;
    let first_id = first["id"].as_i64().unwrap();
    let second_id = second["id"].as_i64().unwrap();

    for (session_id, selected, correct) in [(first_id, 1, true), (second_id, 0, false)] {
        let (status, _) = request(
            &app,
            "POST",
            "/api/quiz-answers",
            Some(json!({
                "sessionId": session_id,
                "questionId": question_id,
                "selectedAnswer": selected,
                "isCorrect": correct
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, listed) = request(
        &app,
        "GET",
        &format!("/api/quiz-answers/session/{}", first_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["isCorrect"], true);
}

#[tokio::test]
async fn test_quiz_answer_requires_existing_session_and_question() {
    let app = create_test_app().await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/quiz-answers",
        Some(json!({
            "sessionId": 1,
            "questionId": 1,
            "selectedAnswer": 0,
            "isCorrect": false
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_quiz_stats_do_not_require_live_references() {
    let app = create_test_app().await;

    // Stats are denormalized snapshots: no chapter or subject has to exist.
    let (status, stat) = request(
        &app,
        "POST",
        "/api/quiz-stats",
        Some(json!({
            "chapterTitle": "Mechanics",
            "subjectTitle": "Physics",
            "score": 8,
            "totalQuestions": 10,
            "percentage": 80.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(stat["date"].is_string());

    let (status, listed) = request(&app, "GET", "/api/quiz-stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_quiz_session_is_idempotent() {
    let app = create_test_app().await;

    let (status, body) = request(&app, "DELETE", "/api/quiz-sessions/42", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}
