use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{create_test_app, request, seed_chapter, seed_question, seed_subject};

#[tokio::test]
async fn test_create_chapter_defaults_progress_and_total_questions() {
    let app = create_test_app().await;
    let subject_id = seed_subject(&app, "Physics").await;

    let (status, chapter) = request(
        &app,
        "POST",
        "/api/chapters",
        Some(json!({
            "subjectId": subject_id,
            "title": "Mechanics",
            "description": "Forces and motion",
            "difficulty": "Beginner"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(chapter["progress"], 0);
    assert_eq!(chapter["totalQuestions"], 0);
    assert_eq!(chapter["subjectId"], subject_id);
}

#[tokio::test]
async fn test_create_chapter_requires_existing_subject() {
    let app = create_test_app().await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/chapters",
        Some(json!({
            "subjectId": 77,
            "title": "Orphan",
            "description": "No parent",
            "difficulty": "Beginner"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("77"));
}

#[tokio::test]
async fn test_create_chapter_rejects_progress_out_of_range() {
    let app = create_test_app().await;
    let subject_id = seed_subject(&app, "Physics").await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/chapters",
        Some(json!({
            "subjectId": subject_id,
            "title": "Mechanics",
            "description": "Forces and motion",
            "progress": 150,
            "difficulty": "Beginner"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_chapters_by_subject_filters_and_keeps_order() {
    let app = create_test_app().await;
    let physics = seed_subject(&app, "Physics").await;
    let biology = seed_subject(&app, "Biology").await;

    seed_chapter(&app, physics, "Mechanics").await;
    seed_chapter(&app, physics, "Optics").await;
    seed_chapter(&app, biology, "Cells").await;

    let (status, listed) = request(
        &app,
        "GET",
        &format!("/api/chapters/subject/{}", physics),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Mechanics", "Optics"]);
}

#[tokio::test]
async fn test_get_chapter_distinguishes_missing_from_present() {
    let app = create_test_app().await;
    let subject_id = seed_subject(&app, "Physics").await;
    let chapter_id = seed_chapter(&app, subject_id, "Mechanics").await;

    let (status, chapter) = request(&app, "GET", &format!("/api/chapters/{}", chapter_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(chapter["title"], "Mechanics");

    let (status, body) = request(&app, "GET", "/api/chapters/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Chapter not found");
}

#[tokio::test]
async fn test_update_chapter_progress() {
    let app = create_test_app().await;
    let subject_id = seed_subject(&app, "Physics").await;
    let chapter_id = seed_chapter(&app, subject_id, "Mechanics").await;

    let (status, updated) = request(
        &app,
        "PUT",
        &format!("/api/chapters/{}", chapter_id),
        Some(json!({ "progress": 60 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["progress"], 60);
    assert_eq!(updated["title"], "Mechanics");
}

#[tokio::test]
async fn test_delete_subject_cascades_to_chapters_and_questions() {
    let app = create_test_app().await;
    let subject_id = seed_subject(&app, "Physics").await;
    let chapter_id = seed_chapter(&app, subject_id, "Mechanics").await;
    seed_question(&app, chapter_id).await;
    seed_question(&app, chapter_id).await;

    let (status, body) = request(&app, "DELETE", &format!("/api/subjects/{}", subject_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, chapters) = request(
        &app,
        "GET",
        &format!("/api/chapters/subject/{}", subject_id),
        None,
    )
    .await;
    assert!(chapters.as_array().unwrap().is_empty());

    let (_, questions) = request(
        &app,
        "GET",
        &format!("/api/questions/chapter/{}", chapter_id),
        None,
    )
    .await;
    assert!(questions.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_chapter_cascades_to_subtopics_and_quiz_data() {
    let app = create_test_app().await;
    let subject_id = seed_subject(&app, "Physics").await;
    let chapter_id = seed_chapter(&app, subject_id, "Mechanics").await;
    let question_id = seed_question(&app, chapter_id).await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/subtopics",
        Some(json!({ "chapterId": chapter_id, "title": "Kinematics" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, session) = request(
        &app,
        "POST",
        "/api/quiz-sessions",
        Some(json!({ "chapterId": chapter_id, "totalQuestions": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let session_id = session["id"].as_i64().unwrap();

    let (status, _) = request(
        &app,
        "POST",
        "/api/quiz-answers",
        Some(json!({
            "sessionId": session_id,
            "questionId": question_id,
            "selectedAnswer": 1,
            "isCorrect": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = request(&app, "DELETE", &format!("/api/chapters/{}", chapter_id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, subtopics) = request(
        &app,
        "GET",
        &format!("/api/subtopics/chapter/{}", chapter_id),
        None,
    )
    .await;
    assert!(subtopics.as_array().unwrap().is_empty());

    let (_, sessions) = request(&app, "GET", "/api/quiz-sessions", None).await;
    assert!(sessions.as_array().unwrap().is_empty());

    let (_, answers) = request(&app, "GET", "/api/quiz-answers", None).await;
    assert!(answers.as_array().unwrap().is_empty());

    // The subject itself survives.
    let (_, subjects) = request(&app, "GET", "/api/subjects", None).await;
    assert_eq!(subjects.as_array().unwrap().len(), 1);
}
