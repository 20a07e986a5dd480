use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{create_test_app, request, seed_chapter, seed_question, seed_subject};

#[tokio::test]
async fn test_create_question_round_trip() {
    let app = create_test_app().await;
    let subject_id = seed_subject(&app, "Physics").await;
    let chapter_id = seed_chapter(&app, subject_id, "Mechanics").await;

    let (status, created) = request(
        &app,
        "POST",
        "/api/questions",
        Some(json!({
            "chapterId": chapter_id,
            "question": "What is the SI unit of force?",
            "options": ["Joule", "Newton", "Watt", "Pascal"],
            "correctAnswer": 1,
            "explanation": "Force is measured in newtons.",
            "difficulty": "easy"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["options"].as_array().unwrap().len(), 4);
    assert_eq!(created["correctAnswer"], 1);
    assert_eq!(created["difficulty"], "easy");

    let (_, listed) = request(&app, "GET", "/api/questions", None).await;
    assert_eq!(listed.as_array().unwrap()[0], created);
}

#[tokio::test]
async fn test_create_question_rejects_wrong_option_count() {
    let app = create_test_app().await;
    let subject_id = seed_subject(&app, "Physics").await;
    let chapter_id = seed_chapter(&app, subject_id, "Mechanics").await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/questions",
        Some(json!({
            "chapterId": chapter_id,
            "question": "Two options only?",
            "options": ["Yes", "No"],
            "correctAnswer": 0,
            "explanation": "Needs four options.",
            "difficulty": "easy"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_create_question_rejects_out_of_range_answer() {
    let app = create_test_app().await;
    let subject_id = seed_subject(&app, "Physics").await;
    let chapter_id = seed_chapter(&app, subject_id, "Mechanics").await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/questions",
        Some(json!({
            "chapterId": chapter_id,
            "question": "Index out of bounds?",
            "options": ["a", "b", "c", "d"],
            "correctAnswer": 4,
            "explanation": "correctAnswer must stay within options.",
            "difficulty": "hard"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bulk_create_returns_one_row_per_item() {
    let app = create_test_app().await;
    let subject_id = seed_subject(&app, "Physics").await;
    let chapter_id = seed_chapter(&app, subject_id, "Mechanics").await;

    let (status, created) = request(
        &app,
        "POST",
        "/api/questions/bulk",
        Some(json!({
            "chapterId": chapter_id,
            "questions": [
                {
                    "question": "Q1?",
                    "options": ["a", "b", "c", "d"],
                    "correctAnswer": 0
                },
                {
                    "question": "Q2?",
                    "options": ["a", "b", "c", "d"],
                    "correctAnswer": 3,
                    "explanation": "Last option.",
                    "difficulty": "hard"
                },
                {
                    "question": "Q3?",
                    "options": ["a", "b", "c", "d"],
                    "correctAnswer": 2
                }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let created = created.as_array().unwrap();
    assert_eq!(created.len(), 3);

    let mut ids: Vec<i64> = created.iter().map(|q| q["id"].as_i64().unwrap()).collect();
    let unique_before = ids.len();
    ids.dedup();
    assert_eq!(ids.len(), unique_before);

    for question in created {
        assert_eq!(question["options"].as_array().unwrap().len(), 4);
        let answer = question["correctAnswer"].as_i64().unwrap();
        assert!((0..=3).contains(&answer));
        assert_eq!(question["chapterId"], chapter_id);
    }

    // Omitted fields fall back to defaults.
    assert_eq!(created[0]["explanation"], "No explanation provided");
    assert_eq!(created[0]["difficulty"], "medium");
    assert_eq!(created[1]["difficulty"], "hard");
}

#[tokio::test]
async fn test_bulk_create_with_invalid_item_inserts_nothing() {
    let app = create_test_app().await;
    let subject_id = seed_subject(&app, "Physics").await;
    let chapter_id = seed_chapter(&app, subject_id, "Mechanics").await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/questions/bulk",
        Some(json!({
            "chapterId": chapter_id,
            "questions": [
                {
                    "question": "Fine.",
                    "options": ["a", "b", "c", "d"],
                    "correctAnswer": 0
                },
                {
                    "question": "Broken.",
                    "options": ["a", "b"],
                    "correctAnswer": 0
                }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, listed) = request(
        &app,
        "GET",
        &format!("/api/questions/chapter/{}", chapter_id),
        None,
    )
    .await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_questions_by_subtopic() {
    let app = create_test_app().await;
    let subject_id = seed_subject(&app, "Physics").await;
    let chapter_id = seed_chapter(&app, subject_id, "Mechanics").await;

    let (_, subtopic) = request(
        &app,
        "POST",
        "/api/subtopics",
        Some(json!({ "chapterId": chapter_id, "title": "Kinematics" })),
    )
    .await;
    let subtopic_id = subtopic["id"].as_i64().unwrap();

    let (status, tagged) = request(
        &app,
        "POST",
        "/api/questions",
        Some(json!({
            "chapterId": chapter_id,
            "subtopicId": subtopic_id,
            "question": "Tagged question?",
            "options": ["a", "b", "c", "d"],
            "correctAnswer": 0,
            "explanation": "Belongs to kinematics.",
            "difficulty": "medium"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // A question without a subtopic must not show up in the filtered list.
    seed_question(&app, chapter_id).await;

    let (status, listed) = request(
        &app,
        "GET",
        &format!("/api/questions/subtopic/{}", subtopic_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], tagged);
}

#[tokio::test]
async fn test_update_question_merges_partial_fields() {
    let app = create_test_app().await;
    let subject_id = seed_subject(&app, "Physics").await;
    let chapter_id = seed_chapter(&app, subject_id, "Mechanics").await;
    let question_id = seed_question(&app, chapter_id).await;

    let (status, updated) = request(
        &app,
        "PUT",
        &format!("/api/questions/{}", question_id),
        Some(json!({ "difficulty": "hard" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["difficulty"], "hard");
    assert_eq!(updated["question"], "What is the SI unit of force?");
}

#[tokio::test]
async fn test_update_missing_question_returns_404() {
    let app = create_test_app().await;

    let (status, body) = request(
        &app,
        "PUT",
        "/api/questions/999",
        Some(json!({ "difficulty": "hard" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Question not found");
}

#[tokio::test]
async fn test_delete_question() {
    let app = create_test_app().await;
    let subject_id = seed_subject(&app, "Physics").await;
    let chapter_id = seed_chapter(&app, subject_id, "Mechanics").await;
    let question_id = seed_question(&app, chapter_id).await;

    let (status, body) = request(&app, "DELETE", &format!("/api/questions/{}", question_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, listed) = request(&app, "GET", "/api/questions", None).await;
    assert!(listed.as_array().unwrap().is_empty());
}
