use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSession {
    pub id: i64,
    pub chapter_id: i64,
    pub total_questions: i32,
    pub current_question: i32,
    pub score: i32,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizSessionRequest {
    pub chapter_id: i64,

    #[validate(range(min = 1, message = "Total questions must be at least 1"))]
    pub total_questions: i32,

    #[serde(default)]
    #[validate(range(min = 0, message = "Current question must not be negative"))]
    pub current_question: i32,

    #[serde(default)]
    #[validate(range(min = 0, message = "Score must not be negative"))]
    pub score: i32,

    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuizSessionRequest {
    pub chapter_id: Option<i64>,

    #[validate(range(min = 1, message = "Total questions must be at least 1"))]
    pub total_questions: Option<i32>,

    #[validate(range(min = 0, message = "Current question must not be negative"))]
    pub current_question: Option<i32>,

    #[validate(range(min = 0, message = "Score must not be negative"))]
    pub score: Option<i32>,

    pub is_completed: Option<bool>,
}

impl UpdateQuizSessionRequest {
    pub fn apply(&self, session: &mut QuizSession) {
        if let Some(chapter_id) = self.chapter_id {
            session.chapter_id = chapter_id;
        }
        if let Some(total_questions) = self.total_questions {
            session.total_questions = total_questions;
        }
        if let Some(current_question) = self.current_question {
            session.current_question = current_question;
        }
        if let Some(score) = self.score {
            session.score = score;
        }
        if let Some(is_completed) = self.is_completed {
            session.is_completed = is_completed;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    pub id: i64,
    pub session_id: i64,
    pub question_id: i64,
    pub selected_answer: i32,

    /// Computed by the caller from the question's correct answer; stored as-is.
    pub is_correct: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizAnswerRequest {
    pub session_id: i64,
    pub question_id: i64,

    #[validate(range(min = 0, max = 3, message = "Selected answer must be between 0 and 3"))]
    pub selected_answer: i32,

    pub is_correct: bool,
}

/// Denormalized quiz result snapshot. No foreign keys on purpose: stats must
/// survive deletion of the chapter/subject they were recorded against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizStat {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub chapter_title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtopic_title: Option<String>,

    pub subject_title: String,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: f64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizStatRequest {
    /// Defaults to now when omitted.
    pub date: Option<DateTime<Utc>>,

    #[validate(length(min = 1, message = "Chapter title must not be empty"))]
    pub chapter_title: String,

    pub subtopic_title: Option<String>,

    #[validate(length(min = 1, message = "Subject title must not be empty"))]
    pub subject_title: String,

    #[validate(range(min = 0, message = "Score must not be negative"))]
    pub score: i32,

    #[validate(range(min = 0, message = "Total questions must not be negative"))]
    pub total_questions: i32,

    #[validate(range(min = 0.0, max = 100.0, message = "Percentage must be between 0 and 100"))]
    pub percentage: f64,
}
