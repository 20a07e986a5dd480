use serde::{Deserialize, Serialize};
use validator::Validate;

/// Question difficulty as stored and served over the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub chapter_id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtopic_id: Option<i64>,

    pub question: String,

    /// Exactly four answer options; `correct_answer` indexes into this list.
    pub options: Vec<String>,
    pub correct_answer: i32,
    pub explanation: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    pub chapter_id: i64,
    pub subtopic_id: Option<i64>,

    #[validate(length(min = 1, message = "Question text must not be empty"))]
    pub question: String,

    #[validate(length(equal = 4, message = "Options must contain exactly 4 entries"))]
    pub options: Vec<String>,

    #[validate(range(min = 0, max = 3, message = "Correct answer must be between 0 and 3"))]
    pub correct_answer: i32,

    pub explanation: String,

    #[serde(default)]
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionRequest {
    pub chapter_id: Option<i64>,
    pub subtopic_id: Option<i64>,

    #[validate(length(min = 1, message = "Question text must not be empty"))]
    pub question: Option<String>,

    #[validate(length(equal = 4, message = "Options must contain exactly 4 entries"))]
    pub options: Option<Vec<String>>,

    #[validate(range(min = 0, max = 3, message = "Correct answer must be between 0 and 3"))]
    pub correct_answer: Option<i32>,

    pub explanation: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl UpdateQuestionRequest {
    pub fn apply(&self, question: &mut Question) {
        if let Some(chapter_id) = self.chapter_id {
            question.chapter_id = chapter_id;
        }
        if let Some(subtopic_id) = self.subtopic_id {
            question.subtopic_id = Some(subtopic_id);
        }
        if let Some(text) = &self.question {
            question.question = text.clone();
        }
        if let Some(options) = &self.options {
            question.options = options.clone();
        }
        if let Some(correct_answer) = self.correct_answer {
            question.correct_answer = correct_answer;
        }
        if let Some(explanation) = &self.explanation {
            question.explanation = explanation.clone();
        }
        if let Some(difficulty) = self.difficulty {
            question.difficulty = difficulty;
        }
    }
}

/// One entry of a bulk import. Explanation and difficulty are optional on the
/// wire and defaulted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BulkQuestionItem {
    #[validate(length(min = 1, message = "Question text must not be empty"))]
    pub question: String,

    #[validate(length(equal = 4, message = "Options must contain exactly 4 entries"))]
    pub options: Vec<String>,

    #[validate(range(min = 0, max = 3, message = "Correct answer must be between 0 and 3"))]
    pub correct_answer: i32,

    pub explanation: Option<String>,
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreateQuestionsRequest {
    pub chapter_id: i64,

    #[validate(length(min = 1, message = "Questions array must not be empty"), nested)]
    pub questions: Vec<BulkQuestionItem>,
}
