use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: i64,
    pub subject_id: i64,
    pub title: String,
    pub description: String,

    /// Completion percentage, 0-100
    pub progress: i32,
    pub total_questions: i32,
    pub difficulty: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateChapterRequest {
    pub subject_id: i64,

    #[validate(length(min = 1, max = 200, message = "Title must not be empty"))]
    pub title: String,

    pub description: String,

    #[serde(default)]
    #[validate(range(min = 0, max = 100, message = "Progress must be between 0 and 100"))]
    pub progress: i32,

    #[serde(default)]
    #[validate(range(min = 0, message = "Total questions must not be negative"))]
    pub total_questions: i32,

    #[validate(length(min = 1, max = 50, message = "Difficulty must not be empty"))]
    pub difficulty: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChapterRequest {
    pub subject_id: Option<i64>,

    #[validate(length(min = 1, max = 200, message = "Title must not be empty"))]
    pub title: Option<String>,

    pub description: Option<String>,

    #[validate(range(min = 0, max = 100, message = "Progress must be between 0 and 100"))]
    pub progress: Option<i32>,

    #[validate(range(min = 0, message = "Total questions must not be negative"))]
    pub total_questions: Option<i32>,

    #[validate(length(min = 1, max = 50, message = "Difficulty must not be empty"))]
    pub difficulty: Option<String>,
}

impl UpdateChapterRequest {
    pub fn apply(&self, chapter: &mut Chapter) {
        if let Some(subject_id) = self.subject_id {
            chapter.subject_id = subject_id;
        }
        if let Some(title) = &self.title {
            chapter.title = title.clone();
        }
        if let Some(description) = &self.description {
            chapter.description = description.clone();
        }
        if let Some(progress) = self.progress {
            chapter.progress = progress;
        }
        if let Some(total_questions) = self.total_questions {
            chapter.total_questions = total_questions;
        }
        if let Some(difficulty) = &self.difficulty {
            chapter.difficulty = difficulty.clone();
        }
    }
}
