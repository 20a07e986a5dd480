use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtopic {
    pub id: i64,
    pub chapter_id: i64,
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubtopicRequest {
    pub chapter_id: i64,

    #[validate(length(min = 1, max = 200, message = "Title must not be empty"))]
    pub title: String,

    pub description: Option<String>,
}
