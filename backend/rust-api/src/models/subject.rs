use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubjectRequest {
    #[validate(length(min = 1, max = 200, message = "Name must not be empty"))]
    pub name: String,

    /// Display color, e.g. "#3B82F6"
    #[validate(length(min = 1, max = 50, message = "Color must not be empty"))]
    pub color: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubjectRequest {
    #[validate(length(min = 1, max = 200, message = "Name must not be empty"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Color must not be empty"))]
    pub color: Option<String>,
}

impl UpdateSubjectRequest {
    pub fn apply(&self, subject: &mut Subject) {
        if let Some(name) = &self.name {
            subject.name = name.clone();
        }
        if let Some(color) = &self.color {
            subject.color = color.clone();
        }
    }
}
