use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Folder,
    Pdf,
    Image,
    Document,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: i64,
    pub name: String,

    #[serde(rename = "type")]
    pub kind: FileKind,

    /// Human-readable size ("2.4 MB"); folders have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    pub path: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileRequest {
    #[validate(length(min = 1, max = 255, message = "Name must not be empty"))]
    pub name: String,

    #[serde(rename = "type")]
    pub kind: FileKind,

    pub size: Option<String>,

    #[validate(length(min = 1, message = "Path must not be empty"))]
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: i64,
    pub name: String,
    pub path: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    #[validate(length(min = 1, max = 255, message = "Name must not be empty"))]
    pub name: String,

    #[validate(length(min = 1, message = "Path must not be empty"))]
    pub path: String,
}
