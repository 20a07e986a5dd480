use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A logged study period. References a chapter loosely: no referential check,
/// and chapter deletion leaves these rows in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: i64,
    pub chapter_id: i64,

    /// Minutes spent.
    pub duration: i32,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudySessionRequest {
    pub chapter_id: i64,

    #[validate(range(min = 1, message = "Duration must be at least 1 minute"))]
    pub duration: i32,

    /// Defaults to now when omitted.
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvent {
    pub id: i64,
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub date: DateTime<Utc>,

    /// Display time, e.g. "14:30".
    pub time: String,

    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must not be empty"))]
    pub title: String,

    pub description: Option<String>,
    pub date: DateTime<Utc>,

    #[validate(length(min = 1, max = 50, message = "Time must not be empty"))]
    pub time: String,

    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50, message = "Type must not be empty"))]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduleEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must not be empty"))]
    pub title: Option<String>,

    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,

    #[validate(length(min = 1, max = 50, message = "Time must not be empty"))]
    pub time: Option<String>,

    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50, message = "Type must not be empty"))]
    pub kind: Option<String>,
}

impl UpdateScheduleEventRequest {
    pub fn apply(&self, event: &mut ScheduleEvent) {
        if let Some(title) = &self.title {
            event.title = title.clone();
        }
        if let Some(description) = &self.description {
            event.description = Some(description.clone());
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(time) = &self.time {
            event.time = time.clone();
        }
        if let Some(kind) = &self.kind {
            event.kind = kind.clone();
        }
    }
}
