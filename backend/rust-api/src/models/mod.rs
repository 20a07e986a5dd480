pub mod chapter;
pub mod file;
pub mod message;
pub mod planner;
pub mod question;
pub mod quiz;
pub mod subject;
pub mod subtopic;

pub use chapter::{Chapter, CreateChapterRequest, UpdateChapterRequest};
pub use file::{CreateFileRequest, CreateFolderRequest, FileKind, FileRecord, Folder};
pub use message::{CreateMessageRequest, Message};
pub use planner::{
    CreateScheduleEventRequest, CreateStudySessionRequest, ScheduleEvent, StudySession,
    UpdateScheduleEventRequest,
};
pub use question::{
    BulkCreateQuestionsRequest, BulkQuestionItem, CreateQuestionRequest, Difficulty, Question,
    UpdateQuestionRequest,
};
pub use quiz::{
    CreateQuizAnswerRequest, CreateQuizSessionRequest, CreateQuizStatRequest, QuizAnswer,
    QuizSession, QuizStat, UpdateQuizSessionRequest,
};
pub use subject::{CreateSubjectRequest, Subject, UpdateSubjectRequest};
pub use subtopic::{CreateSubtopicRequest, Subtopic};
