use crate::config::Config;
use crate::models::*;
use async_trait::async_trait;
use std::sync::Arc;

pub mod memory;
pub mod mongo;

pub use memory::MemoryStorage;
pub use mongo::MongoStorage;

/// Storage layer failure taxonomy. "Not found" is deliberately absent: lookup
/// misses are `Ok(None)` and deletes of missing ids are no-ops.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A supplied foreign key does not reference an existing row.
    #[error("{0}")]
    InvalidReference(String),

    /// A data invariant would be violated (e.g. score above total questions).
    #[error("{0}")]
    Constraint(String),

    /// The backing store cannot be reached.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Unexpected backend failure; detail is logged, never sent to clients.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Single persistence facade for every entity. One method per operation;
/// cascade ordering and bulk-insert semantics live behind this trait so the
/// backends cannot diverge on them.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Cheap connectivity probe used by the health endpoint.
    async fn ping(&self) -> StorageResult<()>;

    // Subjects
    async fn list_subjects(&self) -> StorageResult<Vec<Subject>>;
    async fn create_subject(&self, data: CreateSubjectRequest) -> StorageResult<Subject>;
    async fn update_subject(
        &self,
        id: i64,
        data: UpdateSubjectRequest,
    ) -> StorageResult<Option<Subject>>;
    /// Cascades: subtopics, questions, quiz sessions and their answers of
    /// every chapter under this subject, then the chapters, then the subject.
    async fn delete_subject(&self, id: i64) -> StorageResult<()>;

    // Chapters
    async fn list_chapters(&self) -> StorageResult<Vec<Chapter>>;
    async fn list_chapters_by_subject(&self, subject_id: i64) -> StorageResult<Vec<Chapter>>;
    async fn get_chapter(&self, id: i64) -> StorageResult<Option<Chapter>>;
    async fn create_chapter(&self, data: CreateChapterRequest) -> StorageResult<Chapter>;
    async fn update_chapter(
        &self,
        id: i64,
        data: UpdateChapterRequest,
    ) -> StorageResult<Option<Chapter>>;
    /// Cascades: quiz answers of the chapter's sessions, the sessions,
    /// questions, subtopics, then the chapter row itself.
    async fn delete_chapter(&self, id: i64) -> StorageResult<()>;

    // Subtopics
    async fn list_subtopics(&self) -> StorageResult<Vec<Subtopic>>;
    async fn list_subtopics_by_chapter(&self, chapter_id: i64) -> StorageResult<Vec<Subtopic>>;
    async fn create_subtopic(&self, data: CreateSubtopicRequest) -> StorageResult<Subtopic>;
    async fn delete_subtopic(&self, id: i64) -> StorageResult<()>;

    // Questions
    async fn list_questions(&self) -> StorageResult<Vec<Question>>;
    async fn list_questions_by_chapter(&self, chapter_id: i64) -> StorageResult<Vec<Question>>;
    async fn list_questions_by_subtopic(&self, subtopic_id: i64) -> StorageResult<Vec<Question>>;
    async fn create_question(&self, data: CreateQuestionRequest) -> StorageResult<Question>;
    /// All items are checked (including the chapter reference) before the
    /// first insert; a rejected item means nothing is written.
    async fn bulk_create_questions(
        &self,
        chapter_id: i64,
        items: Vec<BulkQuestionItem>,
    ) -> StorageResult<Vec<Question>>;
    async fn update_question(
        &self,
        id: i64,
        data: UpdateQuestionRequest,
    ) -> StorageResult<Option<Question>>;
    async fn delete_question(&self, id: i64) -> StorageResult<()>;

    // Quiz sessions
    async fn list_quiz_sessions(&self) -> StorageResult<Vec<QuizSession>>;
    async fn create_quiz_session(&self, data: CreateQuizSessionRequest)
        -> StorageResult<QuizSession>;
    async fn update_quiz_session(
        &self,
        id: i64,
        data: UpdateQuizSessionRequest,
    ) -> StorageResult<Option<QuizSession>>;
    async fn delete_quiz_session(&self, id: i64) -> StorageResult<()>;

    // Quiz answers
    async fn list_quiz_answers(&self) -> StorageResult<Vec<QuizAnswer>>;
    async fn list_quiz_answers_by_session(&self, session_id: i64)
        -> StorageResult<Vec<QuizAnswer>>;
    async fn create_quiz_answer(&self, data: CreateQuizAnswerRequest) -> StorageResult<QuizAnswer>;

    // Quiz stats
    async fn list_quiz_stats(&self) -> StorageResult<Vec<QuizStat>>;
    async fn create_quiz_stat(&self, data: CreateQuizStatRequest) -> StorageResult<QuizStat>;

    // Files
    async fn list_files(&self) -> StorageResult<Vec<FileRecord>>;
    async fn create_file(&self, data: CreateFileRequest) -> StorageResult<FileRecord>;
    async fn delete_file(&self, id: i64) -> StorageResult<()>;

    // Folders
    async fn list_folders(&self) -> StorageResult<Vec<Folder>>;
    async fn create_folder(&self, data: CreateFolderRequest) -> StorageResult<Folder>;
    async fn delete_folder(&self, id: i64) -> StorageResult<()>;

    // Messages
    async fn list_messages(&self) -> StorageResult<Vec<Message>>;
    async fn create_message(&self, data: CreateMessageRequest) -> StorageResult<Message>;
    async fn delete_message(&self, id: i64) -> StorageResult<()>;
    async fn clear_messages(&self) -> StorageResult<()>;

    // Study sessions
    async fn list_study_sessions(&self) -> StorageResult<Vec<StudySession>>;
    async fn create_study_session(
        &self,
        data: CreateStudySessionRequest,
    ) -> StorageResult<StudySession>;

    // Schedule events
    async fn list_schedule_events(&self) -> StorageResult<Vec<ScheduleEvent>>;
    async fn create_schedule_event(
        &self,
        data: CreateScheduleEventRequest,
    ) -> StorageResult<ScheduleEvent>;
    async fn update_schedule_event(
        &self,
        id: i64,
        data: UpdateScheduleEventRequest,
    ) -> StorageResult<Option<ScheduleEvent>>;
    async fn delete_schedule_event(&self, id: i64) -> StorageResult<()>;

    /// Deletes every row from every entity, children before parents.
    async fn clear_all(&self) -> StorageResult<()>;
}

/// Selects and connects the backend named by the configured URL scheme.
pub async fn connect(config: &Config) -> anyhow::Result<Arc<dyn Storage>> {
    let url = config.database_url.as_str();
    if url.starts_with("memory://") {
        tracing::info!("Using in-memory storage backend");
        Ok(Arc::new(MemoryStorage::new()))
    } else if url.starts_with("mongodb://") || url.starts_with("mongodb+srv://") {
        let storage = MongoStorage::connect(url, &config.database_name).await?;
        tracing::info!(database = %config.database_name, "MongoDB storage backend connected");
        Ok(Arc::new(storage))
    } else {
        anyhow::bail!("Unsupported database URL scheme: {}", url)
    }
}

pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let storage = connect(&config).await?;

        storage
            .ping()
            .await
            .map_err(|e| anyhow::anyhow!("Storage ping failed: {}", e))?;
        tracing::info!("Storage backend ready");

        Ok(Self { config, storage })
    }
}

/// Invariant shared by both backends: a session can never record more correct
/// answers than it has questions. Checked on create and after update merges.
pub(crate) fn check_session_score(session: &QuizSession) -> StorageResult<()> {
    if session.score > session.total_questions {
        return Err(StorageError::Constraint(format!(
            "Score {} exceeds total questions {}",
            session.score, session.total_questions
        )));
    }
    Ok(())
}

/// Fills bulk-import defaults the same way for every backend.
pub(crate) fn bulk_item_into_question(
    id: i64,
    chapter_id: i64,
    item: BulkQuestionItem,
) -> Question {
    Question {
        id,
        chapter_id,
        subtopic_id: None,
        question: item.question,
        options: item.options,
        correct_answer: item.correct_answer,
        explanation: item
            .explanation
            .unwrap_or_else(|| "No explanation provided".to_string()),
        difficulty: item.difficulty.unwrap_or_default(),
    }
}
