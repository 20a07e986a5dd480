use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{
    bulk_item_into_question, check_session_score, Storage, StorageError, StorageResult,
};
use crate::models::*;

struct Table<T> {
    rows: Vec<T>,
    last_id: i64,
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            last_id: 0,
        }
    }
}

#[derive(Default)]
struct MemoryInner {
    subjects: Table<Subject>,
    chapters: Table<Chapter>,
    subtopics: Table<Subtopic>,
    questions: Table<Question>,
    quiz_sessions: Table<QuizSession>,
    quiz_answers: Table<QuizAnswer>,
    quiz_stats: Table<QuizStat>,
    files: Table<FileRecord>,
    folders: Table<Folder>,
    messages: Table<Message>,
    study_sessions: Table<StudySession>,
    schedule_events: Table<ScheduleEvent>,
}

/// In-process backend. Rows live in insertion order inside a single
/// `RwLock`, so every operation (cascades included) is atomic with respect
/// to concurrent requests. Ids keep incrementing across deletes and resets,
/// like database sequences do.
pub struct MemoryStorage {
    inner: RwLock<MemoryInner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryInner::default()),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn missing(entity: &str, id: i64) -> StorageError {
    StorageError::InvalidReference(format!("{} {} does not exist", entity, id))
}

/// Removes a chapter and everything hanging off it, grandchildren first.
fn cascade_chapter(inner: &mut MemoryInner, chapter_id: i64) {
    let session_ids: Vec<i64> = inner
        .quiz_sessions
        .rows
        .iter()
        .filter(|s| s.chapter_id == chapter_id)
        .map(|s| s.id)
        .collect();

    inner
        .quiz_answers
        .rows
        .retain(|a| !session_ids.contains(&a.session_id));
    inner.quiz_sessions.rows.retain(|s| s.chapter_id != chapter_id);
    inner.questions.rows.retain(|q| q.chapter_id != chapter_id);
    inner.subtopics.rows.retain(|s| s.chapter_id != chapter_id);
    inner.chapters.rows.retain(|c| c.id != chapter_id);
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn ping(&self) -> StorageResult<()> {
        Ok(())
    }

    // Subjects

    async fn list_subjects(&self) -> StorageResult<Vec<Subject>> {
        Ok(self.inner.read().await.subjects.rows.clone())
    }

    async fn create_subject(&self, data: CreateSubjectRequest) -> StorageResult<Subject> {
        let mut inner = self.inner.write().await;
        let subject = Subject {
            id: inner.subjects.next_id(),
            name: data.name,
            color: data.color,
        };
        inner.subjects.rows.push(subject.clone());
        Ok(subject)
    }

    async fn update_subject(
        &self,
        id: i64,
        data: UpdateSubjectRequest,
    ) -> StorageResult<Option<Subject>> {
        let mut inner = self.inner.write().await;
        let Some(subject) = inner.subjects.rows.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        data.apply(subject);
        Ok(Some(subject.clone()))
    }

    async fn delete_subject(&self, id: i64) -> StorageResult<()> {
        let mut inner = self.inner.write().await;
        let chapter_ids: Vec<i64> = inner
            .chapters
            .rows
            .iter()
            .filter(|c| c.subject_id == id)
            .map(|c| c.id)
            .collect();
        for chapter_id in chapter_ids {
            cascade_chapter(&mut inner, chapter_id);
        }
        inner.subjects.rows.retain(|s| s.id != id);
        Ok(())
    }

    // Chapters

    async fn list_chapters(&self) -> StorageResult<Vec<Chapter>> {
        Ok(self.inner.read().await.chapters.rows.clone())
    }

    async fn list_chapters_by_subject(&self, subject_id: i64) -> StorageResult<Vec<Chapter>> {
        Ok(self
            .inner
            .read()
            .await
            .chapters
            .rows
            .iter()
            .filter(|c| c.subject_id == subject_id)
            .cloned()
            .collect())
    }

    async fn get_chapter(&self, id: i64) -> StorageResult<Option<Chapter>> {
        Ok(self
            .inner
            .read()
            .await
            .chapters
            .rows
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn create_chapter(&self, data: CreateChapterRequest) -> StorageResult<Chapter> {
        let mut inner = self.inner.write().await;
        if !inner.subjects.rows.iter().any(|s| s.id == data.subject_id) {
            return Err(missing("Subject", data.subject_id));
        }
        let chapter = Chapter {
            id: inner.chapters.next_id(),
            subject_id: data.subject_id,
            title: data.title,
            description: data.description,
            progress: data.progress,
            total_questions: data.total_questions,
            difficulty: data.difficulty,
        };
        inner.chapters.rows.push(chapter.clone());
        Ok(chapter)
    }

    async fn update_chapter(
        &self,
        id: i64,
        data: UpdateChapterRequest,
    ) -> StorageResult<Option<Chapter>> {
        let mut inner = self.inner.write().await;
        if let Some(subject_id) = data.subject_id {
            if !inner.subjects.rows.iter().any(|s| s.id == subject_id) {
                return Err(missing("Subject", subject_id));
            }
        }
        let Some(chapter) = inner.chapters.rows.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        data.apply(chapter);
        Ok(Some(chapter.clone()))
    }

    async fn delete_chapter(&self, id: i64) -> StorageResult<()> {
        let mut inner = self.inner.write().await;
        cascade_chapter(&mut inner, id);
        Ok(())
    }

    // Subtopics

    async fn list_subtopics(&self) -> StorageResult<Vec<Subtopic>> {
        Ok(self.inner.read().await.subtopics.rows.clone())
    }

    async fn list_subtopics_by_chapter(&self, chapter_id: i64) -> StorageResult<Vec<Subtopic>> {
        Ok(self
            .inner
            .read()
            .await
            .subtopics
            .rows
            .iter()
            .filter(|s| s.chapter_id == chapter_id)
            .cloned()
            .collect())
    }

    async fn create_subtopic(&self, data: CreateSubtopicRequest) -> StorageResult<Subtopic> {
        let mut inner = self.inner.write().await;
        if !inner.chapters.rows.iter().any(|c| c.id == data.chapter_id) {
            return Err(missing("Chapter", data.chapter_id));
        }
        let subtopic = Subtopic {
            id: inner.subtopics.next_id(),
            chapter_id: data.chapter_id,
            title: data.title,
            description: data.description,
        };
        inner.subtopics.rows.push(subtopic.clone());
        Ok(subtopic)
    }

    async fn delete_subtopic(&self, id: i64) -> StorageResult<()> {
        let mut inner = self.inner.write().await;
        inner.subtopics.rows.retain(|s| s.id != id);
        Ok(())
    }

    // Questions

    async fn list_questions(&self) -> StorageResult<Vec<Question>> {
        Ok(self.inner.read().await.questions.rows.clone())
    }

    async fn list_questions_by_chapter(&self, chapter_id: i64) -> StorageResult<Vec<Question>> {
        Ok(self
            .inner
            .read()
            .await
            .questions
            .rows
            .iter()
            .filter(|q| q.chapter_id == chapter_id)
            .cloned()
            .collect())
    }

    async fn list_questions_by_subtopic(&self, subtopic_id: i64) -> StorageResult<Vec<Question>> {
        Ok(self
            .inner
            .read()
            .await
            .questions
            .rows
            .iter()
            .filter(|q| q.subtopic_id == Some(subtopic_id))
            .cloned()
            .collect())
    }

    async fn create_question(&self, data: CreateQuestionRequest) -> StorageResult<Question> {
        let mut inner = self.inner.write().await;
        if !inner.chapters.rows.iter().any(|c| c.id == data.chapter_id) {
            return Err(missing("Chapter", data.chapter_id));
        }
        if let Some(subtopic_id) = data.subtopic_id {
            if !inner.subtopics.rows.iter().any(|s| s.id == subtopic_id) {
                return Err(missing("Subtopic", subtopic_id));
            }
        }
        let question = Question {
            id: inner.questions.next_id(),
            chapter_id: data.chapter_id,
            subtopic_id: data.subtopic_id,
            question: data.question,
            options: data.options,
            correct_answer: data.correct_answer,
            explanation: data.explanation,
            difficulty: data.difficulty,
        };
        inner.questions.rows.push(question.clone());
        Ok(question)
    }

    async fn bulk_create_questions(
        &self,
        chapter_id: i64,
        items: Vec<BulkQuestionItem>,
    ) -> StorageResult<Vec<Question>> {
        let mut inner = self.inner.write().await;
        if !inner.chapters.rows.iter().any(|c| c.id == chapter_id) {
            return Err(missing("Chapter", chapter_id));
        }
        // Ids are assigned only after every item passed validation upstream,
        // so the batch lands whole or not at all.
        let questions: Vec<Question> = items
            .into_iter()
            .map(|item| {
                let id = inner.questions.next_id();
                bulk_item_into_question(id, chapter_id, item)
            })
            .collect();
        inner.questions.rows.extend(questions.iter().cloned());
        Ok(questions)
    }

    async fn update_question(
        &self,
        id: i64,
        data: UpdateQuestionRequest,
    ) -> StorageResult<Option<Question>> {
        let mut inner = self.inner.write().await;
        if let Some(chapter_id) = data.chapter_id {
            if !inner.chapters.rows.iter().any(|c| c.id == chapter_id) {
                return Err(missing("Chapter", chapter_id));
            }
        }
        if let Some(subtopic_id) = data.subtopic_id {
            if !inner.subtopics.rows.iter().any(|s| s.id == subtopic_id) {
                return Err(missing("Subtopic", subtopic_id));
            }
        }
        let Some(question) = inner.questions.rows.iter_mut().find(|q| q.id == id) else {
            return Ok(None);
        };
        data.apply(question);
        Ok(Some(question.clone()))
    }

    async fn delete_question(&self, id: i64) -> StorageResult<()> {
        let mut inner = self.inner.write().await;
        inner.questions.rows.retain(|q| q.id != id);
        Ok(())
    }

    // Quiz sessions

    async fn list_quiz_sessions(&self) -> StorageResult<Vec<QuizSession>> {
        Ok(self.inner.read().await.quiz_sessions.rows.clone())
    }

    async fn create_quiz_session(
        &self,
        data: CreateQuizSessionRequest,
    ) -> StorageResult<QuizSession> {
        let mut inner = self.inner.write().await;
        if !inner.chapters.rows.iter().any(|c| c.id == data.chapter_id) {
            return Err(missing("Chapter", data.chapter_id));
        }
        let session = QuizSession {
            id: inner.quiz_sessions.next_id(),
            chapter_id: data.chapter_id,
            total_questions: data.total_questions,
            current_question: data.current_question,
            score: data.score,
            is_completed: data.is_completed,
            created_at: Utc::now(),
        };
        check_session_score(&session)?;
        inner.quiz_sessions.rows.push(session.clone());
        Ok(session)
    }

    async fn update_quiz_session(
        &self,
        id: i64,
        data: UpdateQuizSessionRequest,
    ) -> StorageResult<Option<QuizSession>> {
        let mut inner = self.inner.write().await;
        if let Some(chapter_id) = data.chapter_id {
            if !inner.chapters.rows.iter().any(|c| c.id == chapter_id) {
                return Err(missing("Chapter", chapter_id));
            }
        }
        let Some(session) = inner.quiz_sessions.rows.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        // Merge into a copy first so a rejected update leaves the row intact.
        let mut merged = session.clone();
        data.apply(&mut merged);
        check_session_score(&merged)?;
        *session = merged.clone();
        Ok(Some(merged))
    }

    async fn delete_quiz_session(&self, id: i64) -> StorageResult<()> {
        let mut inner = self.inner.write().await;
        inner.quiz_sessions.rows.retain(|s| s.id != id);
        Ok(())
    }

    // Quiz answers

    async fn list_quiz_answers(&self) -> StorageResult<Vec<QuizAnswer>> {
        Ok(self.inner.read().await.quiz_answers.rows.clone())
    }

    async fn list_quiz_answers_by_session(
        &self,
        session_id: i64,
    ) -> StorageResult<Vec<QuizAnswer>> {
        Ok(self
            .inner
            .read()
            .await
            .quiz_answers
            .rows
            .iter()
            .filter(|a| a.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn create_quiz_answer(&self, data: CreateQuizAnswerRequest) -> StorageResult<QuizAnswer> {
        let mut inner = self.inner.write().await;
        if !inner.quiz_sessions.rows.iter().any(|s| s.id == data.session_id) {
            return Err(missing("Quiz session", data.session_id));
        }
        if !inner.questions.rows.iter().any(|q| q.id == data.question_id) {
            return Err(missing("Question", data.question_id));
        }
        let answer = QuizAnswer {
            id: inner.quiz_answers.next_id(),
            session_id: data.session_id,
            question_id: data.question_id,
            selected_answer: data.selected_answer,
            is_correct: data.is_correct,
        };
        inner.quiz_answers.rows.push(answer.clone());
        Ok(answer)
    }

    // Quiz stats

    async fn list_quiz_stats(&self) -> StorageResult<Vec<QuizStat>> {
        Ok(self.inner.read().await.quiz_stats.rows.clone())
    }

    async fn create_quiz_stat(&self, data: CreateQuizStatRequest) -> StorageResult<QuizStat> {
        let mut inner = self.inner.write().await;
        let stat = QuizStat {
            id: inner.quiz_stats.next_id(),
            date: data.date.unwrap_or_else(Utc::now),
            chapter_title: data.chapter_title,
            subtopic_title: data.subtopic_title,
            subject_title: data.subject_title,
            score: data.score,
            total_questions: data.total_questions,
            percentage: data.percentage,
        };
        inner.quiz_stats.rows.push(stat.clone());
        Ok(stat)
    }

    // Files

    async fn list_files(&self) -> StorageResult<Vec<FileRecord>> {
        Ok(self.inner.read().await.files.rows.clone())
    }

    async fn create_file(&self, data: CreateFileRequest) -> StorageResult<FileRecord> {
        let mut inner = self.inner.write().await;
        let file = FileRecord {
            id: inner.files.next_id(),
            name: data.name,
            kind: data.kind,
            size: data.size,
            path: data.path,
            created_at: Utc::now(),
        };
        inner.files.rows.push(file.clone());
        Ok(file)
    }

    async fn delete_file(&self, id: i64) -> StorageResult<()> {
        let mut inner = self.inner.write().await;
        inner.files.rows.retain(|f| f.id != id);
        Ok(())
    }

    // Folders

    async fn list_folders(&self) -> StorageResult<Vec<Folder>> {
        Ok(self.inner.read().await.folders.rows.clone())
    }

    async fn create_folder(&self, data: CreateFolderRequest) -> StorageResult<Folder> {
        let mut inner = self.inner.write().await;
        let folder = Folder {
            id: inner.folders.next_id(),
            name: data.name,
            path: data.path,
            created_at: Utc::now(),
        };
        inner.folders.rows.push(folder.clone());
        Ok(folder)
    }

    async fn delete_folder(&self, id: i64) -> StorageResult<()> {
        let mut inner = self.inner.write().await;
        inner.folders.rows.retain(|f| f.id != id);
        Ok(())
    }

    // Messages

    async fn list_messages(&self) -> StorageResult<Vec<Message>> {
        Ok(self.inner.read().await.messages.rows.clone())
    }

    async fn create_message(&self, data: CreateMessageRequest) -> StorageResult<Message> {
        let mut inner = self.inner.write().await;
        let message = Message {
            id: inner.messages.next_id(),
            text: data.text,
            timestamp: Utc::now(),
            sender: data.sender,
        };
        inner.messages.rows.push(message.clone());
        Ok(message)
    }

    async fn delete_message(&self, id: i64) -> StorageResult<()> {
        let mut inner = self.inner.write().await;
        inner.messages.rows.retain(|m| m.id != id);
        Ok(())
    }

    async fn clear_messages(&self) -> StorageResult<()> {
        let mut inner = self.inner.write().await;
        inner.messages.rows.clear();
        Ok(())
    }

    // Study sessions

    async fn list_study_sessions(&self) -> StorageResult<Vec<StudySession>> {
        Ok(self.inner.read().await.study_sessions.rows.clone())
    }

    async fn create_study_session(
        &self,
        data: CreateStudySessionRequest,
    ) -> StorageResult<StudySession> {
        let mut inner = self.inner.write().await;
        let session = StudySession {
            id: inner.study_sessions.next_id(),
            chapter_id: data.chapter_id,
            duration: data.duration,
            date: data.date.unwrap_or_else(Utc::now),
        };
        inner.study_sessions.rows.push(session.clone());
        Ok(session)
    }

    // Schedule events

    async fn list_schedule_events(&self) -> StorageResult<Vec<ScheduleEvent>> {
        Ok(self.inner.read().await.schedule_events.rows.clone())
    }

    async fn create_schedule_event(
        &self,
        data: CreateScheduleEventRequest,
    ) -> StorageResult<ScheduleEvent> {
        let mut inner = self.inner.write().await;
        let event = ScheduleEvent {
            id: inner.schedule_events.next_id(),
            title: data.title,
            description: data.description,
            date: data.date,
            time: data.time,
            kind: data.kind,
        };
        inner.schedule_events.rows.push(event.clone());
        Ok(event)
    }

    async fn update_schedule_event(
        &self,
        id: i64,
        data: UpdateScheduleEventRequest,
    ) -> StorageResult<Option<ScheduleEvent>> {
        let mut inner = self.inner.write().await;
        let Some(event) = inner.schedule_events.rows.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        data.apply(event);
        Ok(Some(event.clone()))
    }

    async fn delete_schedule_event(&self, id: i64) -> StorageResult<()> {
        let mut inner = self.inner.write().await;
        inner.schedule_events.rows.retain(|e| e.id != id);
        Ok(())
    }

    async fn clear_all(&self) -> StorageResult<()> {
        let mut inner = self.inner.write().await;
        // Children before parents, then the standalone tables.
        inner.quiz_answers.rows.clear();
        inner.quiz_sessions.rows.clear();
        inner.questions.rows.clear();
        inner.subtopics.rows.clear();
        inner.chapters.rows.clear();
        inner.subjects.rows.clear();
        inner.quiz_stats.rows.clear();
        inner.files.rows.clear();
        inner.folders.rows.clear();
        inner.messages.rows.clear();
        inner.study_sessions.rows.clear();
        inner.schedule_events.rows.clear();
        Ok(())
    }
}
