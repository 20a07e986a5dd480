use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Database};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{
    bulk_item_into_question, check_session_score, Storage, StorageError, StorageResult,
};
use crate::models::*;

const SUBJECTS: &str = "subjects";
const CHAPTERS: &str = "chapters";
const SUBTOPICS: &str = "subtopics";
const QUESTIONS: &str = "questions";
const QUIZ_SESSIONS: &str = "quiz_sessions";
const QUIZ_ANSWERS: &str = "quiz_answers";
const QUIZ_STATS: &str = "quiz_stats";
const FILES: &str = "files";
const FOLDERS: &str = "folders";
const MESSAGES: &str = "messages";
const STUDY_SESSIONS: &str = "study_sessions";
const SCHEDULE_EVENTS: &str = "schedule_events";
const COUNTERS: &str = "counters";

/// MongoDB backend. Rows carry their integer id as `_id`; ids are allocated
/// from a per-collection sequence in the `counters` collection so insertion
/// order equals id order, like a database serial column.
pub struct MongoStorage {
    db: Database,
}

impl MongoStorage {
    pub async fn connect(uri: &str, database: &str) -> anyhow::Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .context("Failed to connect to MongoDB")?;
        Ok(Self {
            db: client.database(database),
        })
    }

    /// Reserves `count` consecutive ids for `entity` and returns the first.
    async fn next_ids(&self, entity: &str, count: i64) -> StorageResult<i64> {
        let counters = self.db.collection::<Document>(COUNTERS);
        let updated = counters
            .find_one_and_update(doc! { "_id": entity }, doc! { "$inc": { "seq": count } })
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .context("Failed to allocate id")?
            .ok_or_else(|| anyhow!("Counter upsert returned no document"))?;
        let seq = updated
            .get_i64("seq")
            .context("Counter sequence has unexpected type")?;
        Ok(seq - count + 1)
    }

    async fn next_id(&self, entity: &str) -> StorageResult<i64> {
        self.next_ids(entity, 1).await
    }

    async fn fetch_all<T: DeserializeOwned>(
        &self,
        collection: &str,
        filter: Document,
    ) -> StorageResult<Vec<T>> {
        let cursor = self
            .db
            .collection::<Document>(collection)
            .find(filter)
            .sort(doc! { "_id": 1 })
            .await
            .with_context(|| format!("Failed to query {}", collection))?;
        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .with_context(|| format!("Failed to read {} cursor", collection))?;
        let rows = docs
            .into_iter()
            .map(from_doc)
            .collect::<anyhow::Result<Vec<T>>>()?;
        Ok(rows)
    }

    async fn find_by_id<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: i64,
    ) -> StorageResult<Option<T>> {
        let doc = self
            .db
            .collection::<Document>(collection)
            .find_one(doc! { "_id": id })
            .await
            .with_context(|| format!("Failed to query {}", collection))?;
        match doc {
            Some(doc) => Ok(Some(from_doc(doc)?)),
            None => Ok(None),
        }
    }

    async fn insert_row<T: Serialize>(&self, collection: &str, row: &T) -> StorageResult<()> {
        self.db
            .collection::<Document>(collection)
            .insert_one(into_doc(row)?)
            .await
            .with_context(|| format!("Failed to insert into {}", collection))?;
        Ok(())
    }

    async fn replace_row<T: Serialize>(
        &self,
        collection: &str,
        id: i64,
        row: &T,
    ) -> StorageResult<()> {
        self.db
            .collection::<Document>(collection)
            .replace_one(doc! { "_id": id }, into_doc(row)?)
            .await
            .with_context(|| format!("Failed to update {}", collection))?;
        Ok(())
    }

    async fn delete_by_id(&self, collection: &str, id: i64) -> StorageResult<()> {
        self.db
            .collection::<Document>(collection)
            .delete_one(doc! { "_id": id })
            .await
            .with_context(|| format!("Failed to delete from {}", collection))?;
        Ok(())
    }

    async fn delete_matching(&self, collection: &str, filter: Document) -> StorageResult<()> {
        self.db
            .collection::<Document>(collection)
            .delete_many(filter)
            .await
            .with_context(|| format!("Failed to delete from {}", collection))?;
        Ok(())
    }

    async fn ensure_exists(&self, collection: &str, label: &str, id: i64) -> StorageResult<()> {
        let count = self
            .db
            .collection::<Document>(collection)
            .count_documents(doc! { "_id": id })
            .await
            .with_context(|| format!("Failed to verify {} exists", label))?;
        if count == 0 {
            return Err(StorageError::InvalidReference(format!(
                "{} {} does not exist",
                label, id
            )));
        }
        Ok(())
    }

    async fn collect_ids(&self, collection: &str, filter: Document) -> StorageResult<Vec<i64>> {
        let cursor = self
            .db
            .collection::<Document>(collection)
            .find(filter)
            .await
            .with_context(|| format!("Failed to query {}", collection))?;
        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .with_context(|| format!("Failed to read {} cursor", collection))?;
        docs.iter()
            .map(|doc| {
                doc.get_i64("_id")
                    .with_context(|| format!("{} row has non-integer _id", collection))
                    .map_err(StorageError::from)
            })
            .collect()
    }

    /// Dependent-row cascade shared by chapter and subject deletion: answers
    /// of the chapters' sessions, the sessions, questions, then subtopics.
    /// The chapter rows themselves are removed by the caller.
    async fn cascade_chapters(&self, chapter_ids: &[i64]) -> StorageResult<()> {
        if chapter_ids.is_empty() {
            return Ok(());
        }
        let chapter_in = doc! { "$in": chapter_ids.to_vec() };
        let session_ids = self
            .collect_ids(QUIZ_SESSIONS, doc! { "chapterId": chapter_in.clone() })
            .await?;
        if !session_ids.is_empty() {
            self.delete_matching(QUIZ_ANSWERS, doc! { "sessionId": { "$in": session_ids } })
                .await?;
        }
        self.delete_matching(QUIZ_SESSIONS, doc! { "chapterId": chapter_in.clone() })
            .await?;
        self.delete_matching(QUESTIONS, doc! { "chapterId": chapter_in.clone() })
            .await?;
        self.delete_matching(SUBTOPICS, doc! { "chapterId": chapter_in })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Storage for MongoStorage {
    async fn ping(&self) -> StorageResult<()> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(())
    }

    // Subjects

    async fn list_subjects(&self) -> StorageResult<Vec<Subject>> {
        self.fetch_all(SUBJECTS, doc! {}).await
    }

    async fn create_subject(&self, data: CreateSubjectRequest) -> StorageResult<Subject> {
        let subject = Subject {
            id: self.next_id(SUBJECTS).await?,
            name: data.name,
            color: data.color,
        };
        self.insert_row(SUBJECTS, &subject).await?;
        Ok(subject)
    }

    async fn update_subject(
        &self,
        id: i64,
        data: UpdateSubjectRequest,
    ) -> StorageResult<Option<Subject>> {
        let Some(mut subject) = self.find_by_id::<Subject>(SUBJECTS, id).await? else {
            return Ok(None);
        };
        data.apply(&mut subject);
        self.replace_row(SUBJECTS, id, &subject).await?;
        Ok(Some(subject))
    }

    async fn delete_subject(&self, id: i64) -> StorageResult<()> {
        let chapter_ids = self.collect_ids(CHAPTERS, doc! { "subjectId": id }).await?;
        self.cascade_chapters(&chapter_ids).await?;
        self.delete_matching(CHAPTERS, doc! { "subjectId": id }).await?;
        self.delete_by_id(SUBJECTS, id).await
    }

    // Chapters

    async fn list_chapters(&self) -> StorageResult<Vec<Chapter>> {
        self.fetch_all(CHAPTERS, doc! {}).await
    }

    async fn list_chapters_by_subject(&self, subject_id: i64) -> StorageResult<Vec<Chapter>> {
        self.fetch_all(CHAPTERS, doc! { "subjectId": subject_id }).await
    }

    async fn get_chapter(&self, id: i64) -> StorageResult<Option<Chapter>> {
        self.find_by_id(CHAPTERS, id).await
    }

    async fn create_chapter(&self, data: CreateChapterRequest) -> StorageResult<Chapter> {
        self.ensure_exists(SUBJECTS, "Subject", data.subject_id).await?;
        let chapter = Chapter {
            id: self.next_id(CHAPTERS).await?,
            subject_id: data.subject_id,
            title: data.title,
            description: data.description,
            progress: data.progress,
            total_questions: data.total_questions,
            difficulty: data.difficulty,
        };
        self.insert_row(CHAPTERS, &chapter).await?;
        Ok(chapter)
    }

    async fn update_chapter(
        &self,
        id: i64,
        data: UpdateChapterRequest,
    ) -> StorageResult<Option<Chapter>> {
        if let Some(subject_id) = data.subject_id {
            self.ensure_exists(SUBJECTS, "Subject", subject_id).await?;
        }
        let Some(mut chapter) = self.find_by_id::<Chapter>(CHAPTERS, id).await? else {
            return Ok(None);
        };
        data.apply(&mut chapter);
        self.replace_row(CHAPTERS, id, &chapter).await?;
        Ok(Some(chapter))
    }

    async fn delete_chapter(&self, id: i64) -> StorageResult<()> {
        self.cascade_chapters(&[id]).await?;
        self.delete_by_id(CHAPTERS, id).await
    }

    // Subtopics

    async fn list_subtopics(&self) -> StorageResult<Vec<Subtopic>> {
        self.fetch_all(SUBTOPICS, doc! {}).await
    }

    async fn list_subtopics_by_chapter(&self, chapter_id: i64) -> StorageResult<Vec<Subtopic>> {
        self.fetch_all(SUBTOPICS, doc! { "chapterId": chapter_id }).await
    }

    async fn create_subtopic(&self, data: CreateSubtopicRequest) -> StorageResult<Subtopic> {
        self.ensure_exists(CHAPTERS, "Chapter", data.chapter_id).await?;
        let subtopic = Subtopic {
            id: self.next_id(SUBTOPICS).await?,
            chapter_id: data.chapter_id,
            title: data.title,
            description: data.description,
        };
        self.insert_row(SUBTOPICS, &subtopic).await?;
        Ok(subtopic)
    }

    async fn delete_subtopic(&self, id: i64) -> StorageResult<()> {
        self.delete_by_id(SUBTOPICS, id).await
    }

    // Questions

    async fn list_questions(&self) -> StorageResult<Vec<Question>> {
        self.fetch_all(QUESTIONS, doc! {}).await
    }

    async fn list_questions_by_chapter(&self, chapter_id: i64) -> StorageResult<Vec<Question>> {
        self.fetch_all(QUESTIONS, doc! { "chapterId": chapter_id }).await
    }

    async fn list_questions_by_subtopic(&self, subtopic_id: i64) -> StorageResult<Vec<Question>> {
        self.fetch_all(QUESTIONS, doc! { "subtopicId": subtopic_id }).await
    }

    async fn create_question(&self, data: CreateQuestionRequest) -> StorageResult<Question> {
        self.ensure_exists(CHAPTERS, "Chapter", data.chapter_id).await?;
        if let Some(subtopic_id) = data.subtopic_id {
            self.ensure_exists(SUBTOPICS, "Subtopic", subtopic_id).await?;
        }
        let question = Question {
            id: self.next_id(QUESTIONS).await?,
            chapter_id: data.chapter_id,
            subtopic_id: data.subtopic_id,
            question: data.question,
            options: data.options,
            correct_answer: data.correct_answer,
            explanation: data.explanation,
            difficulty: data.difficulty,
        };
        self.insert_row(QUESTIONS, &question).await?;
        Ok(question)
    }

    async fn bulk_create_questions(
        &self,
        chapter_id: i64,
        items: Vec<BulkQuestionItem>,
    ) -> StorageResult<Vec<Question>> {
        self.ensure_exists(CHAPTERS, "Chapter", chapter_id).await?;

        let first_id = self.next_ids(QUESTIONS, items.len() as i64).await?;
        let questions: Vec<Question> = items
            .into_iter()
            .enumerate()
            .map(|(offset, item)| {
                bulk_item_into_question(first_id + offset as i64, chapter_id, item)
            })
            .collect();

        let docs = questions
            .iter()
            .map(into_doc)
            .collect::<anyhow::Result<Vec<Document>>>()?;
        self.db
            .collection::<Document>(QUESTIONS)
            .insert_many(docs)
            .await
            .context("Failed to bulk insert questions")?;

        Ok(questions)
    }

    async fn update_question(
        &self,
        id: i64,
        data: UpdateQuestionRequest,
    ) -> StorageResult<Option<Question>> {
        if let Some(chapter_id) = data.chapter_id {
            self.ensure_exists(CHAPTERS, "Chapter", chapter_id).await?;
        }
        if let Some(subtopic_id) = data.subtopic_id {
            self.ensure_exists(SUBTOPICS, "Subtopic", subtopic_id).await?;
        }
        let Some(mut question) = self.find_by_id::<Question>(QUESTIONS, id).await? else {
            return Ok(None);
        };
        data.apply(&mut question);
        self.replace_row(QUESTIONS, id, &question).await?;
        Ok(Some(question))
    }

    async fn delete_question(&self, id: i64) -> StorageResult<()> {
        self.delete_by_id(QUESTIONS, id).await
    }

    // Quiz sessions

    async fn list_quiz_sessions(&self) -> StorageResult<Vec<QuizSession>> {
        self.fetch_all(QUIZ_SESSIONS, doc! {}).await
    }

    async fn create_quiz_session(
        &self,
        data: CreateQuizSessionRequest,
    ) -> StorageResult<QuizSession> {
        self.ensure_exists(CHAPTERS, "Chapter", data.chapter_id).await?;
        let session = QuizSession {
            id: self.next_id(QUIZ_SESSIONS).await?,
            chapter_id: data.chapter_id,
            total_questions: data.total_questions,
            current_question: data.current_question,
            score: data.score,
            is_completed: data.is_completed,
            created_at: Utc::now(),
        };
        check_session_score(&session)?;
        self.insert_row(QUIZ_SESSIONS, &session).await?;
        Ok(session)
    }

    async fn update_quiz_session(
        &self,
        id: i64,
        data: UpdateQuizSessionRequest,
    ) -> StorageResult<Option<QuizSession>> {
        if let Some(chapter_id) = data.chapter_id {
            self.ensure_exists(CHAPTERS, "Chapter", chapter_id).await?;
        }
        let Some(mut session) = self.find_by_id::<QuizSession>(QUIZ_SESSIONS, id).await? else {
            return Ok(None);
        };
        data.apply(&mut session);
        check_session_score(&session)?;
        self.replace_row(QUIZ_SESSIONS, id, &session).await?;
        Ok(Some(session))
    }

    async fn delete_quiz_session(&self, id: i64) -> StorageResult<()> {
        self.delete_by_id(QUIZ_SESSIONS, id).await
    }

    // Quiz answers

    async fn list_quiz_answers(&self) -> StorageResult<Vec<QuizAnswer>> {
        self.fetch_all(QUIZ_ANSWERS, doc! {}).await
    }

    async fn list_quiz_answers_by_session(
        &self,
        session_id: i64,
    ) -> StorageResult<Vec<QuizAnswer>> {
        self.fetch_all(QUIZ_ANSWERS, doc! { "sessionId": session_id }).await
    }

    async fn create_quiz_answer(&self, data: CreateQuizAnswerRequest) -> StorageResult<QuizAnswer> {
        self.ensure_exists(QUIZ_SESSIONS, "Quiz session", data.session_id)
            .await?;
        self.ensure_exists(QUESTIONS, "Question", data.question_id)
            .await?;
        let answer = QuizAnswer {
            id: self.next_id(QUIZ_ANSWERS).await?,
            session_id: data.session_id,
            question_id: data.question_id,
            selected_answer: data.selected_answer,
            is_correct: data.is_correct,
        };
        self.insert_row(QUIZ_ANSWERS, &answer).await?;
        Ok(answer)
    }

    // Quiz stats

    async fn list_quiz_stats(&self) -> StorageResult<Vec<QuizStat>> {
        self.fetch_all(QUIZ_STATS, doc! {}).await
    }

    async fn create_quiz_stat(&self, data: CreateQuizStatRequest) -> StorageResult<QuizStat> {
        let stat = QuizStat {
            id: self.next_id(QUIZ_STATS).await?,
            date: data.date.unwrap_or_else(Utc::now),
            chapter_title: data.chapter_title,
            subtopic_title: data.subtopic_title,
            subject_title: data.subject_title,
            score: data.score,
            total_questions: data.total_questions,
            percentage: data.percentage,
        };
        self.insert_row(QUIZ_STATS, &stat).await?;
        Ok(stat)
    }

    // Files

    async fn list_files(&self) -> StorageResult<Vec<FileRecord>> {
        self.fetch_all(FILES, doc! {}).await
    }

    async fn create_file(&self, data: CreateFileRequest) -> StorageResult<FileRecord> {
        let file = FileRecord {
            id: self.next_id(FILES).await?,
            name: data.name,
            kind: data.kind,
            size: data.size,
            path: data.path,
            created_at: Utc::now(),
        };
        self.insert_row(FILES, &file).await?;
        Ok(file)
    }

    async fn delete_file(&self, id: i64) -> StorageResult<()> {
        self.delete_by_id(FILES, id).await
    }

    // Folders

    async fn list_folders(&self) -> StorageResult<Vec<Folder>> {
        self.fetch_all(FOLDERS, doc! {}).await
    }

    async fn create_folder(&self, data: CreateFolderRequest) -> StorageResult<Folder> {
        let folder = Folder {
            id: self.next_id(FOLDERS).await?,
            name: data.name,
            path: data.path,
            created_at: Utc::now(),
        };
        self.insert_row(FOLDERS, &folder).await?;
        Ok(folder)
    }

    async fn delete_folder(&self, id: i64) -> StorageResult<()> {
        self.delete_by_id(FOLDERS, id).await
    }

    // Messages

    async fn list_messages(&self) -> StorageResult<Vec<Message>> {
        self.fetch_all(MESSAGES, doc! {}).await
    }

    async fn create_message(&self, data: CreateMessageRequest) -> StorageResult<Message> {
        let message = Message {
            id: self.next_id(MESSAGES).await?,
            text: data.text,
            timestamp: Utc::now(),
            sender: data.sender,
        };
        self.insert_row(MESSAGES, &message).await?;
        Ok(message)
    }

    async fn delete_message(&self, id: i64) -> StorageResult<()> {
        self.delete_by_id(MESSAGES, id).await
    }

    async fn clear_messages(&self) -> StorageResult<()> {
        self.delete_matching(MESSAGES, doc! {}).await
    }

    // Study sessions

    async fn list_study_sessions(&self) -> StorageResult<Vec<StudySession>> {
        self.fetch_all(STUDY_SESSIONS, doc! {}).await
    }

    async fn create_study_session(
        &self,
        data: CreateStudySessionRequest,
    ) -> StorageResult<StudySession> {
        let session = StudySession {
            id: self.next_id(STUDY_SESSIONS).await?,
            chapter_id: data.chapter_id,
            duration: data.duration,
            date: data.date.unwrap_or_else(Utc::now),
        };
        self.insert_row(STUDY_SESSIONS, &session).await?;
        Ok(session)
    }

    // Schedule events

    async fn list_schedule_events(&self) -> StorageResult<Vec<ScheduleEvent>> {
        self.fetch_all(SCHEDULE_EVENTS, doc! {}).await
    }

    async fn create_schedule_event(
        &self,
        data: CreateScheduleEventRequest,
    ) -> StorageResult<ScheduleEvent> {
        let event = ScheduleEvent {
            id: self.next_id(SCHEDULE_EVENTS).await?,
            title: data.title,
            description: data.description,
            date: data.date,
            time: data.time,
            kind: data.kind,
        };
        self.insert_row(SCHEDULE_EVENTS, &event).await?;
        Ok(event)
    }

    async fn update_schedule_event(
        &self,
        id: i64,
        data: UpdateScheduleEventRequest,
    ) -> StorageResult<Option<ScheduleEvent>> {
        let Some(mut event) = self.find_by_id::<ScheduleEvent>(SCHEDULE_EVENTS, id).await? else {
            return Ok(None);
        };
        data.apply(&mut event);
        self.replace_row(SCHEDULE_EVENTS, id, &event).await?;
        Ok(Some(event))
    }

    async fn delete_schedule_event(&self, id: i64) -> StorageResult<()> {
        self.delete_by_id(SCHEDULE_EVENTS, id).await
    }

    async fn clear_all(&self) -> StorageResult<()> {
        // Children before parents; counters are left alone so ids keep
        // incrementing, like database sequences survive a truncate.
        for collection in [
            QUIZ_ANSWERS,
            QUIZ_SESSIONS,
            QUESTIONS,
            SUBTOPICS,
            CHAPTERS,
            SUBJECTS,
            QUIZ_STATS,
            FILES,
            FOLDERS,
            MESSAGES,
            STUDY_SESSIONS,
            SCHEDULE_EVENTS,
        ] {
            self.delete_matching(collection, doc! {}).await?;
        }
        Ok(())
    }
}

/// Serializes a row, moving `id` into Mongo's `_id` slot.
fn into_doc<T: Serialize>(row: &T) -> anyhow::Result<Document> {
    let mut doc = mongodb::bson::to_document(row).context("Failed to serialize row")?;
    if let Some(id) = doc.remove("id") {
        doc.insert("_id", id);
    }
    Ok(doc)
}

/// Inverse of [`into_doc`].
fn from_doc<T: DeserializeOwned>(mut doc: Document) -> anyhow::Result<T> {
    if let Some(id) = doc.remove("_id") {
        doc.insert("id", id);
    }
    mongodb::bson::from_document(doc).context("Failed to deserialize row")
}
