use axum::{
    http::{header, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod storage;

pub use config::Config;
pub use storage::AppState;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    // CORS for the separately-deployed web client
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(tower_http::cors::Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .nest("/api", api_routes())
        .with_state(app_state)
        .layer(cors)
        .layer(middleware::from_fn(
            middlewares::trace::trace_context_middleware,
        ))
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(subjects_routes())
        .merge(chapters_routes())
        .merge(subtopics_routes())
        .merge(questions_routes())
        .merge(quiz_routes())
        .merge(library_routes())
        .merge(planner_routes())
        .route("/clear-all", delete(handlers::clear_all))
}

fn subjects_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/subjects",
            get(handlers::subjects::list_subjects).post(handlers::subjects::create_subject),
        )
        .route(
            "/subjects/{id}",
            put(handlers::subjects::update_subject).delete(handlers::subjects::delete_subject),
        )
}

fn chapters_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/chapters",
            get(handlers::chapters::list_chapters).post(handlers::chapters::create_chapter),
        )
        .route(
            "/chapters/subject/{subjectId}",
            get(handlers::chapters::list_chapters_by_subject),
        )
        .route(
            "/chapters/{id}",
            get(handlers::chapters::get_chapter)
                .put(handlers::chapters::update_chapter)
                .delete(handlers::chapters::delete_chapter),
        )
}

fn subtopics_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/subtopics",
            get(handlers::subtopics::list_subtopics).post(handlers::subtopics::create_subtopic),
        )
        .route(
            "/subtopics/chapter/{chapterId}",
            get(handlers::subtopics::list_subtopics_by_chapter),
        )
        .route(
            "/subtopics/{id}",
            delete(handlers::subtopics::delete_subtopic),
        )
}

fn questions_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/questions",
            get(handlers::questions::list_questions).post(handlers::questions::create_question),
        )
        .route(
            "/questions/bulk",
            post(handlers::questions::bulk_create_questions),
        )
        .route(
            "/questions/chapter/{chapterId}",
            get(handlers::questions::list_questions_by_chapter),
        )
        .route(
            "/questions/subtopic/{subtopicId}",
            get(handlers::questions::list_questions_by_subtopic),
        )
        .route(
            "/questions/{id}",
            put(handlers::questions::update_question).delete(handlers::questions::delete_question),
        )
}

fn quiz_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/quiz-sessions",
            get(handlers::quiz::list_quiz_sessions).post(handlers::quiz::create_quiz_session),
        )
        .route(
            "/quiz-sessions/{id}",
            put(handlers::quiz::update_quiz_session).delete(handlers::quiz::delete_quiz_session),
        )
        .route(
            "/quiz-answers",
            get(handlers::quiz::list_quiz_answers).post(handlers::quiz::create_quiz_answer),
        )
        .route(
            "/quiz-answers/session/{sessionId}",
            get(handlers::quiz::list_quiz_answers_by_session),
        )
        .route(
            "/quiz-stats",
            get(handlers::quiz::list_quiz_stats).post(handlers::quiz::create_quiz_stat),
        )
}

fn library_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/files",
            get(handlers::files::list_files).post(handlers::files::create_file),
        )
        .route("/files/{id}", delete(handlers::files::delete_file))
        .route(
            "/folders",
            get(handlers::files::list_folders).post(handlers::files::create_folder),
        )
        .route("/folders/{id}", delete(handlers::files::delete_folder))
        .route(
            "/messages",
            get(handlers::messages::list_messages)
                .post(handlers::messages::create_message)
                .delete(handlers::messages::clear_messages),
        )
        .route("/messages/{id}", delete(handlers::messages::delete_message))
}

fn planner_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/study-sessions",
            get(handlers::planner::list_study_sessions)
                .post(handlers::planner::create_study_session),
        )
        .route(
            "/schedule-events",
            get(handlers::planner::list_schedule_events)
                .post(handlers::planner::create_schedule_event),
        )
        .route(
            "/schedule-events/{id}",
            put(handlers::planner::update_schedule_event)
                .delete(handlers::planner::delete_schedule_event),
        )
}
