//! HTTP surface over the repository and the event logger.

/// Error responses.
pub mod error;
/// Route handlers.
pub mod handlers;

use std::sync::Arc;

use axum::{Router, routing::get};

use crate::{repo::TaskRepository, runtime::logger::EventLogger};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Task storage.
    pub repo: Arc<dyn TaskRepository>,
    /// Request outcome logger.
    pub logger: Arc<EventLogger>,
}

impl AppState {
    /// Bundles a repository and a logger.
    pub fn new(repo: Arc<dyn TaskRepository>, logger: Arc<EventLogger>) -> Self {
        Self { repo, logger }
    }
}

/// Builds the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route("/tasks/{id}", get(handlers::get_task))
        .route("/health", get(handlers::health))
        .with_state(state)
}
