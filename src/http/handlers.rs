use std::time::Instant;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    runtime::event::{Level, LogEvent},
    task::{Status, TaskDraft, TaskError},
    types::TaskId,
};

use super::{AppState, error::ApiError};

/// Body of `POST /tasks`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTaskRequest {
    /// Required title.
    #[serde(default)]
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: String,
    /// Optional status; defaults to `new`.
    #[serde(default)]
    pub status: String,
}

struct RequestLog {
    method: String,
    path: String,
    start: Instant,
}

impl RequestLog {
    fn start(method: &Method, uri: &Uri) -> Self {
        Self {
            method: method.to_string(),
            path: uri.path().to_string(),
            start: Instant::now(),
        }
    }

    fn event(&self, level: Level, action: &str, code: StatusCode) -> LogEvent {
        LogEvent {
            method: self.method.clone(),
            path: self.path.clone(),
            http_status: code.as_u16(),
            ..LogEvent::new(level, action)
        }
        .with_latency(self.start.elapsed())
    }
}

/// `GET /tasks[?status=..]`
pub async fn list_tasks(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    let log = RequestLog::start(&method, &uri);
    // First `status` wins; an unreadable query string means no filter.
    let filter = params
        .ok()
        .and_then(|Query(pairs)| {
            pairs
                .into_iter()
                .find_map(|(key, value)| (key == "status").then_some(value))
        })
        .unwrap_or_default();

    let result = if filter.is_empty() {
        state.repo.list(None)
    } else {
        match filter.parse::<Status>() {
            Ok(status) => state.repo.list(Some(status)),
            // An unknown status matches nothing.
            Err(_) => Ok(Vec::new()),
        }
    };

    match result {
        Ok(tasks) => {
            state
                .logger
                .publish(log.event(Level::Info, "list", StatusCode::OK).with_status(filter));
            (StatusCode::OK, Json(tasks)).into_response()
        }
        Err(err) => {
            let api = ApiError::internal("list failed");
            state.logger.publish(
                log.event(Level::Error, "list", api.code)
                    .with_status(filter)
                    .with_error(&err),
            );
            api.into_response()
        }
    }
}

/// `GET /tasks/{id}`
pub async fn get_task(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    raw_id: Result<Path<String>, PathRejection>,
) -> Response {
    let log = RequestLog::start(&method, &uri);

    let Some(id) = raw_id.ok().and_then(|Path(raw)| parse_id(&raw)) else {
        let api = ApiError::not_found("not found");
        state.logger.publish(
            log.event(Level::Error, "get", api.code)
                .with_error("route not matched"),
        );
        return api.into_response();
    };

    match state.repo.get_by_id(id) {
        Ok(task) => {
            state.logger.publish(
                log.event(Level::Info, "get", StatusCode::OK)
                    .with_task_id(id)
                    .with_status(task.status.as_str()),
            );
            (StatusCode::OK, Json(task)).into_response()
        }
        Err(err @ TaskError::NotFound(_)) => {
            let api = ApiError::not_found("task not found");
            state.logger.publish(
                log.event(Level::Info, "get", api.code)
                    .with_task_id(id)
                    .with_error(&err),
            );
            api.into_response()
        }
        Err(err) => {
            let api = ApiError::internal("get failed");
            state.logger.publish(
                log.event(Level::Error, "get", api.code)
                    .with_task_id(id)
                    .with_error(&err),
            );
            api.into_response()
        }
    }
}

/// `POST /tasks`
pub async fn create_task(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Response {
    let log = RequestLog::start(&method, &uri);

    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let api = ApiError::bad_request("invalid json");
            state.logger.publish(
                log.event(Level::Error, "create", api.code)
                    .with_error(rejection.body_text()),
            );
            return api.into_response();
        }
    };

    let draft = TaskDraft::new(req.title.trim())
        .with_description(req.description.trim())
        .with_status(req.status.trim());

    if draft.title.is_empty() {
        let api = ApiError::bad_request("title is required");
        state.logger.publish(
            log.event(Level::Error, "create", api.code)
                .with_status(draft.status)
                .with_error("title required"),
        );
        return api.into_response();
    }

    let requested_status = draft.status.clone();
    match state.repo.create(draft) {
        Ok(task) => {
            state.logger.publish(
                log.event(Level::Info, "create", StatusCode::CREATED)
                    .with_task_id(task.id)
                    .with_status(task.status.as_str()),
            );
            let location = format!("/tasks/{}", task.id);
            (
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(task),
            )
                .into_response()
        }
        Err(err) => {
            let api = match &err {
                TaskError::InvalidStatus(_) => ApiError::bad_request("invalid status"),
                _ => ApiError::internal("create failed"),
            };
            state.logger.publish(
                log.event(Level::Error, "create", api.code)
                    .with_status(requested_status)
                    .with_error(&err),
            );
            api.into_response()
        }
    }
}

/// `GET /health`
pub async fn health() -> &'static str {
    "ok"
}

fn parse_id(raw: &str) -> Option<TaskId> {
    raw.parse::<TaskId>().ok().filter(|id| *id > 0)
}
