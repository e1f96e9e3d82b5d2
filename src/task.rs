//! Task entity, creation draft, and the normalization rule applied before insert.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::TaskId;

/// Caller-visible, non-fatal task errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    /// Status is not one of `new`, `in_progress`, `done`.
    #[error("invalid status: {0:?}")]
    InvalidStatus(String),
    /// No task exists for the requested id.
    #[error("task {0} not found")]
    NotFound(TaskId),
}

/// Closed set of task states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Freshly created; the default.
    #[default]
    New,
    /// Work has started.
    InProgress,
    /// Finished.
    Done,
}

impl Status {
    /// Every valid status, in lifecycle order.
    pub const ALL: [Status; 3] = [Status::New, Status::InProgress, Status::Done];

    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "new",
            Status::InProgress => "in_progress",
            Status::Done => "done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TaskError::InvalidStatus(s.to_string()))
    }
}

/// Stored task. `id` and `created_at` never change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Repository-assigned identifier.
    pub id: TaskId,
    /// Non-empty, trimmed title.
    pub title: String,
    /// Trimmed description, possibly empty.
    pub description: String,
    /// Current status.
    pub status: Status,
    /// Creation instant.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Candidate task as supplied by a caller, before validation.
///
/// `status` stays a raw string here so that unknown values can be rejected
/// with [`TaskError::InvalidStatus`] instead of failing at decode time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDraft {
    /// Title text.
    pub title: String,
    /// Description text.
    pub description: String,
    /// Raw status; empty means "use the default".
    pub status: String,
    /// Creation instant; `None` means "stamp on normalization".
    pub created_at: Option<OffsetDateTime>,
}

impl TaskDraft {
    /// Draft with the given title and every other field unset.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the raw status string.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets an explicit creation instant.
    pub fn with_created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Defaults and checks the draft in place.
    ///
    /// An empty status becomes `new`; a status outside the closed set fails
    /// with [`TaskError::InvalidStatus`]; an unset `created_at` is stamped with
    /// the current UTC time. Running it again on a normalized draft changes
    /// nothing.
    pub fn normalize_and_validate(&mut self) -> Result<Status, TaskError> {
        if self.status.is_empty() {
            self.status = Status::New.as_str().to_string();
        }
        let status = self.status.parse::<Status>()?;
        if self.created_at.is_none() {
            self.created_at = Some(OffsetDateTime::now_utc());
        }
        Ok(status)
    }

    pub(crate) fn into_task(self, id: TaskId, status: Status) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            status,
            created_at: self.created_at.unwrap_or_else(OffsetDateTime::now_utc),
        }
    }
}
