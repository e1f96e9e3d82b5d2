//! Structured request-outcome events.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::TaskId;

/// Event severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Normal outcome.
    #[default]
    Info,
    /// Failed outcome.
    Error,
}

/// One request outcome, handed to the logger by value.
///
/// Empty or zero fields are left out of the serialized record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogEvent {
    /// Event time; stamped by the consumer when left unset.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub ts: Option<OffsetDateTime>,
    /// Severity.
    pub level: Level,
    /// Handler action name, e.g. `create`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub action: String,
    /// HTTP method.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub method: String,
    /// Request path.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    /// Task the request touched, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    /// Task status or status filter involved.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    /// HTTP response code.
    #[serde(default, skip_serializing_if = "is_zero_u16")]
    pub http_status: u16,
    /// Handler latency in milliseconds.
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub latency_ms: u64,
    /// Error text, when the request failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
}

impl LogEvent {
    /// Event with the given level and action and everything else unset.
    pub fn new(level: Level, action: impl Into<String>) -> Self {
        Self {
            level,
            action: action.into(),
            ..Self::default()
        }
    }

    /// Sets the task id.
    pub fn with_task_id(mut self, id: TaskId) -> Self {
        self.task_id = Some(id);
        self
    }

    /// Sets the status string.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets the latency, saturating at `u64::MAX` milliseconds.
    pub fn with_latency(mut self, elapsed: Duration) -> Self {
        self.latency_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the error text.
    pub fn with_error(mut self, err: impl ToString) -> Self {
        self.err = Some(err.to_string());
        self
    }
}

fn is_zero_u16(v: &u16) -> bool {
    *v == 0
}

fn is_zero_u64(v: &u64) -> bool {
    *v == 0
}
