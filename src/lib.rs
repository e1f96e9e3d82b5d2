//! In-memory task service with an asynchronous, drop-on-full event log.
//!
//! # Examples
//!
//! Repository usage with [`repo::memory::MemoryRepo`]:
//! ```
//! use taskd::{
//!     repo::{memory::MemoryRepo, TaskRepository},
//!     task::{Status, TaskDraft},
//! };
//!
//! let repo = MemoryRepo::new();
//! let task = repo.create(TaskDraft::new("write report")).expect("create");
//! assert_eq!(task.id, 1);
//! assert_eq!(task.status, Status::New);
//! assert_eq!(repo.list(Some(Status::New)).expect("list").len(), 1);
//! ```
//!
//! Event logger usage with the stdout JSON-lines sink:
//! ```no_run
//! use taskd::runtime::{
//!     event::{Level, LogEvent},
//!     logger::{spawn_event_logger, LoggerConfig},
//!     sink::JsonLinesSink,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let logger = spawn_event_logger(Box::new(JsonLinesSink::stdout()), LoggerConfig::default());
//! logger.publish(LogEvent::new(Level::Info, "create").with_task_id(1));
//! logger.close().await;
//! # }
//! ```
#![deny(missing_docs)]

/// Configuration loading.
pub mod config;
/// HTTP routes and handlers.
pub mod http;
/// Diagnostic tracing setup.
pub mod observability;
/// Task storage.
pub mod repo;
/// Event logging pipeline.
pub mod runtime;
/// Task entity and validation.
pub mod task;
/// Shared primitive types.
pub mod types;
