//! Task storage seam and the in-memory implementation.

/// Lock-guarded in-memory repository.
pub mod memory;

use crate::{
    task::{Status, Task, TaskDraft, TaskError},
    types::TaskId,
};

/// Storage operations request handlers depend on.
///
/// Implementations must be safe under any number of concurrent callers.
pub trait TaskRepository: Send + Sync {
    /// Validates `draft`, assigns the next id, and stores it.
    ///
    /// A draft that fails validation consumes no id.
    fn create(&self, draft: TaskDraft) -> Result<Task, TaskError>;

    /// Returns the task stored under `id`, or [`TaskError::NotFound`].
    fn get_by_id(&self, id: TaskId) -> Result<Task, TaskError>;

    /// Returns every task, or only those in `status`, sorted ascending by id.
    fn list(&self, status: Option<Status>) -> Result<Vec<Task>, TaskError>;
}
