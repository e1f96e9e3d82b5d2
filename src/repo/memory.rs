use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::{
    task::{Status, Task, TaskDraft, TaskError},
    types::TaskId,
};

use super::TaskRepository;

#[derive(Debug, Default)]
struct Inner {
    seq: TaskId,
    tasks: HashMap<TaskId, Task>,
}

/// In-memory task store.
///
/// A single reader/writer lock guards the id sequence and the map together,
/// so an id is never visible before its task is, and readers never block
/// each other.
#[derive(Debug, Default)]
pub struct MemoryRepo {
    inner: RwLock<Inner>,
}

impl MemoryRepo {
    /// Empty store whose first assigned id is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tasks.
    pub fn len(&self) -> usize {
        self.inner.read().tasks.len()
    }

    /// True when nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Last id handed out, or 0 before the first create.
    pub fn last_id(&self) -> TaskId {
        self.inner.read().seq
    }
}

impl TaskRepository for MemoryRepo {
    fn create(&self, mut draft: TaskDraft) -> Result<Task, TaskError> {
        let status = draft.normalize_and_validate()?;

        let mut inner = self.inner.write();
        inner.seq += 1;
        let task = draft.into_task(inner.seq, status);
        inner.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    fn get_by_id(&self, id: TaskId) -> Result<Task, TaskError> {
        self.inner
            .read()
            .tasks
            .get(&id)
            .cloned()
            .ok_or(TaskError::NotFound(id))
    }

    fn list(&self, status: Option<Status>) -> Result<Vec<Task>, TaskError> {
        let mut out: Vec<Task> = {
            let inner = self.inner.read();
            inner
                .tasks
                .values()
                .filter(|task| status.is_none_or(|s| task.status == s))
                .cloned()
                .collect()
        };

        // HashMap iteration order is arbitrary.
        out.sort_unstable_by_key(|task| task.id);
        Ok(out)
    }
}
