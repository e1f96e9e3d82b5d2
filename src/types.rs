//! Shared primitive IDs.

/// Monotonic task identifier, assigned by the repository starting at 1.
pub type TaskId = u64;
