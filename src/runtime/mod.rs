//! Asynchronous, drop-on-full event logging pipeline.

/// Event record and severity.
pub mod event;
/// Bounded queue, consumer task, and shutdown handle.
pub mod logger;
/// Sink trait and the JSON-lines implementation.
pub mod sink;
