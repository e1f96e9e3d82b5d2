//! Output sinks for serialized events.

use std::io::{self, Write};

use super::event::LogEvent;

/// Failure writing a single event.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Underlying writer failed.
    #[error("sink io: {0}")]
    Io(#[from] io::Error),
    /// Event could not be encoded.
    #[error("sink encode: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result alias for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// Destination owned by the logger's consumer task.
///
/// Calls are made from the blocking pool, one at a time, in queue order.
pub trait EventSink: Send {
    /// Serializes one event. An error here drops only this event.
    fn write_event(&mut self, event: &LogEvent) -> SinkResult<()>;

    /// Pushes buffered output through. Called after every batch.
    fn flush(&mut self) -> SinkResult<()> {
        Ok(())
    }
}

/// Writes each event as one JSON object per line.
pub struct JsonLinesSink<W: Write + Send> {
    out: W,
}

impl JsonLinesSink<io::Stdout> {
    /// Sink over the process standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> JsonLinesSink<W> {
    /// Sink over an arbitrary writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> EventSink for JsonLinesSink<W> {
    fn write_event(&mut self, event: &LogEvent) -> SinkResult<()> {
        // Encode fully before touching the writer so a bad event never
        // leaves half a line behind.
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');
        self.out.write_all(&line)?;
        Ok(())
    }

    fn flush(&mut self) -> SinkResult<()> {
        self.out.flush()?;
        Ok(())
    }
}
