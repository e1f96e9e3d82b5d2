use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
};

use time::OffsetDateTime;
use tokio::{
    sync::{Mutex, mpsc, oneshot},
    task::JoinHandle,
};

use super::{event::LogEvent, sink::EventSink};

/// Queue and batching limits for [`EventLogger`].
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Slots in the producer/consumer queue. Publishes beyond this are dropped.
    pub queue_capacity: usize,
    /// Most events handed to the sink in one blocking write.
    pub batch_max_events: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            batch_max_events: 64,
        }
    }
}

struct Shutdown {
    close_tx: oneshot::Sender<()>,
    worker: JoinHandle<()>,
}

/// Fire-and-forget event pipeline with a single background consumer.
///
/// [`publish`](Self::publish) never waits: a full queue drops the event.
/// [`close`](Self::close) stops intake and waits until everything already
/// queued has reached the sink.
pub struct EventLogger {
    tx: mpsc::Sender<LogEvent>,
    // Held across the drain so every close() caller returns only after it.
    shutdown: Mutex<Option<Shutdown>>,
}

/// Starts the consumer task on the current tokio runtime.
pub fn spawn_event_logger(sink: Box<dyn EventSink>, config: LoggerConfig) -> EventLogger {
    let (tx, rx) = mpsc::channel::<LogEvent>(config.queue_capacity.max(1));
    let (close_tx, close_rx) = oneshot::channel();
    let worker = tokio::spawn(run_consumer(
        sink,
        rx,
        close_rx,
        config.batch_max_events.max(1),
    ));

    EventLogger {
        tx,
        shutdown: Mutex::new(Some(Shutdown { close_tx, worker })),
    }
}

impl EventLogger {
    /// Enqueues `event`, or drops it if the queue is full or closed.
    pub fn publish(&self, event: LogEvent) {
        let _ = self.tx.try_send(event);
    }

    /// True once [`close`](Self::close) has stopped intake.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Stops intake and waits for the consumer to drain and exit.
    ///
    /// Only the first call signals the consumer. Every call, including ones
    /// racing the first, returns only once the drain has finished.
    pub async fn close(&self) {
        let mut shutdown = self.shutdown.lock().await;
        let Some(Shutdown { close_tx, worker }) = shutdown.take() else {
            return;
        };

        let _ = close_tx.send(());
        if let Err(err) = worker.await {
            tracing::error!(error = %err, "event logger consumer ended abnormally");
        }
    }
}

async fn run_consumer(
    sink: Box<dyn EventSink>,
    mut rx: mpsc::Receiver<LogEvent>,
    mut close_rx: oneshot::Receiver<()>,
    batch_max: usize,
) {
    let sink = Arc::new(Mutex::new(sink));
    let mut buf = Vec::<LogEvent>::with_capacity(batch_max);
    let mut written = 0usize;

    loop {
        tokio::select! {
            biased;
            // Fires on close() and also if the logger is dropped unclosed.
            _ = &mut close_rx => {
                rx.close();
                while let Some(event) = rx.recv().await {
                    buf.push(event);
                    if buf.len() >= batch_max {
                        written += write_batch(&sink, &mut buf).await;
                    }
                }
                written += write_batch(&sink, &mut buf).await;
                break;
            }
            event = rx.recv() => {
                let Some(event) = event else { break; };
                buf.push(event);
                while buf.len() < batch_max {
                    match rx.try_recv() {
                        Ok(event) => buf.push(event),
                        Err(_) => break,
                    }
                }
                written += write_batch(&sink, &mut buf).await;
            }
        }
    }

    tracing::debug!(written, "event logger drained");
}

async fn write_batch(sink: &Arc<Mutex<Box<dyn EventSink>>>, buf: &mut Vec<LogEvent>) -> usize {
    if buf.is_empty() {
        return 0;
    }

    let mut events = std::mem::take(buf);
    let now = OffsetDateTime::now_utc();
    for event in &mut events {
        event.ts.get_or_insert(now);
    }

    let sink_ref = Arc::clone(sink);
    let res = tokio::task::spawn_blocking(move || {
        let mut sink = sink_ref.blocking_lock();
        let mut ok = 0usize;
        for event in &events {
            match catch_unwind(AssertUnwindSafe(|| sink.write_event(event))) {
                Ok(Ok(())) => ok += 1,
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, action = %event.action, "event dropped by sink");
                }
                Err(_) => {
                    tracing::error!(action = %event.action, "event sink panicked; event dropped");
                }
            }
        }
        if let Err(err) = sink.flush() {
            tracing::warn!(error = %err, "event sink flush failed");
        }
        ok
    })
    .await;

    match res {
        Ok(ok) => ok,
        Err(err) => {
            tracing::error!(error = %err, "event sink batch aborted");
            0
        }
    }
}
