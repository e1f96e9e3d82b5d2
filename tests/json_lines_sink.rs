use std::io::{BufRead, BufReader, Seek, SeekFrom};

use serde_json::Value;
use taskd::runtime::{
    event::{Level, LogEvent},
    logger::{LoggerConfig, spawn_event_logger},
    sink::{EventSink, JsonLinesSink},
};
use time::macros::datetime;

#[test]
fn one_record_per_line_with_empty_fields_omitted() {
    let mut sink = JsonLinesSink::new(Vec::new());
    sink.write_event(&LogEvent {
        ts: Some(datetime!(2024-05-06 7:08:09 UTC)),
        method: "POST".into(),
        path: "/tasks".into(),
        http_status: 201,
        latency_ms: 3,
        ..LogEvent::new(Level::Info, "create")
            .with_task_id(7)
            .with_status("new")
    })
    .expect("write");
    sink.write_event(&LogEvent::new(Level::Error, "get").with_error("boom"))
        .expect("write");
    sink.flush().expect("flush");

    let out = String::from_utf8(sink.into_inner()).expect("utf8");
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(out.ends_with('\n'));

    let first: Value = serde_json::from_str(lines[0]).expect("json");
    assert_eq!(first["ts"], "2024-05-06T07:08:09Z");
    assert_eq!(first["level"], "info");
    assert_eq!(first["action"], "create");
    assert_eq!(first["method"], "POST");
    assert_eq!(first["path"], "/tasks");
    assert_eq!(first["task_id"], 7);
    assert_eq!(first["status"], "new");
    assert_eq!(first["http_status"], 201);
    assert_eq!(first["latency_ms"], 3);
    assert!(first.get("err").is_none());

    let second: Value = serde_json::from_str(lines[1]).expect("json");
    assert_eq!(second["level"], "error");
    assert_eq!(second["err"], "boom");
    for absent in ["ts", "method", "task_id", "status", "http_status", "latency_ms"] {
        assert!(second.get(absent).is_none(), "{absent} should be omitted");
    }
}

#[tokio::test]
async fn logger_writes_file_in_publish_order() {
    let mut file = tempfile::tempfile().expect("tempfile");
    let writer = file.try_clone().expect("clone handle");

    let logger = spawn_event_logger(
        Box::new(JsonLinesSink::new(writer)),
        LoggerConfig {
            queue_capacity: 64,
            batch_max_events: 8,
        },
    );
    for i in 1..=50u64 {
        logger.publish(LogEvent::new(Level::Info, "create").with_task_id(i));
    }
    logger.close().await;

    file.seek(SeekFrom::Start(0)).expect("seek");
    let records: Vec<LogEvent> = BufReader::new(file)
        .lines()
        .map(|line| serde_json::from_str(&line.expect("line")).expect("decode"))
        .collect();

    assert_eq!(records.len(), 50);
    for (i, rec) in records.iter().enumerate() {
        assert_eq!(rec.task_id, Some(i as u64 + 1));
        assert!(rec.ts.is_some(), "consumer stamps ts");
    }
}

#[test]
fn latency_is_whole_milliseconds_and_saturates() {
    use std::time::Duration;

    let event = LogEvent::new(Level::Info, "get").with_latency(Duration::from_micros(1_500_900));
    assert_eq!(event.latency_ms, 1_500);

    let event = LogEvent::new(Level::Info, "get").with_latency(Duration::MAX);
    assert_eq!(event.latency_ms, u64::MAX);
}
