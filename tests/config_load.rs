use std::io::Write;

use taskd::config::{AppConfig, ConfigError, load_config};

#[test]
fn defaults_are_valid() {
    let cfg = AppConfig::default();
    cfg.validate().expect("valid");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.logging.queue_capacity, 256);
    assert_eq!(cfg.addr().to_string(), "0.0.0.0:8080");
}

#[test]
fn file_values_override_defaults() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("tempfile");
    writeln!(
        file,
        "[server]\nhost = \"127.0.0.1\"\nport = 9191\n\n[logging]\nlevel = \"debug\"\nqueue_capacity = 16"
    )
    .expect("write");

    let cfg = load_config(file.path().to_str()).expect("load");
    // A PORT in the test environment would win over the file.
    if std::env::var("PORT").is_err() {
        assert_eq!(cfg.server.port, 9191);
    }
    assert_eq!(cfg.server.host, "127.0.0.1");
    assert_eq!(cfg.logging.level, "debug");
    assert_eq!(cfg.logging.queue_capacity, 16);
    assert_eq!(cfg.logging.batch_max_events, 64);
    assert_eq!(cfg.logger_config().queue_capacity, 16);
}

#[test]
fn invalid_values_are_rejected() {
    let mut cfg = AppConfig::default();
    cfg.logging.queue_capacity = 0;
    assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

    let mut cfg = AppConfig::default();
    cfg.logging.level = "loud".into();
    assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

    let mut cfg = AppConfig::default();
    cfg.server.port = 0;
    assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
}
