use std::sync::Arc;

use anyhow::Context;
use taskd::{
    config::load_config,
    http::{AppState, router},
    observability::init_tracing_with_level,
    repo::memory::MemoryRepo,
    runtime::{logger::spawn_event_logger, sink::JsonLinesSink},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: failed to load .env file: {e}");
        }
    }

    let config_path = config_path();
    let cfg = load_config(config_path.as_deref()).context("configuration error")?;
    init_tracing_with_level(&cfg.logging.level);

    let repo = Arc::new(MemoryRepo::new());
    let logger = Arc::new(spawn_event_logger(
        Box::new(JsonLinesSink::stdout()),
        cfg.logger_config(),
    ));
    let app = router(AppState::new(repo, Arc::clone(&logger)));

    let addr = cfg.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    tracing::info!(%addr, queue_capacity = cfg.logging.queue_capacity, "listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    if let Err(err) = &served {
        tracing::error!(error = %err, "server error");
    }

    logger.close().await;
    tracing::info!("server exited");
    served.context("serve")
}

/// `--config <path>` wins over `TASKD_CONFIG`; `None` means the default path.
fn config_path() -> Option<String> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next();
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(path.to_string());
        }
    }
    std::env::var("TASKD_CONFIG").ok().filter(|p| !p.is_empty())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
