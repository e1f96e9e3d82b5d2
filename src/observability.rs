//! Diagnostic tracing setup.
//!
//! Diagnostics go to stderr; stdout carries only the event stream.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the global subscriber with the default `info` level.
pub fn init_tracing() {
    init_tracing_with_level("info");
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over `level`.
///
/// A second call is a no-op.
pub fn init_tracing_with_level(level: &str) {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|_| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
