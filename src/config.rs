//! Service configuration: optional TOML file, then environment overrides.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::runtime::logger::LoggerConfig;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "taskd.toml";

const VALID_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Configuration load or validation failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File or environment source could not be read or deserialized.
    #[error("config load error: {0}")]
    Load(#[from] ::config::ConfigError),
    /// `PORT` was set but is not a port number.
    #[error("invalid PORT value: {0:?}")]
    Port(String),
    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Diagnostics and event logger settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Diagnostics level and event queue sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Diagnostic filter used when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
    /// Event queue slots.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Events per sink write.
    #[serde(default = "default_batch_max_events")]
    pub batch_max_events: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_level() -> String {
    "info".to_string()
}

fn default_queue_capacity() -> usize {
    LoggerConfig::default().queue_capacity
}

fn default_batch_max_events() -> usize {
    LoggerConfig::default().batch_max_events
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            queue_capacity: default_queue_capacity(),
            batch_max_events: default_batch_max_events(),
        }
    }
}

impl AppConfig {
    /// Rejects values the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be > 0".into()));
        }
        if self.logging.queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "logging.queue_capacity must be > 0".into(),
            ));
        }
        if self.logging.batch_max_events == 0 {
            return Err(ConfigError::Invalid(
                "logging.batch_max_events must be > 0".into(),
            ));
        }
        let level = self.logging.level.to_ascii_lowercase();
        if !VALID_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.level must be one of {VALID_LEVELS:?}"
            )));
        }
        Ok(())
    }

    /// Socket address to bind. An unparsable host falls back to `0.0.0.0`.
    pub fn addr(&self) -> SocketAddr {
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        SocketAddr::from((host, self.server.port))
    }

    /// Event logger settings derived from `logging`.
    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            queue_capacity: self.logging.queue_capacity,
            batch_max_events: self.logging.batch_max_events,
        }
    }
}

/// Loads configuration.
///
/// Sources, lowest priority first: the file at `path` (or
/// [`DEFAULT_CONFIG_PATH`]) if it exists, `TASKD__SECTION__KEY` variables,
/// and finally a bare `PORT` variable.
pub fn load_config(path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();
    let file = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_PATH));
    if file.exists() {
        builder = builder.add_source(File::from(file));
    }
    builder = builder.add_source(
        Environment::with_prefix("TASKD")
            .try_parsing(true)
            .separator("__"),
    );

    let mut cfg: AppConfig = builder.build()?.try_deserialize()?;

    if let Ok(port) = std::env::var("PORT") {
        if !port.is_empty() {
            cfg.server.port = port.parse().map_err(|_| ConfigError::Port(port))?;
        }
    }

    cfg.validate()?;
    Ok(cfg)
}
