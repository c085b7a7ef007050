//! Structured logging setup
//!
//! Logs go to stderr so they never interleave with the interactive prompts on
//! stdout, or to a file under `log_dir` when one is configured.

use crate::error::{BioAlgosError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt as stdfmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{Level, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use validator::Validate;

/// Log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        LevelFilter::from_level(level.into())
    }
}

impl stdfmt::Display for LogLevel {
    fn fmt(&self, f: &mut stdfmt::Formatter<'_>) -> stdfmt::Result {
        let name = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(name)
    }
}

impl FromStr for LogLevel {
    type Err = BioAlgosError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(BioAlgosError::config(format!("Invalid log level: {}", other))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base log level, used when `RUST_LOG` is unset
    pub level: LogLevel,
    /// Emit one JSON object per event
    pub json_format: bool,
    /// Log file directory (None for stderr only)
    pub log_dir: Option<PathBuf>,
    /// Log file name inside `log_dir`
    #[validate(length(min = 1))]
    pub log_file_pattern: String,
    /// Per-module levels, e.g. `bioalgos::session = "debug"`
    pub module_levels: HashMap<String, LogLevel>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            json_format: false,
            log_dir: None,
            log_file_pattern: "bioalgos.log".to_string(),
            module_levels: HashMap::new(),
        }
    }
}

/// Keeps the background log writer alive; drop it last
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

impl LoggingConfig {
    /// Environment filter: `RUST_LOG` if set, else `level` plus module overrides
    pub fn env_filter(&self) -> Result<EnvFilter> {
        let mut filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::from(self.level).into())
            .from_env_lossy();

        for (module, level) in &self.module_levels {
            let directive = format!("{}={}", module, level)
                .parse()
                .map_err(|e| BioAlgosError::config(format!("Invalid log directive for {}: {}", module, e)))?;
            filter = filter.add_directive(directive);
        }
        Ok(filter)
    }
}

/// Install the global tracing subscriber
///
/// Fails if a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard> {
    let (writer, guard) = match &config.log_dir {
        Some(log_dir) => {
            fs::create_dir_all(log_dir)?;
            let appender = tracing_appender::rolling::never(log_dir, &config.log_file_pattern);
            tracing_appender::non_blocking(appender)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let format_layer = if config.json_format {
        fmt::layer()
            .json()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(writer)
            .boxed()
    } else {
        fmt::layer()
            .with_timer(ChronoUtc::rfc_3339())
            .with_target(true)
            .with_ansi(config.log_dir.is_none())
            .with_writer(writer)
            .boxed()
    };

    let env_filter = config.env_filter()?;

    tracing_subscriber::registry()
        .with(format_layer.with_filter(env_filter))
        .try_init()
        .map_err(|e| BioAlgosError::logging(format!("Failed to initialize logging: {}", e)))?;

    info!(level = %config.level, json = config.json_format, "Logging initialized");

    Ok(LoggingGuard { _guard: guard })
}
