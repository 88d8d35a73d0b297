//! # Logger
//!
//! Installs the global `tracing` subscriber from [`LoggerConfig`]. `RUST_LOG`,
//! when set, takes precedence over the configured level.
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::{Error, Result};

const MODULE_WHITELIST: &[&str] = &["mapnet"];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggerConfig {
    #[serde(default = "default_enable")]
    pub enable: bool,

    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: Format,

    /// Log everything, not only events emitted by this crate.
    #[serde(default)]
    pub override_filter: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            enable: true,
            level: LogLevel::default(),
            format: Format::default(),
            override_filter: None,
        }
    }
}

fn default_enable() -> bool {
    true
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum LogLevel {
    #[serde(rename = "off")]
    Off,
    #[serde(rename = "trace")]
    Trace,
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "info")]
    #[default]
    Info,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "error")]
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self {
            Self::Off => "off",
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        f.write_str(level)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Format {
    #[serde(rename = "compact")]
    #[default]
    Compact,
    #[serde(rename = "pretty")]
    Pretty,
    #[serde(rename = "json")]
    Json,
}

/// Builds the filter directive for the configured level.
#[must_use]
pub fn filter_directive(config: &LoggerConfig) -> String {
    config.override_filter.clone().unwrap_or_else(|| {
        MODULE_WHITELIST
            .iter()
            .map(|module| format!("{module}={}", config.level))
            .collect::<Vec<_>>()
            .join(",")
    })
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails when the filter directive is invalid or a global subscriber is
/// already installed.
pub fn init(config: &LoggerConfig) -> Result<()> {
    if !config.enable {
        return Ok(());
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter_directive(config)).map_err(Error::wrap)?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.format {
        Format::Compact => builder.compact().try_init(),
        Format::Pretty => builder.pretty().try_init(),
        Format::Json => builder.json().try_init(),
    }
    .map_err(Error::Any)
}
