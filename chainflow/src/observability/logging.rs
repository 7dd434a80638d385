//! Structured logging setup.
//!
//! Pipelines log through `tracing`. Binaries and tests that want the output
//! install a subscriber with [`init_logging`]. `RUST_LOG` overrides the
//! configured level when it is set.

use crate::errors::ChainError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include the event target (module path) in each line.
    #[serde(default = "default_true")]
    pub with_target: bool,

    /// Per-module levels, e.g. `{"chainflow::pipeline": "debug"}`.
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            with_target: default_true(),
            modules: HashMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Sets the level.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the level of one module.
    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>, level: impl Into<String>) -> Self {
        self.modules.insert(module.into(), level.into());
        self
    }
}

/// Installs the global `tracing` subscriber.
///
/// # Errors
///
/// Returns `ChainError::Logging` if a directive doesn't parse or a global
/// subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ChainError> {
    let filter = build_env_filter(config)?;
    let registry = Registry::default().with(filter);

    let installed = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(config.with_target))
            .try_init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(config.with_target))
            .try_init(),
    };

    installed.map_err(|e| ChainError::Logging(e.to_string()))
}

/// Builds the filter from `RUST_LOG`, falling back to the config.
pub(crate) fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, ChainError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::try_new(&config.level)
        .map_err(|e| ChainError::Logging(format!("Invalid log level '{}': {}", config.level, e)))?;

    let mut modules: Vec<_> = config.modules.iter().collect();
    modules.sort();
    for (module, level) in modules {
        let directive: Directive = format!("{module}={level}")
            .parse()
            .map_err(|e| ChainError::Logging(format!("Invalid log directive: {e}")))?;
        filter = filter.add_directive(directive);
    }

    Ok(filter)
}
