//! Global `tracing` subscriber setup.
//!
//! Library code only emits events; a binary or test harness that wants to see
//! them calls [`init`] once with the `[logging]` section of its configuration.

use crate::config::{ConfigError, ConfigResult, LogFormat, LoggingConfig};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Install a global subscriber for `config`.
///
/// `RUST_LOG`, when set, replaces `config.level`.
///
/// # Errors
/// [`ConfigError::ValidationError`] for an unparsable `RUST_LOG` or level and
/// [`ConfigError::Logging`] if a global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> ConfigResult<()> {
    let filter = build_env_filter(config)?;

    let fmt_layer = layer().with_writer(std::io::stderr);
    let fmt_layer = match config.format {
        LogFormat::Pretty => fmt_layer.pretty().boxed(),
        LogFormat::Compact => fmt_layer.compact().boxed(),
        LogFormat::Json => fmt_layer.json().with_ansi(false).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| ConfigError::Logging(e.to_string()))
}

fn build_env_filter(config: &LoggingConfig) -> ConfigResult<EnvFilter> {
    let (key, directives) = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(value) => (EnvFilter::DEFAULT_ENV, value),
        Err(_) => ("logging.level", config.level.clone()),
    };
    EnvFilter::try_new(&directives)
        .map_err(|e| ConfigError::validation(key, format!("'{directives}': {e}")))
}
