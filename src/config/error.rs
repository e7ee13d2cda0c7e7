//! Errors raised while resolving, loading, overriding or saving `lineconf.toml`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// `LINECONF_CONFIG` names a file that does not exist.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The resolved file exists but could not be read.
    #[error("Failed to read configuration file '{}': {source}", .path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML, an unknown enum value, or a `[line]` table missing a
    /// field or naming an unsupported baud rate.
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// `save`/`save_to` could not create the parent directory or write the file.
    #[error("Failed to write configuration file '{}': {source}", .path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A parsed value that cannot be used, such as an empty `device.path`,
    /// a snapshot file name containing a separator, or a bad logging filter.
    #[error("Invalid configuration value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    /// A `LINECONF_*` override that does not parse.
    #[error("Failed to parse environment variable '{var}': {message}")]
    EnvParseError { var: String, message: String },

    /// `save()` on a loader built without a file path.
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    /// A global `tracing` subscriber is already installed.
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

impl ConfigError {
    pub fn validation<K: Into<String>, M: Into<String>>(key: K, message: M) -> Self {
        Self::ValidationError {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn env_parse<V: Into<String>, M: Into<String>>(var: V, message: M) -> Self {
        Self::EnvParseError {
            var: var.into(),
            message: message.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
