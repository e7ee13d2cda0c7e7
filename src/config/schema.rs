//! Configuration schema definitions.
//!
//! This module defines the structure of the configuration file using serde.
//! All configuration sections are defined here with appropriate defaults.

use crate::line::LineConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Line settings applied when a device is configured.
    ///
    /// A `[line]` table must name every field; omit the table to get 9600 8N1 raw.
    pub line: LineConfig,
    /// Device selection
    pub device: DeviceConfig,
    /// Where saved settings snapshots live
    pub snapshot: SnapshotConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Device selection section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Device opened when none is given explicitly
    pub path: Option<String>,
    /// Short names for device paths
    pub aliases: HashMap<String, String>,
}

impl DeviceConfig {
    /// Resolve a device name through aliases
    pub fn resolve_path(&self, name: &str) -> String {
        self.aliases
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }
}

/// Snapshot file section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub directory: PathBuf,
    pub file_name: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            file_name: "toptions.dat".to_string(),
        }
    }
}

impl SnapshotConfig {
    /// Full path of the snapshot file.
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive: "trace", "debug", "info", "warn", "error" or a full
    /// `EnvFilter` string such as `serial_lineconf=debug`
    pub level: String,
    /// Log format: "json", "pretty", "compact"
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format
    Json,
    /// Pretty format with colors
    #[default]
    Pretty,
    /// Compact format
    Compact,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::{FlowControl, Mode, Parity, ReadTimeout};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.line, LineConfig::default());
        assert_eq!(config.device.path, None);
        assert_eq!(config.snapshot.path(), PathBuf::from("./toptions.dat"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_device_alias_resolution() {
        let mut config = DeviceConfig::default();
        config
            .aliases
            .insert("modem".to_string(), "/dev/ttyUSB0".to_string());

        assert_eq!(config.resolve_path("modem"), "/dev/ttyUSB0");
        assert_eq!(config.resolve_path("/dev/ttyS1"), "/dev/ttyS1");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[line]"));
        assert!(toml_str.contains("baud = 9600"));
        assert!(toml_str.contains("[snapshot]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [line]
            baud = 19200
            data_bits = 7
            parity = "even"
            stop_bits = 2
            flow_control = "software"
            mode = "canonical"

            [line.read_timeout]
            min_bytes = 1
            deciseconds = 5

            [device]
            path = "/dev/ttyS0"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.line.baud().rate(), 19200);
        assert_eq!(config.line.parity(), Parity::Even);
        assert_eq!(config.line.flow_control(), FlowControl::Software);
        assert_eq!(config.line.mode(), Mode::Canonical);
        assert_eq!(config.line.read_timeout(), ReadTimeout::new(1, 5));
        assert_eq!(config.device.path.as_deref(), Some("/dev/ttyS0"));
        // Defaults should still work
        assert_eq!(config.snapshot.file_name, "toptions.dat");
    }

    #[test]
    fn test_unsupported_baud_rejected() {
        let toml_str = r#"
            [line]
            baud = 12345
            data_bits = 8
            parity = "none"
            stop_bits = 1
            flow_control = "none"
            mode = "raw"

            [line.read_timeout]
            min_bytes = 0
            deciseconds = 20
        "#;

        assert!(toml::from_str::<Config>(toml_str).is_err());
    }
}
