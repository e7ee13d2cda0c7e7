//! Configuration module for serial-lineconf.
//!
//! This module provides TOML-based configuration with environment variable overrides.
//!
//! # Configuration Resolution
//!
//! Configuration is loaded from the following locations (in order of priority):
//!
//! 1. `LINECONF_CONFIG` environment variable (explicit path)
//! 2. `./lineconf.toml` (current directory)
//! 3. `lineconf.toml` in the platform config directory
//!    (`~/.config/serial-lineconf/` on Linux, `~/Library/Application Support/serial-lineconf/` on macOS)
//! 4. Built-in defaults (no file required)
//!
//! # Environment Overrides
//!
//! The pattern is: `LINECONF_<SECTION>_<KEY>`
//!
//! - `LINECONF_LINE_BAUD=115200`
//! - `LINECONF_LINE_MODE=raw`
//! - `LINECONF_DEVICE_PATH=/dev/ttyUSB0`
//! - `LINECONF_SNAPSHOT_DIR=/var/lib/lineconf`
//! - `LINECONF_LOGGING_LEVEL=debug`
//! - `LINECONF_LOGGING_FORMAT=json`
//!
//! # Example
//!
//! ```rust,no_run
//! use serial_lineconf::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load()?;
//! let config = loader.config();
//!
//! println!("Line: {}", config.line);
//! println!("Snapshot: {}", config.snapshot.path().display());
//! # Ok::<(), serial_lineconf::config::ConfigError>(())
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    get_default_config_dir, get_default_config_path, resolve_config_path, ConfigLoader,
};
pub use schema::{Config, DeviceConfig, LogFormat, LoggingConfig, SnapshotConfig};
