//! Configuration loader with file resolution and environment override support.

use super::error::{ConfigError, ConfigResult};
use super::schema::{Config, LogFormat};
use crate::baud::BaudRate;
use crate::line::Mode;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "LINECONF";

/// Config file name
const CONFIG_FILE_NAME: &str = "lineconf.toml";

/// Environment variable for explicit config path
const CONFIG_PATH_ENV: &str = "LINECONF_CONFIG";

/// Configuration loader with resolution and override logic.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolved config file path (if any)
    pub config_path: Option<PathBuf>,
    /// The loaded configuration
    pub config: Config,
}

impl ConfigLoader {
    /// Load configuration using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `LINECONF_CONFIG` environment variable (explicit path)
    /// 2. `./lineconf.toml` (current directory)
    /// 3. `lineconf.toml` in the platform config directory
    /// 4. Built-in defaults (no file required)
    ///
    /// Environment variables can override any config file values.
    pub fn load() -> ConfigResult<Self> {
        let config_path = resolve_config_path()?;

        let mut config = if let Some(ref path) = config_path {
            load_from_file(path)?
        } else {
            Config::default()
        };

        apply_env_overrides(&mut config)?;
        validate(&config)?;

        Ok(Self { config_path, config })
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut config = load_from_file(&path)?;
        apply_env_overrides(&mut config)?;
        validate(&config)?;

        Ok(Self {
            config_path: Some(path),
            config,
        })
    }

    /// Create a loader with default configuration (no file).
    ///
    /// Environment overrides still apply, and an unparsable one is an error.
    pub fn with_defaults() -> ConfigResult<Self> {
        let mut config = Config::default();
        apply_env_overrides(&mut config)?;
        validate(&config)?;

        Ok(Self {
            config_path: None,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get a mutable reference to the configuration.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }

    /// Save the current configuration to file.
    pub fn save(&self) -> ConfigResult<()> {
        let path = self
            .config_path
            .as_ref()
            .ok_or_else(|| ConfigError::MissingRequired("No config file path set".to_string()))?;

        save_to_file(&self.config, path)
    }

    /// Save the current configuration to a specific file.
    pub fn save_to(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        save_to_file(&self.config, path.as_ref())
    }

    /// Reload configuration from file (if path is set).
    pub fn reload(&mut self) -> ConfigResult<()> {
        if let Some(ref path) = self.config_path {
            let mut config = load_from_file(path)?;
            apply_env_overrides(&mut config)?;
            validate(&config)?;
            self.config = config;
        }
        Ok(())
    }
}

/// Resolve the configuration file path using standard locations.
///
/// A `LINECONF_CONFIG` naming a missing file is [`ConfigError::NotFound`];
/// the other locations are optional.
pub fn resolve_config_path() -> ConfigResult<Option<PathBuf>> {
    // 1. Explicit environment variable
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if !path.is_file() {
            return Err(ConfigError::NotFound(path));
        }
        return Ok(Some(path));
    }

    // 2. Current directory
    let cwd_config = PathBuf::from(CONFIG_FILE_NAME);
    if cwd_config.exists() {
        return Ok(Some(cwd_config));
    }

    // 3. Platform config directory
    if let Some(app_config) = get_default_config_path() {
        if app_config.exists() {
            return Ok(Some(app_config));
        }
    }

    // 4. No config file found - will use defaults
    Ok(None)
}

/// Get the default config directory for creating new config files.
pub fn get_default_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "serial-lineconf").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the default config file path for creating new config files.
pub fn get_default_config_path() -> Option<PathBuf> {
    get_default_config_dir().map(|d| d.join(CONFIG_FILE_NAME))
}

/// Load configuration from a file.
fn load_from_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
    debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

/// Save configuration to a file.
fn save_to_file(config: &Config, path: &Path) -> ConfigResult<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Reject values that parse but cannot be used.
fn validate(config: &Config) -> ConfigResult<()> {
    if matches!(config.device.path.as_deref(), Some("")) {
        return Err(ConfigError::validation("device.path", "must not be empty"));
    }
    let name = &config.snapshot.file_name;
    if name.is_empty() || name.contains(std::path::MAIN_SEPARATOR) {
        return Err(ConfigError::validation(
            "snapshot.file_name",
            "must be a plain file name",
        ));
    }
    Ok(())
}

/// Apply environment variable overrides to the configuration.
///
/// Environment variables follow the pattern: `LINECONF_<SECTION>_<KEY>`
/// For example:
/// - `LINECONF_LINE_BAUD=115200`
/// - `LINECONF_LINE_MODE=canonical`
/// - `LINECONF_DEVICE_PATH=/dev/ttyUSB0`
fn apply_env_overrides(config: &mut Config) -> ConfigResult<()> {
    // Line overrides
    let var = format!("{}_LINE_BAUD", ENV_PREFIX);
    if let Ok(val) = std::env::var(&var) {
        let rate: u32 = val
            .parse()
            .map_err(|_| ConfigError::env_parse(&var, "Invalid baud rate"))?;
        let baud = BaudRate::new(rate).map_err(|e| ConfigError::env_parse(&var, e.to_string()))?;
        config.line = config.line.with_baud(baud);
    }
    let var = format!("{}_LINE_MODE", ENV_PREFIX);
    if let Ok(val) = std::env::var(&var) {
        let mode = match val.to_lowercase().as_str() {
            "raw" => Mode::Raw,
            "canonical" => Mode::Canonical,
            _ => return Err(ConfigError::env_parse(&var, "Expected 'raw' or 'canonical'")),
        };
        config.line = config.line.with_mode(mode);
    }

    // Device overrides
    if let Ok(val) = std::env::var(format!("{}_DEVICE_PATH", ENV_PREFIX)) {
        config.device.path = Some(val);
    }

    // Snapshot overrides
    if let Ok(val) = std::env::var(format!("{}_SNAPSHOT_DIR", ENV_PREFIX)) {
        config.snapshot.directory = PathBuf::from(val);
    }

    // Logging overrides
    if let Ok(val) = std::env::var(format!("{}_LOGGING_LEVEL", ENV_PREFIX)) {
        config.logging.level = val;
    }
    let var = format!("{}_LOGGING_FORMAT", ENV_PREFIX);
    if let Ok(val) = std::env::var(&var) {
        config.logging.format = match val.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            "compact" => LogFormat::Compact,
            _ => {
                return Err(ConfigError::env_parse(
                    &var,
                    "Expected 'json', 'pretty' or 'compact'",
                ))
            }
        };
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const ALL_VARS: &[&str] = &[
        "LINECONF_LINE_BAUD",
        "LINECONF_LINE_MODE",
        "LINECONF_DEVICE_PATH",
        "LINECONF_SNAPSHOT_DIR",
        "LINECONF_LOGGING_LEVEL",
        "LINECONF_LOGGING_FORMAT",
    ];

    fn clear_env() {
        for var in ALL_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_default_loader() {
        clear_env();
        let loader = ConfigLoader::with_defaults().unwrap();
        assert_eq!(loader.config().line.baud().rate(), 9600);
        assert!(loader.config_path.is_none());
    }

    #[test]
    #[serial]
    fn test_env_override() {
        clear_env();
        env::set_var("LINECONF_LINE_BAUD", "115200");
        env::set_var("LINECONF_LINE_MODE", "Canonical");
        env::set_var("LINECONF_DEVICE_PATH", "/dev/ttyACM0");
        env::set_var("LINECONF_LOGGING_FORMAT", "json");

        let loader = ConfigLoader::with_defaults().unwrap();
        let config = loader.config();
        assert_eq!(config.line.baud().rate(), 115200);
        assert_eq!(config.line.mode(), Mode::Canonical);
        assert_eq!(config.device.path.as_deref(), Some("/dev/ttyACM0"));
        assert_eq!(config.logging.format, LogFormat::Json);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_unsupported_baud_env_rejected() {
        clear_env();
        env::set_var("LINECONF_LINE_BAUD", "12345");

        let mut config = Config::default();
        let err = apply_env_overrides(&mut config).unwrap_err();
        assert!(matches!(err, ConfigError::EnvParseError { ref var, .. } if var == "LINECONF_LINE_BAUD"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_bad_mode_env_rejected() {
        clear_env();
        env::set_var("LINECONF_LINE_MODE", "cooked");

        let mut config = Config::default();
        assert!(matches!(
            apply_env_overrides(&mut config),
            Err(ConfigError::EnvParseError { .. })
        ));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_save_and_reload() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut loader = ConfigLoader::with_defaults().unwrap();
        loader.config_mut().device.path = Some("/dev/ttyS3".to_string());
        loader.save_to(&path).unwrap();

        let mut reloaded = ConfigLoader::load_from(&path).unwrap();
        assert_eq!(reloaded.config(), loader.config());

        std::fs::write(&path, "[device]\npath = \"/dev/ttyS4\"\n").unwrap();
        reloaded.reload().unwrap();
        assert_eq!(reloaded.config().device.path.as_deref(), Some("/dev/ttyS4"));
    }

    #[test]
    fn test_save_without_path() {
        let loader = ConfigLoader {
            config_path: None,
            config: Config::default(),
        };
        assert!(matches!(
            loader.save(),
            Err(ConfigError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_validation_rejects_snapshot_path() {
        let mut config = Config::default();
        config.snapshot.file_name = "dir/toptions.dat".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}
