//! Configuration loader with file resolution and environment override support.

use super::error::{ConfigError, ConfigResult};
use super::schema::Config;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "RAWSERIAL";

/// Config file name
const CONFIG_FILE_NAME: &str = "rawserial.toml";

/// Directory name under the platform config directory
const APP_DIR_NAME: &str = "rawserial";

/// Environment variable for explicit config path
const CONFIG_PATH_ENV: &str = "RAWSERIAL_CONFIG";

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
    /// 1. `RAWSERIAL_CONFIG` environment variable (explicit path)
    /// 2. `./rawserial.toml` (current directory)
    /// 3. `~/.config/rawserial/rawserial.toml` (XDG on Linux/macOS)
    /// 4. `%APPDATA%\rawserial\rawserial.toml` (Windows)
    /// 5. Built-in defaults (no file required)
    ///
    /// Environment variables can override any config file values. The result
    /// is validated against the current platform's translator.
    pub fn load() -> ConfigResult<Self> {
        let config_path = resolve_config_path();

        let mut config = if let Some(ref path) = config_path {
            load_from_file(path)?
        } else {
            Config::default()
        };

        apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(Self { config_path, config })
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut config = load_from_file(&path)?;
        apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(Self {
            config_path: Some(path),
            config,
        })
    }

    /// Create a loader with default configuration (no file).
    pub fn with_defaults() -> Self {
        let mut config = Config::default();
        // Still apply env overrides even with defaults
        let _ = apply_env_overrides(&mut config);

        Self {
            config_path: None,
            config,
        }
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
}

/// Resolve the configuration file path using standard locations.
pub fn resolve_config_path() -> Option<PathBuf> {
    // 1. Explicit environment variable
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. Current directory
    let cwd_config = PathBuf::from(CONFIG_FILE_NAME);
    if cwd_config.exists() {
        return Some(cwd_config);
    }

    // 3. XDG config directory (Linux/macOS) or APPDATA (Windows)
    if let Some(app_config) = get_default_config_path() {
        if app_config.exists() {
            return Some(app_config);
        }
    }

    None
}

/// Get the platform-specific config directory.
fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(PathBuf::from)
    }

    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
    }
}

/// Load configuration from a file.
fn load_from_file(path: &Path) -> ConfigResult<Config> {
    debug!(path = %path.display(), "Loading configuration");
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(ConfigError::ParseError)
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

/// Read `name` and parse it, reporting `what` on failure.
fn parse_env<T: std::str::FromStr>(name: &str, what: &str) -> ConfigResult<Option<T>> {
    match std::env::var(name) {
        Ok(val) => val
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::env_parse(name, what)),
        Err(_) => Ok(None),
    }
}

/// Apply environment variable overrides to the configuration.
///
/// Environment variables follow the pattern: `RAWSERIAL_<SECTION>_<KEY>`
/// For example:
/// - `RAWSERIAL_PORT_PATH=/dev/ttyACM0`
/// - `RAWSERIAL_PORT_BAUD_RATE=115200`
/// - `RAWSERIAL_TESTING_PORT=COM15`
fn apply_env_overrides(config: &mut Config) -> ConfigResult<()> {
    // Port overrides
    if let Ok(val) = std::env::var(format!("{}_PORT_PATH", ENV_PREFIX)) {
        config.port.path = Some(val);
    }
    if let Some(baud) = parse_env(&format!("{}_PORT_BAUD_RATE", ENV_PREFIX), "Invalid baud rate")? {
        config.port.baud_rate = baud;
    }
    if let Some(ms) = parse_env(
        &format!("{}_PORT_READ_TIMEOUT_MS", ENV_PREFIX),
        "Invalid timeout",
    )? {
        config.port.read_timeout_ms = ms;
    }

    // Testing overrides (also support legacy TEST_PORT etc.)
    if let Ok(val) = std::env::var(format!("{}_TESTING_PORT", ENV_PREFIX))
        .or_else(|_| std::env::var("TEST_PORT"))
    {
        config.testing.port = Some(val);
    }
    if let Ok(val) = std::env::var(format!("{}_TESTING_PEER_PORT", ENV_PREFIX)) {
        config.testing.peer_port = Some(val);
    }
    if let Ok(val) = std::env::var(format!("{}_TESTING_BAUD_RATE", ENV_PREFIX))
        .or_else(|_| std::env::var("TEST_BAUD"))
    {
        config.testing.baud_rate = val.parse().map_err(|_| {
            ConfigError::env_parse(
                format!("{}_TESTING_BAUD_RATE or TEST_BAUD", ENV_PREFIX),
                "Invalid baud rate",
            )
        })?;
    }
    if let Ok(val) = std::env::var("TEST_LOOPBACK") {
        config.testing.loopback_enabled = val.to_lowercase() == "true" || val == "1";
    }

    // Logging overrides
    if let Ok(val) = std::env::var(format!("{}_LOG_LEVEL", ENV_PREFIX)) {
        config.logging.level = val;
    }

    Ok(())
}

/// Get the default config directory for creating new config files.
pub fn get_default_config_dir() -> Option<PathBuf> {
    get_config_dir().map(|d| d.join(APP_DIR_NAME))
}

/// Get the default config file path for creating new config files.
pub fn get_default_config_path() -> Option<PathBuf> {
    get_default_config_dir().map(|d| d.join(CONFIG_FILE_NAME))
}
