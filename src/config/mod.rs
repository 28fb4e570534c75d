//! Configuration module for rawserial.
//!
//! This module provides TOML-based configuration with environment variable overrides.
//!
//! # Configuration Resolution
//!
//! Configuration is loaded from the following locations (in order of priority):
//!
//! 1. `RAWSERIAL_CONFIG` environment variable (explicit path)
//! 2. `./rawserial.toml` (current directory)
//! 3. `~/.config/rawserial/rawserial.toml` (XDG on Linux/macOS)
//! 4. `%APPDATA%\rawserial\rawserial.toml` (Windows)
//! 5. Built-in defaults (no file required)
//!
//! # Environment Overrides
//!
//! - `RAWSERIAL_PORT_PATH`, `RAWSERIAL_PORT_BAUD_RATE`, `RAWSERIAL_PORT_READ_TIMEOUT_MS`
//! - `RAWSERIAL_TESTING_PORT`, `RAWSERIAL_TESTING_PEER_PORT`, `RAWSERIAL_TESTING_BAUD_RATE`
//! - `RAWSERIAL_LOG_LEVEL`
//!
//! Legacy test variables are also supported: `TEST_PORT`, `TEST_BAUD`, `TEST_LOOPBACK`.
//!
//! # Example
//!
//! ```rust,no_run
//! use rawserial::config::ConfigLoader;
//! use rawserial::port::Port;
//!
//! let loader = ConfigLoader::load()?;
//! let config = loader.config();
//!
//! let path = config.resolve_port(config.port.path.as_deref().unwrap_or("/dev/ttyUSB0"));
//! let port = Port::open(&path, &config.port_configuration(Some("modem"))?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    get_default_config_dir, get_default_config_path, resolve_config_path, ConfigLoader,
};
pub use schema::{Config, LogFormat, LoggingConfig, PortSection, ProfileConfig, TestingConfig};
