//! Configuration schema definitions.
//!
//! This module defines the structure of the configuration file using serde.
//! All configuration sections are defined here with appropriate defaults.

use super::error::{ConfigError, ConfigResult};
use crate::platform;
use crate::port::{Parity, PortConfiguration, StopBits};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default port and line settings
    pub port: PortSection,
    /// Named line settings layered over `[port]`
    pub profiles: BTreeMap<String, ProfileConfig>,
    /// Port aliases for convenience
    pub port_aliases: BTreeMap<String, String>,
    /// Hardware testing configuration
    pub testing: TestingConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Build the line settings for `profile`, or for `[port]` when `None`.
    pub fn port_configuration(&self, profile: Option<&str>) -> ConfigResult<PortConfiguration> {
        let base = self.port.to_port_configuration();
        match profile {
            None => Ok(base),
            Some(name) => self
                .profiles
                .get(name)
                .map(|p| p.apply_to(base))
                .ok_or_else(|| ConfigError::UnknownProfile(name.to_string())),
        }
    }

    /// Resolve a port name through aliases
    pub fn resolve_port(&self, name: &str) -> String {
        self.port_aliases
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// Check that `[port]` and every profile translate on this platform.
    pub fn validate(&self) -> ConfigResult<()> {
        platform::translate(&self.port_configuration(None)?)
            .map_err(|e| ConfigError::validation("port", e.to_string()))?;

        for name in self.profiles.keys() {
            platform::translate(&self.port_configuration(Some(name))?)
                .map_err(|e| ConfigError::validation(format!("profiles.{name}"), e.to_string()))?;
        }
        Ok(())
    }
}

/// `[port]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortSection {
    /// Device path or alias to open
    pub path: Option<String>,
    /// Baud rate (bits per second)
    pub baud_rate: u32,
    /// Data bits per character
    pub data_bits: u8,
    /// Parity: "none", "odd", "even", "mark", "space"
    pub parity: Parity,
    /// Stop bits: "one", "one_point_five", "two"
    pub stop_bits: StopBits,
    /// Read timeout in milliseconds; 0 blocks for the first byte
    pub read_timeout_ms: u64,
}

impl Default for PortSection {
    fn default() -> Self {
        let line = PortConfiguration::default();
        Self {
            path: None,
            baud_rate: line.baud_rate,
            data_bits: line.data_bits,
            parity: line.parity,
            stop_bits: line.stop_bits,
            read_timeout_ms: line.read_timeout.as_millis() as u64,
        }
    }
}

impl PortSection {
    pub fn to_port_configuration(&self) -> PortConfiguration {
        PortConfiguration {
            baud_rate: self.baud_rate,
            data_bits: self.data_bits,
            parity: self.parity,
            stop_bits: self.stop_bits,
            read_timeout: Duration::from_millis(self.read_timeout_ms),
        }
    }
}

/// `[profiles.<name>]` section. Unset fields fall back to `[port]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub baud_rate: Option<u32>,
    pub data_bits: Option<u8>,
    pub parity: Option<Parity>,
    pub stop_bits: Option<StopBits>,
    pub read_timeout_ms: Option<u64>,
}

impl ProfileConfig {
    fn apply_to(&self, base: PortConfiguration) -> PortConfiguration {
        PortConfiguration {
            baud_rate: self.baud_rate.unwrap_or(base.baud_rate),
            data_bits: self.data_bits.unwrap_or(base.data_bits),
            parity: self.parity.unwrap_or(base.parity),
            stop_bits: self.stop_bits.unwrap_or(base.stop_bits),
            read_timeout: self
                .read_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(base.read_timeout),
        }
    }
}

/// Hardware testing configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestingConfig {
    /// Test port name
    pub port: Option<String>,
    /// Second port wired to `port` by a null-modem cable
    pub peer_port: Option<String>,
    /// Whether `port` has TX wired to RX
    pub loopback_enabled: bool,
    /// Test baud rate
    pub baud_rate: u32,
    /// Read timeout for test reads in milliseconds
    pub timeout_ms: u64,
}

impl Default for TestingConfig {
    fn default() -> Self {
        Self {
            port: None,
            peer_port: None,
            loopback_enabled: false,
            baud_rate: 115200,
            timeout_ms: 1000,
        }
    }
}

impl TestingConfig {
    /// Get the test timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Line settings used by the hardware tests.
    pub fn port_configuration(&self) -> PortConfiguration {
        PortConfiguration::new(self.baud_rate).with_read_timeout(self.timeout())
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, e.g. "info" or "rawserial=trace"
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
