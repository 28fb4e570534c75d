//! Core types for serial port abstraction.
//!
//! Defines the logical `PortConfiguration` handed to the platform translators
//! and the `SerialPortAdapter` trait that allows both real serial ports and
//! mock implementations to be used interchangeably.

use super::error::PortError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Configuration parameters for a serial port.
///
/// A configuration is a plain value: it is validated and translated into the
/// native control block every time it is applied, so nothing about it is
/// cached inside an open port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortConfiguration {
    /// Baud rate (bits per second).
    ///
    /// Rates missing from the platform's standard table are passed to the
    /// driver as-is.
    pub baud_rate: u32,

    /// Number of data bits (5, 6, 7, or 8).
    pub data_bits: u8,

    /// Parity checking mode.
    pub parity: Parity,

    /// Number of stop bits.
    pub stop_bits: StopBits,

    /// Read timeout. Zero blocks until at least one byte is available.
    pub read_timeout: Duration,
}

impl Default for PortConfiguration {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: StopBits::One,
            read_timeout: Duration::ZERO,
        }
    }
}

impl PortConfiguration {
    /// An 8N1 configuration at `baud_rate` with blocking reads.
    pub fn new(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            ..Self::default()
        }
    }

    pub fn with_data_bits(mut self, data_bits: u8) -> Self {
        self.data_bits = data_bits;
        self
    }

    pub fn with_parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    pub fn with_stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.stop_bits = stop_bits;
        self
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }
}

/// Parity checking modes.
///
/// `Mark` and `Space` are only accepted by the Windows translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parity {
    None,
    Odd,
    Even,
    Mark,
    Space,
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Parity::None => "none",
            Parity::Odd => "odd",
            Parity::Even => "even",
            Parity::Mark => "mark",
            Parity::Space => "space",
        })
    }
}

/// Number of stop bits.
///
/// `OnePointFive` is only accepted by the Windows translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopBits {
    One,
    OnePointFive,
    Two,
}

impl fmt::Display for StopBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopBits::One => "1",
            StopBits::OnePointFive => "1.5",
            StopBits::Two => "2",
        })
    }
}

/// Trait for serial port I/O operations.
///
/// This trait abstracts over synchronous serial port operations, allowing both
/// real hardware ports and mock implementations for testing.
pub trait SerialPortAdapter: Send + fmt::Debug {
    /// Get the name/path of this serial port.
    fn name(&self) -> &str;

    /// Translate `config` and apply it to the port.
    fn reconfigure(&mut self, config: &PortConfiguration) -> Result<(), PortError>;

    /// Write bytes to the serial port.
    ///
    /// Returns the number of bytes actually written, which may be short.
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError>;

    /// Read bytes from the serial port into the provided buffer.
    ///
    /// Returns the number of bytes actually read; zero means the read timed out.
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError>;

    /// Clear both input and output buffers.
    ///
    /// This discards any unread data in the receive buffer and any unsent
    /// data in the transmit buffer.
    fn clear_buffers(&mut self) -> Result<(), PortError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration() {
        let config = PortConfiguration::default();
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.data_bits, 8);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);
        assert_eq!(config.read_timeout, Duration::ZERO);
    }

    #[test]
    fn test_builder_methods() {
        let config = PortConfiguration::new(115_200)
            .with_data_bits(7)
            .with_parity(Parity::Even)
            .with_stop_bits(StopBits::Two)
            .with_read_timeout(Duration::from_millis(250));

        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.data_bits, 7);
        assert_eq!(config.parity, Parity::Even);
        assert_eq!(config.stop_bits, StopBits::Two);
        assert_eq!(config.read_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Parity::Mark.to_string(), "mark");
        assert_eq!(StopBits::OnePointFive.to_string(), "1.5");
        assert_eq!(StopBits::Two.to_string(), "2");
    }
}
