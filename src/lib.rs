//! Portable raw serial ports.
//!
//! One `Port` type and one `PortConfiguration` cover three native
//! configuration mechanisms: Linux `termios2`, BSD `termios`, and the Windows
//! `DCB`/`COMMTIMEOUTS` pair. The platform family is chosen at compile time.
//!
//! # Modules
//!
//! - `port`: `PortConfiguration`, the native `Port`, errors, and a mock
//! - `platform`: per-family constant tables and configuration translators
//! - `config`: Configuration management with TOML support
//! - `logging`: tracing subscriber setup
//!
//! # Example
//!
//! ```no_run
//! use rawserial::{Port, PortConfiguration};
//! use std::time::Duration;
//!
//! let config = PortConfiguration::new(57_600).with_read_timeout(Duration::from_millis(500));
//! let mut port = Port::open("/dev/ttyUSB0", &config)?;
//!
//! port.write(b"AT\r")?;
//! let mut reply = [0u8; 64];
//! let n = port.read(&mut reply)?;
//! println!("{:?}", &reply[..n]);
//!
//! port.close()?;
//! # Ok::<(), rawserial::PortError>(())
//! ```

pub mod config;
pub mod logging;
pub mod platform;
pub mod port;

// Re-export commonly used types for convenience
pub use port::{
    MockSerialPort, Parity, Port, PortConfiguration, PortError, SerialPortAdapter, StopBits,
};

// Re-export config types
pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
