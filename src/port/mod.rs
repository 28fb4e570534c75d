//! Port abstraction layer for serial communication.
//!
//! Provides the logical configuration types, the native `Port`, and an
//! in-memory mock behind a common trait, enabling dependency injection and
//! testing without hardware.

pub mod error;
pub mod mock;
pub mod sync_port;
pub mod traits;

pub use error::PortError;
pub use mock::MockSerialPort;
pub use sync_port::Port;
pub use traits::*;
