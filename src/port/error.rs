//! Port-specific error types.
//!
//! Configuration errors are raised by the translators before any native call
//! is made; device errors carry the operating system error untouched.

use super::traits::{Parity, StopBits};
use thiserror::Error;

/// Errors that can occur during serial port operations.
#[derive(Debug, Error)]
pub enum PortError {
    /// The data bits value has no native character size.
    #[error("invalid data bits: {0}")]
    InvalidDataBits(u8),

    /// The parity mode is not supported on this platform.
    #[error("invalid parity: {0}")]
    InvalidParity(Parity),

    /// The stop bits setting is not supported on this platform.
    #[error("invalid stop bits: {0}")]
    InvalidStopBits(StopBits),

    /// An I/O error occurred during port operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Setting up a freshly opened port failed, and so did closing it again.
    #[error("{error} (closing the port also failed: {cleanup})")]
    Compound {
        #[source]
        error: Box<PortError>,
        cleanup: std::io::Error,
    },

    /// Attempted to use a port that has been closed.
    #[error("Port is not open")]
    NotOpen,
}

impl PortError {
    /// Join a setup failure with the error from releasing the handle.
    pub fn compound(error: PortError, cleanup: std::io::Error) -> Self {
        Self::Compound {
            error: Box::new(error),
            cleanup,
        }
    }

    /// Whether the error was raised while validating a configuration.
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::InvalidDataBits(_) | Self::InvalidParity(_) | Self::InvalidStopBits(_) => true,
            Self::Compound { error, .. } => error.is_configuration(),
            Self::Io(_) | Self::NotOpen => false,
        }
    }
}
