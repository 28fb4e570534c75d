//! Synchronous serial port implementation.
//!
//! `Port` owns one native handle and drives the open, reconfigure, read,
//! write, flush and close calls directly against the operating system. Every
//! method maps to a single blocking native call, or to the short fixed
//! sequence `reconfigure` needs on Windows.

use super::error::PortError;
use super::traits::{PortConfiguration, SerialPortAdapter};
use crate::platform;
use std::fs::File;
use std::io::{self, Read, Write};
use tracing::{debug, trace, warn};

/// An open serial port.
///
/// Closing consumes the port, so a closed port cannot be used again.
/// Dropping a port without calling [`Port::close`] still releases the handle
/// but discards any error from doing so.
pub struct Port {
    /// The underlying device handle.
    file: File,
    /// The port name/path for identification.
    name: String,
}

impl Port {
    /// Open a serial port and apply `config` to it.
    ///
    /// # Arguments
    /// * `path` - The system path to the serial port (e.g., "/dev/ttyUSB0" or "COM3")
    /// * `config` - Configuration parameters for the port
    ///
    /// If the configuration cannot be applied the handle is closed again
    /// before returning; a failure to close is reported alongside the
    /// original error as [`PortError::Compound`].
    ///
    /// # Example
    /// ```no_run
    /// use rawserial::port::{Port, PortConfiguration};
    ///
    /// let port = Port::open("/dev/ttyUSB0", &PortConfiguration::new(115_200))?;
    /// port.close()?;
    /// # Ok::<(), rawserial::port::PortError>(())
    /// ```
    pub fn open(path: &str, config: &PortConfiguration) -> Result<Self, PortError> {
        let file = platform::open_device(path)?;
        let mut port = Self {
            file,
            name: path.to_string(),
        };

        if let Err(error) = port.reconfigure(config) {
            return Err(match platform::close_device(port.file) {
                Ok(()) => error,
                Err(cleanup) => {
                    warn!(port = path, "Failed to close port after setup error: {cleanup}");
                    PortError::compound(error, cleanup)
                }
            });
        }

        debug!(port = path, ?config, "Opened serial port");
        Ok(port)
    }

    /// Translate `config` and apply it to the open device.
    ///
    /// Invalid fields are rejected before any native call is made.
    pub fn reconfigure(&mut self, config: &PortConfiguration) -> Result<(), PortError> {
        let settings = platform::translate(config)?;
        platform::apply(&self.file, &settings)?;
        debug!(port = %self.name, ?config, "Applied port configuration");
        Ok(())
    }

    /// Read once into `buffer`.
    ///
    /// Returns the number of bytes read, which is zero when the read timeout
    /// expires with nothing received.
    pub fn read(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        let n = self.file.read(buffer)?;
        trace!(port = %self.name, bytes = n, "Read");
        Ok(n)
    }

    /// Write once from `data`.
    ///
    /// A short count is not retried; callers that need every byte delivered
    /// must treat it as a failure or loop themselves.
    pub fn write(&mut self, data: &[u8]) -> Result<usize, PortError> {
        let n = self.file.write(data)?;
        trace!(port = %self.name, bytes = n, requested = data.len(), "Wrote");
        Ok(n)
    }

    /// Discard unread input and unsent output held by the driver.
    ///
    /// Unlike [`std::io::Write::flush`], nothing is delivered.
    pub fn flush(&mut self) -> Result<(), PortError> {
        platform::discard_buffers(&self.file)?;
        Ok(())
    }

    /// Release the native handle.
    pub fn close(self) -> Result<(), PortError> {
        let Self { file, name } = self;
        platform::close_device(file)?;
        debug!(port = %name, "Closed serial port");
        Ok(())
    }

    /// Get the port name/path as given to [`Port::open`].
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl SerialPortAdapter for Port {
    fn name(&self) -> &str {
        &self.name
    }

    fn reconfigure(&mut self, config: &PortConfiguration) -> Result<(), PortError> {
        Port::reconfigure(self, config)
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        Port::write(self, data)
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        Port::read(self, buffer)
    }

    fn clear_buffers(&mut self) -> Result<(), PortError> {
        Port::flush(self)
    }
}

impl Read for Port {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for Port {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    // Writes go straight to the driver; there is nothing buffered here.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Port").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn test_open_missing_device_passes_os_error_through() {
        let result = Port::open("/dev/nonexistent_port_12345", &PortConfiguration::default());

        match result {
            Err(PortError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("Expected NotFound I/O error, got: {:?}", other),
        }
    }
}
