//! Shared test utilities for rawserial tests.
//!
//! This module provides common test infrastructure including:
//! - Pseudo-terminal pairs standing in for a serial device (Unix)
//! - Mock port builders with pre-programmed input
//! - Configuration builders

#![allow(dead_code)]

use rawserial::port::{MockSerialPort, PortConfiguration};
use std::time::Duration;

/// Create a mock serial port with pre-programmed input.
///
/// # Example
/// ```ignore
/// let mock = create_mock_port_with_responses("MOCK0", vec![b"OK\r\n", b"READY\r\n"]);
/// ```
pub fn create_mock_port_with_responses(port_name: &str, responses: Vec<&[u8]>) -> MockSerialPort {
    let mut mock = MockSerialPort::new(port_name);
    for response in responses {
        mock.enqueue_read(response);
    }
    mock
}

/// 8N1 at 9600 baud with a short read timeout, suitable for pty tests.
pub fn quick_config() -> PortConfiguration {
    PortConfiguration::new(9600).with_read_timeout(Duration::from_millis(200))
}

#[cfg(unix)]
pub use pty::Pty;

#[cfg(unix)]
mod pty {
    use std::ffi::CStr;
    use std::fs::File;
    use std::io::{Read, Write};
    use std::os::unix::io::FromRawFd;

    /// A pseudo-terminal: the master end is held here, the slave end is a
    /// tty path that `Port::open` can configure like a serial device.
    ///
    /// `ptsname` is not thread safe, so tests creating a `Pty` run `#[serial]`.
    pub struct Pty {
        pub master: File,
        pub slave_path: String,
    }

    impl Pty {
        pub fn open() -> Self {
            // SAFETY: plain libc calls on a descriptor we own; `ptsname`
            // returns a NUL-terminated static buffer copied out immediately.
            unsafe {
                let fd = libc::posix_openpt(libc::O_RDWR | libc::O_NOCTTY);
                assert!(fd >= 0, "posix_openpt failed");
                assert_eq!(libc::grantpt(fd), 0, "grantpt failed");
                assert_eq!(libc::unlockpt(fd), 0, "unlockpt failed");

                let name = libc::ptsname(fd);
                assert!(!name.is_null(), "ptsname failed");
                let slave_path = CStr::from_ptr(name).to_string_lossy().into_owned();

                Self {
                    master: File::from_raw_fd(fd),
                    slave_path,
                }
            }
        }

        /// Send bytes towards the port.
        pub fn send(&mut self, data: &[u8]) {
            self.master.write_all(data).expect("write to pty master");
        }

        /// Receive exactly `len` bytes written by the port.
        pub fn receive(&mut self, len: usize) -> Vec<u8> {
            let mut data = vec![0u8; len];
            self.master.read_exact(&mut data).expect("read from pty master");
            data
        }
    }
}
