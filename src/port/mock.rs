//! Mock serial port implementation for testing.
//!
//! Provides a `MockSerialPort` that simulates serial port behavior without
//! requiring actual hardware. Configurations go through the same platform
//! translator as a real port, so invalid settings fail the same way, and
//! ports can be wired back to back to test both ends of a link.

use super::error::PortError;
use super::traits::{PortConfiguration, SerialPortAdapter};
use crate::platform;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Inner state of one end of the mock link.
#[derive(Debug, Default)]
struct MockPortState {
    /// Queue of bytes to be returned by read operations.
    read_queue: VecDeque<u8>,
    /// Log of all bytes written to the port.
    write_log: Vec<Vec<u8>>,
    /// Every configuration that passed translation, in order.
    applied: Vec<PortConfiguration>,
    /// Largest number of bytes a single write accepts.
    write_limit: Option<usize>,
    /// Whether buffers have been cleared.
    buffers_cleared: bool,
    /// Whether `close` has been called.
    closed: bool,
}

type SharedState = Arc<Mutex<MockPortState>>;

/// Mock serial port implementation for testing.
///
/// This implementation allows you to:
/// - Enqueue data to be returned by read operations
/// - Inspect what data was written and which configurations were applied
/// - Connect two ports (or a port to itself) as a loopback link
/// - Force short writes
///
/// Clones share state, which lets a test keep a handle for inspection after
/// passing the port on as a `Box<dyn SerialPortAdapter>`.
///
/// # Example
/// ```
/// use rawserial::port::{MockSerialPort, SerialPortAdapter};
///
/// let (mut host, mut device) = MockSerialPort::pair("MOCK0", "MOCK1");
///
/// host.write_bytes(b"PING").unwrap();
///
/// let mut buffer = [0u8; 8];
/// let n = device.read_bytes(&mut buffer).unwrap();
/// assert_eq!(&buffer[..n], b"PING");
/// ```
#[derive(Clone)]
pub struct MockSerialPort {
    /// The port name/identifier.
    name: String,
    /// This end's state.
    state: SharedState,
    /// The state that receives this end's writes, if connected.
    peer: Option<SharedState>,
}

impl MockSerialPort {
    /// Create an unconnected mock serial port with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: SharedState::default(),
            peer: None,
        }
    }

    /// Create a mock port and apply `config`, as [`Port::open`](super::Port::open) would.
    pub fn open(name: impl Into<String>, config: &PortConfiguration) -> Result<Self, PortError> {
        let mut port = Self::new(name);
        port.reconfigure(config)?;
        Ok(port)
    }

    /// Create a port whose TX is wired to its own RX.
    pub fn loopback(name: impl Into<String>) -> Self {
        let mut port = Self::new(name);
        port.peer = Some(Arc::clone(&port.state));
        port
    }

    /// Create two ports connected by a null-modem link.
    pub fn pair(a: impl Into<String>, b: impl Into<String>) -> (Self, Self) {
        let mut left = Self::new(a);
        let mut right = Self::new(b);
        left.peer = Some(Arc::clone(&right.state));
        right.peer = Some(Arc::clone(&left.state));
        (left, right)
    }

    fn lock(&self) -> MutexGuard<'_, MockPortState> {
        self.state.lock().unwrap()
    }

    fn open_state(&self) -> Result<MutexGuard<'_, MockPortState>, PortError> {
        let state = self.lock();
        if state.closed {
            return Err(PortError::NotOpen);
        }
        Ok(state)
    }

    /// Enqueue bytes to be returned by subsequent read operations.
    ///
    /// The bytes are added to the end of the read queue.
    pub fn enqueue_read(&mut self, data: &[u8]) {
        self.lock().read_queue.extend(data);
    }

    /// Get a copy of all data written to the port.
    pub fn get_write_log(&self) -> Vec<Vec<u8>> {
        self.lock().write_log.clone()
    }

    /// Get every configuration applied so far.
    pub fn applied_configurations(&self) -> Vec<PortConfiguration> {
        self.lock().applied.clone()
    }

    /// Limit how many bytes a single write accepts.
    pub fn set_write_limit(&mut self, limit: Option<usize>) {
        self.lock().write_limit = limit;
    }

    /// Get whether buffers have been cleared since the last reset.
    pub fn was_cleared(&self) -> bool {
        self.lock().buffers_cleared
    }

    /// Get the number of bytes available to read.
    pub fn available_bytes(&self) -> usize {
        self.lock().read_queue.len()
    }

    /// Whether any handle to this port has been closed.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Close the port. Every clone sharing this state fails afterwards.
    pub fn close(self) -> Result<(), PortError> {
        let mut state = self.open_state()?;
        state.closed = true;
        Ok(())
    }
}

impl SerialPortAdapter for MockSerialPort {
    fn name(&self) -> &str {
        &self.name
    }

    fn reconfigure(&mut self, config: &PortConfiguration) -> Result<(), PortError> {
        let mut state = self.open_state()?;
        platform::translate(config)?;
        state.applied.push(*config);
        Ok(())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        let accepted = {
            let mut state = self.open_state()?;
            let accepted = &data[..state.write_limit.unwrap_or(data.len()).min(data.len())];
            state.write_log.push(accepted.to_vec());
            accepted
        };

        // Lock the peer separately; for a loopback it is our own state.
        if let Some(peer) = &self.peer {
            peer.lock().unwrap().read_queue.extend(accepted);
        }

        Ok(accepted.len())
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        let mut state = self.open_state()?;

        // Read as many bytes as possible from the queue; none means timeout.
        let mut bytes_read = 0;
        for byte in buffer.iter_mut() {
            match state.read_queue.pop_front() {
                Some(queued_byte) => {
                    *byte = queued_byte;
                    bytes_read += 1;
                }
                None => break,
            }
        }

        Ok(bytes_read)
    }

    fn clear_buffers(&mut self) -> Result<(), PortError> {
        let mut state = self.open_state()?;
        state.read_queue.clear();
        state.buffers_cleared = true;
        Ok(())
    }
}

impl std::fmt::Debug for MockSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSerialPort")
            .field("name", &self.name)
            .field("available_bytes", &self.available_bytes())
            .field("connected", &self.peer.is_some())
            .finish()
    }
}
