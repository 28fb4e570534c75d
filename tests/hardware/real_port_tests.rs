//! Tests requiring actual serial hardware.
//!
//! # Running Hardware Tests
//!
//! ```bash
//! export TEST_PORT=/dev/ttyUSB0           # or COM3 on Windows
//! export TEST_BAUD=115200                 # optional, default: 115200
//! export TEST_LOOPBACK=1                  # if the port has TX wired to RX
//! export RAWSERIAL_TESTING_PEER_PORT=/dev/ttyUSB1   # optional null-modem peer
//!
//! cargo test --test integration_hardware -- --ignored
//! ```

use rawserial::config::{ConfigLoader, TestingConfig};
use rawserial::port::{Port, PortError};
use std::time::Instant;

fn testing_config() -> TestingConfig {
    let config = ConfigLoader::with_defaults().into_config().testing;
    if config.port.is_none() {
        println!("Skipping hardware test: TEST_PORT not set");
    }
    config
}

/// Read until `len` bytes arrived or a read times out.
fn read_up_to(port: &mut Port, len: usize) -> Result<Vec<u8>, PortError> {
    let mut received = Vec::with_capacity(len);
    let mut buffer = [0u8; 256];
    while received.len() < len {
        let n = port.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        received.extend_from_slice(&buffer[..n]);
    }
    Ok(received)
}

#[test]
#[ignore] // Run with --ignored flag
fn test_real_port_open_close() {
    let testing = testing_config();
    let Some(port_name) = testing.port.as_deref() else {
        return;
    };

    let port = Port::open(port_name, &testing.port_configuration())
        .unwrap_or_else(|e| panic!("Port open failed: {e}"));
    port.close().expect("close");
}

#[test]
#[ignore]
fn test_real_port_reopen_after_invalid_config() {
    let testing = testing_config();
    let Some(port_name) = testing.port.as_deref() else {
        return;
    };

    let invalid = testing.port_configuration().with_data_bits(3);
    assert!(matches!(
        Port::open(port_name, &invalid),
        Err(PortError::InvalidDataBits(3))
    ));

    let port = Port::open(port_name, &testing.port_configuration()).expect("reopen");
    port.close().unwrap();
}

#[test]
#[ignore]
fn test_real_port_loopback() {
    let testing = testing_config();
    let Some(port_name) = testing.port.as_deref() else {
        return;
    };
    if !testing.loopback_enabled {
        println!("Skipping loopback test: TEST_LOOPBACK not set");
        return;
    }

    let mut port = Port::open(port_name, &testing.port_configuration()).unwrap();
    port.flush().unwrap();

    let payload: Vec<u8> = (0..=255u8).cycle().take(1024).collect();
    let started = Instant::now();
    let written = port.write(&payload).unwrap();
    let received = read_up_to(&mut port, written).unwrap();

    println!("Loopback of {written} bytes took {:?}", started.elapsed());
    assert_eq!(received, payload[..written].to_vec());
    port.close().unwrap();
}

#[test]
#[ignore]
fn test_real_port_null_modem_pair() {
    let testing = testing_config();
    let (Some(a), Some(b)) = (testing.port.as_deref(), testing.peer_port.as_deref()) else {
        return;
    };

    let config = testing.port_configuration();
    let mut left = Port::open(a, &config).unwrap();
    let mut right = Port::open(b, &config).unwrap();
    left.flush().unwrap();
    right.flush().unwrap();

    let n = left.write(b"ping").unwrap();
    assert_eq!(read_up_to(&mut right, n).unwrap(), b"ping"[..n].to_vec());

    left.close().unwrap();
    right.close().unwrap();
}
