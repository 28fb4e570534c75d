//! BSD-flavoured termios backend (macOS, iOS, FreeBSD, DragonFly, NetBSD, OpenBSD).
//!
//! Speed constants on these systems are the numeric rate itself, so a rate
//! outside the table is handed to `cfsetspeed` unchanged.

use crate::port::{Parity, PortConfiguration, PortError, StopBits};
use libc::{speed_t, tcflag_t};
use std::fs::File;
use std::io;
use std::os::unix::io::AsRawFd;

/// Native control block applied with `TIOCSETA`.
pub type NativeSettings = libc::termios;

/// Rates with a dedicated `B*` speed constant.
pub const STANDARD_BAUD_RATES: &[(u32, speed_t)] = &[
    (50, libc::B50),
    (75, libc::B75),
    (110, libc::B110),
    (134, libc::B134),
    (150, libc::B150),
    (200, libc::B200),
    (300, libc::B300),
    (600, libc::B600),
    (1200, libc::B1200),
    (1800, libc::B1800),
    (2400, libc::B2400),
    (4800, libc::B4800),
    (9600, libc::B9600),
    (19200, libc::B19200),
    (38400, libc::B38400),
    (57600, libc::B57600),
    (115200, libc::B115200),
    (230400, libc::B230400),
];

const DATA_BITS_FLAGS: &[(u8, tcflag_t)] = &[
    (5, libc::CS5),
    (6, libc::CS6),
    (7, libc::CS7),
    (8, libc::CS8),
];

const PARITY_FLAGS: &[(Parity, tcflag_t)] = &[
    (Parity::None, 0),
    (Parity::Even, libc::PARENB),
    (Parity::Odd, libc::PARENB | libc::PARODD),
];

const STOP_BITS_FLAGS: &[(StopBits, tcflag_t)] = &[
    (StopBits::One, 0),
    (StopBits::Two, libc::CSTOPB),
];

fn lookup<K: PartialEq + Copy, V: Copy>(table: &[(K, V)], key: K) -> Option<V> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Translate `config` into a raw-mode `termios`.
pub fn translate(config: &PortConfiguration) -> Result<NativeSettings, PortError> {
    // SAFETY: termios is plain integers and arrays; all-zero is a valid value.
    let mut termios: NativeSettings = unsafe { std::mem::zeroed() };
    termios.c_iflag = libc::IGNPAR;
    termios.c_cflag = libc::CREAD | libc::CLOCAL;

    let speed = lookup(STANDARD_BAUD_RATES, config.baud_rate)
        .unwrap_or(config.baud_rate as speed_t);
    // SAFETY: both calls only store `speed` into the struct we own.
    unsafe {
        libc::cfsetispeed(&mut termios, speed);
        libc::cfsetospeed(&mut termios, speed);
    }

    termios.c_cflag |= lookup(DATA_BITS_FLAGS, config.data_bits)
        .ok_or(PortError::InvalidDataBits(config.data_bits))?;
    termios.c_cflag |=
        lookup(PARITY_FLAGS, config.parity).ok_or(PortError::InvalidParity(config.parity))?;
    termios.c_cflag |= lookup(STOP_BITS_FLAGS, config.stop_bits)
        .ok_or(PortError::InvalidStopBits(config.stop_bits))?;

    if config.read_timeout.is_zero() {
        termios.c_cc[libc::VMIN] = 1;
    } else {
        termios.c_cc[libc::VTIME] = super::read_timeout_deciseconds(config.read_timeout);
    }

    Ok(termios)
}

pub(crate) fn apply(file: &File, settings: &NativeSettings) -> io::Result<()> {
    // SAFETY: tcsetattr only reads the struct behind the pointer.
    if unsafe { libc::tcsetattr(file.as_raw_fd(), libc::TCSANOW, settings) } == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}
