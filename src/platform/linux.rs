//! Linux termios backend.
//!
//! Uses `termios2` so that rates missing from the `B*` table can still be
//! requested through `BOTHER`; the driver decides whether it accepts them.

use crate::port::{Parity, PortConfiguration, PortError, StopBits};
use libc::{speed_t, tcflag_t};
use std::fs::File;
use std::io;
use std::os::unix::io::AsRawFd;

/// Native control block applied with `TCSETS2`.
pub type NativeSettings = libc::termios2;

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
    (460800, libc::B460800),
    (500000, libc::B500000),
    (576000, libc::B576000),
    (921600, libc::B921600),
    (1000000, libc::B1000000),
    (1152000, libc::B1152000),
    (1500000, libc::B1500000),
    (2000000, libc::B2000000),
    (2500000, libc::B2500000),
    (3000000, libc::B3000000),
    (3500000, libc::B3500000),
    (4000000, libc::B4000000),
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

/// Translate `config` into a raw-mode `termios2`.
pub fn translate(config: &PortConfiguration) -> Result<NativeSettings, PortError> {
    // SAFETY: termios2 is plain integers and arrays; all-zero is a valid value.
    let mut termios: NativeSettings = unsafe { std::mem::zeroed() };
    termios.c_iflag = libc::IGNPAR;
    termios.c_cflag = libc::CREAD | libc::CLOCAL;

    let speed = lookup(STANDARD_BAUD_RATES, config.baud_rate).unwrap_or(libc::BOTHER);
    termios.c_cflag |= speed as tcflag_t;
    termios.c_ispeed = config.baud_rate as speed_t;
    termios.c_ospeed = config.baud_rate as speed_t;

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
    // SAFETY: TCSETS2 reads exactly one termios2 from the pointer.
    let ret = unsafe {
        libc::ioctl(
            file.as_raw_fd(),
            libc::TCSETS2,
            settings as *const NativeSettings,
        )
    };
    if ret == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn speed_bits(termios: &NativeSettings) -> tcflag_t {
        termios.c_cflag & libc::CBAUD
    }

    #[test]
    fn test_standard_rates_use_table_constant() {
        for &(rate, speed) in STANDARD_BAUD_RATES {
            let termios = translate(&PortConfiguration::new(rate)).unwrap();
            assert_eq!(speed_bits(&termios), speed as tcflag_t, "rate {rate}");
            assert_eq!(termios.c_ispeed, rate as speed_t);
            assert_eq!(termios.c_ospeed, rate as speed_t);
        }
    }

    #[test]
    fn test_custom_rate_uses_bother() {
        let termios = translate(&PortConfiguration::new(250_000)).unwrap();
        assert_eq!(speed_bits(&termios), libc::BOTHER as tcflag_t);
        assert_eq!(termios.c_ispeed, 250_000);
        assert_eq!(termios.c_ospeed, 250_000);
    }

    #[test]
    fn test_raw_mode_baseline() {
        let termios = translate(&PortConfiguration::default()).unwrap();
        assert_eq!(termios.c_iflag, libc::IGNPAR);
        assert_eq!(termios.c_oflag, 0);
        assert_eq!(termios.c_lflag, 0);
        assert_ne!(termios.c_cflag & libc::CREAD, 0);
        assert_ne!(termios.c_cflag & libc::CLOCAL, 0);
        assert_eq!(termios.c_cflag & libc::CSIZE, libc::CS8);
        assert_eq!(termios.c_cflag & (libc::PARENB | libc::CSTOPB), 0);
    }

    #[test]
    fn test_framing_flags() {
        let config = PortConfiguration::new(9600)
            .with_data_bits(7)
            .with_parity(Parity::Odd)
            .with_stop_bits(StopBits::Two);
        let termios = translate(&config).unwrap();
        assert_eq!(termios.c_cflag & libc::CSIZE, libc::CS7);
        assert_ne!(termios.c_cflag & libc::PARENB, 0);
        assert_ne!(termios.c_cflag & libc::PARODD, 0);
        assert_ne!(termios.c_cflag & libc::CSTOPB, 0);

        let even = translate(&config.with_parity(Parity::Even)).unwrap();
        assert_ne!(even.c_cflag & libc::PARENB, 0);
        assert_eq!(even.c_cflag & libc::PARODD, 0);
    }

    #[test]
    fn test_windows_only_values_are_rejected() {
        let config = PortConfiguration::default();
        assert!(matches!(
            translate(&config.with_parity(Parity::Mark)),
            Err(PortError::InvalidParity(Parity::Mark))
        ));
        assert!(matches!(
            translate(&config.with_parity(Parity::Space)),
            Err(PortError::InvalidParity(Parity::Space))
        ));
        assert!(matches!(
            translate(&config.with_stop_bits(StopBits::OnePointFive)),
            Err(PortError::InvalidStopBits(StopBits::OnePointFive))
        ));
    }

    #[test]
    fn test_invalid_data_bits() {
        for bits in [0, 4, 9, 255] {
            let config = PortConfiguration::default().with_data_bits(bits);
            assert!(matches!(
                translate(&config),
                Err(PortError::InvalidDataBits(b)) if b == bits
            ));
        }
    }

    #[test]
    fn test_read_timeout_modes() {
        let blocking = translate(&PortConfiguration::default()).unwrap();
        assert_eq!(blocking.c_cc[libc::VMIN], 1);
        assert_eq!(blocking.c_cc[libc::VTIME], 0);

        let timed = translate(
            &PortConfiguration::default().with_read_timeout(Duration::from_millis(1500)),
        )
        .unwrap();
        assert_eq!(timed.c_cc[libc::VMIN], 0);
        assert_eq!(timed.c_cc[libc::VTIME], 15);
    }
}
