//! Native configuration backends.
//!
//! Exactly one platform family is compiled in. Each family provides its
//! standard rate table, the `NativeSettings` control block, and `translate`,
//! which maps a [`PortConfiguration`](crate::port::PortConfiguration) onto
//! that block without touching any device.
//!
//! | family    | targets                                           | control block        |
//! |-----------|---------------------------------------------------|----------------------|
//! | `linux`   | Linux                                             | `termios2`, TCSETS2  |
//! | `bsd`     | macOS, iOS, FreeBSD, DragonFly, NetBSD, OpenBSD   | `termios`, TIOCSETA  |
//! | `windows` | Windows                                           | `DCB` + COMMTIMEOUTS |

use std::time::Duration;

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub(crate) use self::unix::{close_device, discard_buffers, open_device};

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::*;

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "openbsd"
))]
mod bsd;
#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "openbsd"
))]
pub use bsd::*;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use self::windows::*;

#[cfg(not(any(
    target_os = "linux",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "openbsd",
    windows
)))]
compile_error!("rawserial supports Linux, the BSD family (including macOS) and Windows only");

/// Largest VTIME value a termios control block can hold.
pub const MAX_DECISECONDS: u8 = u8::MAX;

/// Total read timeout used on Windows when the configured timeout is zero.
///
/// Together with the two `MAXDWORD` sentinels this makes `ReadFile` return
/// as soon as one byte arrives and otherwise wait for about 49.7 days.
pub const BLOCKING_READ_TOTAL_MS: u32 = u32::MAX - 1;

/// Convert a read timeout to the POSIX VTIME unit.
///
/// The timeout is truncated to whole tenths of a second and clamped to
/// `1..=255`, so any non-zero timeout yields a usable inter-byte timer.
/// Callers only use this for non-zero timeouts; zero selects VMIN=1 instead.
pub fn read_timeout_deciseconds(timeout: Duration) -> u8 {
    let deciseconds = timeout.as_millis() / 100;
    deciseconds.clamp(1, u128::from(MAX_DECISECONDS)) as u8
}

/// Convert a read timeout to the Windows `ReadTotalTimeoutConstant`.
///
/// Zero maps to [`BLOCKING_READ_TOTAL_MS`]. Anything else is rounded up to at
/// least one millisecond and capped below `MAXDWORD`, which would otherwise
/// turn the sentinel combination into "return immediately".
pub fn read_total_timeout_ms(timeout: Duration) -> u32 {
    if timeout.is_zero() {
        return BLOCKING_READ_TOTAL_MS;
    }
    timeout
        .as_millis()
        .clamp(1, u128::from(BLOCKING_READ_TOTAL_MS)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deciseconds_saturate_at_bounds() {
        assert_eq!(read_timeout_deciseconds(Duration::from_millis(1)), 1);
        assert_eq!(read_timeout_deciseconds(Duration::from_millis(99)), 1);
        assert_eq!(read_timeout_deciseconds(Duration::from_millis(100)), 1);
        assert_eq!(read_timeout_deciseconds(Duration::from_millis(250)), 2);
        assert_eq!(read_timeout_deciseconds(Duration::from_secs(1)), 10);
        assert_eq!(read_timeout_deciseconds(Duration::from_millis(25_500)), 255);
        assert_eq!(read_timeout_deciseconds(Duration::from_secs(3600)), 255);
    }

    #[test]
    fn test_deciseconds_sub_millisecond() {
        assert_eq!(read_timeout_deciseconds(Duration::from_nanos(1)), 1);
    }

    #[test]
    fn test_total_timeout_ms() {
        assert_eq!(read_total_timeout_ms(Duration::ZERO), BLOCKING_READ_TOTAL_MS);
        assert_eq!(read_total_timeout_ms(Duration::from_micros(300)), 1);
        assert_eq!(read_total_timeout_ms(Duration::from_millis(1500)), 1500);
        assert_eq!(
            read_total_timeout_ms(Duration::from_secs(u64::MAX)),
            BLOCKING_READ_TOTAL_MS
        );
    }
}
