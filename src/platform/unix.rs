//! Device handling shared by every POSIX family.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::{AsRawFd, IntoRawFd};

/// Open `path` read/write without making it the controlling terminal.
pub(crate) fn open_device(path: &str) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(libc::O_NOCTTY)
        .open(path)
}

/// Discard both the unread input and the unsent output queues.
pub(crate) fn discard_buffers(file: &File) -> io::Result<()> {
    // SAFETY: the descriptor is owned by `file` and stays open for the call.
    if unsafe { libc::tcflush(file.as_raw_fd(), libc::TCIOFLUSH) } == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Close the descriptor and report the result of `close(2)`.
///
/// `File`'s own `Drop` swallows this error, so the descriptor is detached
/// first and closed by hand.
pub(crate) fn close_device(file: File) -> io::Result<()> {
    let fd = file.into_raw_fd();
    // SAFETY: `fd` was just released by `file`; nothing else refers to it.
    if unsafe { libc::close(fd) } == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}
