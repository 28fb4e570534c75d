//! Windows DCB backend.
//!
//! See <https://learn.microsoft.com/en-us/windows/win32/devio/communications-resources>.

use crate::port::{Parity, PortConfiguration, PortError, StopBits};
use std::borrow::Cow;
use std::fs::{File, OpenOptions};
use std::io;
use std::mem;
use std::os::windows::fs::OpenOptionsExt;
use std::os::windows::io::{AsRawHandle, IntoRawHandle};
use winapi::shared::minwindef::{BOOL, BYTE, DWORD, TRUE};
use winapi::um::commapi::{PurgeComm, SetCommMask, SetCommState, SetCommTimeouts};
use winapi::um::handleapi::CloseHandle;
use winapi::um::winbase::{
    COMMTIMEOUTS, DCB, DTR_CONTROL_ENABLE, EVENPARITY, EV_RXCHAR, MARKPARITY, NOPARITY,
    ODDPARITY, ONE5STOPBITS, ONESTOPBIT, PURGE_RXABORT, PURGE_RXCLEAR, PURGE_TXABORT,
    PURGE_TXCLEAR, SPACEPARITY, TWOSTOPBITS,
};
use winapi::um::winbase::{
    CBR_110, CBR_115200, CBR_1200, CBR_128000, CBR_14400, CBR_19200, CBR_2400, CBR_256000,
    CBR_300, CBR_38400, CBR_4800, CBR_56000, CBR_57600, CBR_600, CBR_9600,
};
use winapi::um::winnt::HANDLE;

/// `MAXDWORD`, the "return as soon as data is available" sentinel.
const MAXDWORD: DWORD = DWORD::MAX;

/// Device state and timeouts applied together on every reconfigure.
#[derive(Clone, Copy)]
pub struct CommSettings {
    pub dcb: DCB,
    pub timeouts: COMMTIMEOUTS,
}

/// Native control block applied with `SetCommState` and `SetCommTimeouts`.
pub type NativeSettings = CommSettings;

/// Rates with a dedicated `CBR_*` constant.
pub const STANDARD_BAUD_RATES: &[(u32, DWORD)] = &[
    (110, CBR_110),
    (300, CBR_300),
    (600, CBR_600),
    (1200, CBR_1200),
    (2400, CBR_2400),
    (4800, CBR_4800),
    (9600, CBR_9600),
    (14400, CBR_14400),
    (19200, CBR_19200),
    (38400, CBR_38400),
    (56000, CBR_56000),
    (57600, CBR_57600),
    (115200, CBR_115200),
    (128000, CBR_128000),
    (256000, CBR_256000),
];

const DATA_BITS: &[(u8, BYTE)] = &[(5, 5), (6, 6), (7, 7), (8, 8)];

const PARITIES: &[(Parity, BYTE)] = &[
    (Parity::None, NOPARITY),
    (Parity::Odd, ODDPARITY),
    (Parity::Even, EVENPARITY),
    (Parity::Mark, MARKPARITY),
    (Parity::Space, SPACEPARITY),
];

const STOP_BITS: &[(StopBits, BYTE)] = &[
    (StopBits::One, ONESTOPBIT),
    (StopBits::OnePointFive, ONE5STOPBITS),
    (StopBits::Two, TWOSTOPBITS),
];

fn lookup<K: PartialEq + Copy, V: Copy>(table: &[(K, V)], key: K) -> Option<V> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Prefix bare device names such as `COM10` with `\\.\`.
pub fn device_path(path: &str) -> Cow<'_, str> {
    if path.starts_with('\\') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!(r"\\.\{path}"))
    }
}

/// Translate `config` into a DCB and matching read timeouts.
pub fn translate(config: &PortConfiguration) -> Result<NativeSettings, PortError> {
    let mut dcb = DCB::default();
    dcb.DCBlength = mem::size_of::<DCB>() as DWORD;
    dcb.set_fBinary(TRUE as DWORD);
    dcb.set_fDtrControl(DTR_CONTROL_ENABLE);
    dcb.BaudRate = lookup(STANDARD_BAUD_RATES, config.baud_rate).unwrap_or(config.baud_rate);
    dcb.ByteSize = lookup(DATA_BITS, config.data_bits)
        .ok_or(PortError::InvalidDataBits(config.data_bits))?;
    dcb.Parity = lookup(PARITIES, config.parity).ok_or(PortError::InvalidParity(config.parity))?;
    dcb.StopBits = lookup(STOP_BITS, config.stop_bits)
        .ok_or(PortError::InvalidStopBits(config.stop_bits))?;

    let timeouts = COMMTIMEOUTS {
        ReadIntervalTimeout: MAXDWORD,
        ReadTotalTimeoutMultiplier: MAXDWORD,
        ReadTotalTimeoutConstant: super::read_total_timeout_ms(config.read_timeout),
        WriteTotalTimeoutMultiplier: 0,
        WriteTotalTimeoutConstant: 0,
    };

    Ok(CommSettings { dcb, timeouts })
}

fn raw_handle(file: &File) -> HANDLE {
    file.as_raw_handle() as HANDLE
}

fn check(ok: BOOL) -> io::Result<()> {
    if ok == 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Open the device for exclusive read/write access.
pub(crate) fn open_device(path: &str) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .share_mode(0)
        .open(&*device_path(path))
}

pub(crate) fn apply(file: &File, settings: &NativeSettings) -> io::Result<()> {
    let handle = raw_handle(file);
    let mut dcb = settings.dcb;
    let mut timeouts = settings.timeouts;
    // SAFETY: the handle is open for the lifetime of `file`; the structs are
    // local copies the calls may read.
    unsafe {
        check(SetCommState(handle, &mut dcb))?;
        check(SetCommTimeouts(handle, &mut timeouts))?;
        check(SetCommMask(handle, EV_RXCHAR))?;
    }
    Ok(())
}

pub(crate) fn discard_buffers(file: &File) -> io::Result<()> {
    let flags = PURGE_TXABORT | PURGE_RXABORT | PURGE_TXCLEAR | PURGE_RXCLEAR;
    // SAFETY: the handle is open for the lifetime of `file`.
    check(unsafe { PurgeComm(raw_handle(file), flags) })
}

/// Close the handle and report the result of `CloseHandle`.
pub(crate) fn close_device(file: File) -> io::Result<()> {
    let handle = file.into_raw_handle() as HANDLE;
    // SAFETY: `handle` was just released by `file`; nothing else refers to it.
    check(unsafe { CloseHandle(handle) })
}
