//! Shared test utilities for serial-lineconf tests.
//!
//! This module provides common test infrastructure including:
//! - A pseudo-terminal pair standing in for a real serial device
//! - Line configuration builders used across test files

#![allow(dead_code)]

use serial_lineconf::{
    DataBits, FlowControl, LineConfig, Mode, Parity, ReadTimeout, StopBits,
};
use std::ffi::CStr;
use std::os::fd::{FromRawFd, OwnedFd};
use std::path::PathBuf;

/// A pseudo-terminal pair. The slave side behaves like a serial device for
/// `tcgetattr`/`tcsetattr`.
pub struct PtyPair {
    pub master: OwnedFd,
    /// Kept open so the slave device node stays alive while sessions reopen it.
    pub slave: OwnedFd,
    pub slave_path: PathBuf,
}

impl PtyPair {
    pub fn open() -> Self {
        let mut master: libc::c_int = -1;
        let mut slave: libc::c_int = -1;
        let mut name = [0 as libc::c_char; 128];

        let rc = unsafe {
            libc::openpty(
                &mut master,
                &mut slave,
                name.as_mut_ptr(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
            )
        };
        assert_eq!(rc, 0, "openpty failed: {}", std::io::Error::last_os_error());

        let slave_path = unsafe { CStr::from_ptr(name.as_ptr()) }
            .to_str()
            .expect("pty name is not UTF-8")
            .into();

        Self {
            master: unsafe { OwnedFd::from_raw_fd(master) },
            slave: unsafe { OwnedFd::from_raw_fd(slave) },
            slave_path,
        }
    }
}

/// 115200 8N1 raw with `(0, 2.0 s)` read timeout.
pub fn fast_raw() -> LineConfig {
    LineConfig::new(115200)
        .expect("115200 is supported everywhere")
        .with_read_timeout(ReadTimeout::new(0, 20))
}

/// 19200 8N2 canonical with XON/XOFF.
///
/// Pseudo-terminals force eight data bits and no parity, so configs applied
/// to a pty stay within that.
pub fn slow_canonical_software() -> LineConfig {
    LineConfig::new(19200)
        .expect("19200 is supported everywhere")
        .with_stop_bits(StopBits::Two)
        .with_flow_control(FlowControl::Software)
        .with_mode(Mode::Canonical)
        .with_read_timeout(ReadTimeout::new(1, 0))
}

/// 7E1 with hardware flow control. Not representable on a pty.
pub fn seven_even_hardware() -> LineConfig {
    LineConfig::new(4800)
        .expect("4800 is supported everywhere")
        .with_data_bits(DataBits::Seven)
        .with_parity(Parity::Even)
        .with_flow_control(FlowControl::Hardware)
}
