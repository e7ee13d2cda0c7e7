//! Session over an opened serial device.
//!
//! A `PortSession` owns exactly one file descriptor. Opening never blocks on
//! carrier detect, takes an exclusive advisory lock so a second session on
//! the same device is refused, and every configuration change is written
//! with `TCSANOW`.

use super::traits::LineDiscipline;
use crate::error::{LineError, LineResult};
use crate::termios::PlatformBitfield;
use std::fs::OpenOptions;
use std::io;
use std::os::fd::{AsRawFd, OwnedFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use tracing::{debug, warn};

/// Exclusive owner of one serial device handle.
pub struct PortSession {
    /// Path the session was opened from.
    path: String,
    /// `None` once closed.
    fd: Option<OwnedFd>,
}

impl PortSession {
    /// Open `path` read-write with `O_NOCTTY | O_NONBLOCK` and lock it.
    ///
    /// # Example
    /// ```no_run
    /// use serial_lineconf::{LineConfig, LineDiscipline, PortSession};
    ///
    /// let mut session = PortSession::open("/dev/ttyUSB0")?;
    /// session.apply(&LineConfig::new(115200)?)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> LineResult<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY | libc::O_NONBLOCK)
            .open(path)
            .map_err(|e| {
                warn!(port = %path.display(), error = %e, "failed to open serial device");
                LineError::from_open(path, e)
            })?;
        let fd = OwnedFd::from(file);

        // SAFETY: `fd` is a valid open descriptor owned by this function.
        if unsafe { libc::flock(fd.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) } != 0 {
            let err = io::Error::last_os_error();
            match err.raw_os_error() {
                // Some BSD device drivers do not implement advisory locks
                Some(code) if code == libc::ENOTSUP || code == libc::EOPNOTSUPP => {
                    debug!(port = %path.display(), "device does not support flock");
                }
                _ => {
                    warn!(port = %path.display(), error = %err, "serial device is locked by another owner");
                    return Err(LineError::from_open(path, err));
                }
            }
        }

        debug!(port = %path.display(), "opened serial device");
        Ok(Self {
            path: path.display().to_string(),
            fd: Some(fd),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.fd.is_some()
    }

    /// Release the handle. Safe to call more than once.
    pub fn close(&mut self) {
        if self.fd.take().is_some() {
            debug!(port = %self.path, "closed serial device");
        }
    }

    fn raw_fd(&self) -> LineResult<RawFd> {
        self.fd
            .as_ref()
            .map(AsRawFd::as_raw_fd)
            .ok_or_else(|| LineError::Closed(self.path.clone()))
    }
}

impl LineDiscipline for PortSession {
    fn name(&self) -> &str {
        &self.path
    }

    fn current_config(&self) -> LineResult<PlatformBitfield> {
        let fd = self.raw_fd()?;
        let mut view = PlatformBitfield::zeroed().materialize();
        // SAFETY: `view` is a zero-initialized termios owned by this frame.
        if unsafe { libc::tcgetattr(fd, view.as_mut_ptr()) } != 0 {
            let source = io::Error::last_os_error();
            warn!(port = %self.path, error = %source, "tcgetattr failed");
            return Err(LineError::QueryFailed {
                path: self.path.clone(),
                source,
            });
        }
        Ok(PlatformBitfield::from_materialized(&view))
    }

    fn write_config(&mut self, bits: &PlatformBitfield) -> LineResult<()> {
        let fd = self.raw_fd()?;
        let view = bits.materialize();
        // SAFETY: `view` holds BITFIELD_LEN initialized bytes of a termios.
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, view.as_ptr()) } != 0 {
            let source = io::Error::last_os_error();
            warn!(port = %self.path, error = %source, "tcsetattr failed");
            return Err(LineError::ApplyFailed {
                path: self.path.clone(),
                source,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for PortSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortSession")
            .field("path", &self.path)
            .field("open", &self.is_open())
            .finish()
    }
}
