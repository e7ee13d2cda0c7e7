//! Error types for line-discipline operations.
//!
//! Every failure is returned to the caller. Nothing here retries, panics or
//! terminates the process; OS failures keep their `std::io::Error` as source.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while opening, translating, applying or snapshotting
/// serial line settings.
#[derive(Debug, Error)]
pub enum LineError {
    /// The device path does not exist.
    #[error("Serial device not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The caller may not open the device read-write.
    #[error("Permission denied opening serial device: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// Another owner holds the device.
    #[error("Serial device is busy: {}", .0.display())]
    Busy(PathBuf),

    /// Any other OS failure while opening the device.
    #[error("Failed to open serial device '{}': {source}", .path.display())]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The requested rate has no symbol on this platform.
    #[error("Unsupported baud rate: {0}")]
    UnsupportedBaud(u32),

    /// A termios image holds a state that no `LineConfig` can express.
    #[error("Line settings have no portable equivalent: {0}")]
    UnrepresentableConfig(String),

    /// A logical setting is outside its valid range.
    #[error("Invalid line setting: {0}")]
    InvalidSetting(String),

    /// Reading the live settings from the device failed.
    #[error("Failed to query line settings of '{path}': {source}")]
    QueryFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Writing settings to the device failed.
    #[error("Failed to apply line settings to '{path}': {source}")]
    ApplyFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The session was closed before the operation.
    #[error("Port session is closed: {0}")]
    Closed(String),

    /// A snapshot buffer does not match this build's structure size.
    #[error("Snapshot size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Reading or writing a snapshot file failed.
    #[error("Snapshot I/O error on '{}': {source}", .path.display())]
    SnapshotIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LineError {
    /// Create an `UnrepresentableConfig` error from a message.
    pub fn unrepresentable(message: impl Into<String>) -> Self {
        Self::UnrepresentableConfig(message.into())
    }

    /// Create an `InvalidSetting` error from a message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidSetting(message.into())
    }

    /// Map the error of an `open(2)` on `path` into the open taxonomy.
    pub fn from_open(path: impl Into<PathBuf>, err: io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ if is_busy(&err) => Self::Busy(path),
            _ => Self::OpenFailed { path, source: err },
        }
    }
}

fn is_busy(err: &io::Error) -> bool {
    matches!(
        err.raw_os_error(),
        Some(code) if code == libc::EBUSY || code == libc::EWOULDBLOCK
    )
}

/// Result alias for line-discipline operations.
pub type LineResult<T> = Result<T, LineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LineError::NotFound(PathBuf::from("/dev/ttyUSB0"));
        assert_eq!(err.to_string(), "Serial device not found: /dev/ttyUSB0");

        let err = LineError::UnsupportedBaud(14400);
        assert_eq!(err.to_string(), "Unsupported baud rate: 14400");

        let err = LineError::SizeMismatch {
            expected: 60,
            actual: 59,
        };
        assert_eq!(
            err.to_string(),
            "Snapshot size mismatch: expected 60 bytes, got 59"
        );
    }

    #[test]
    fn test_open_error_classification() {
        let path = "/dev/ttyS9";

        let err = LineError::from_open(path, io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, LineError::NotFound(_)));

        let err = LineError::from_open(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, LineError::PermissionDenied(_)));

        let err = LineError::from_open(path, io::Error::from_raw_os_error(libc::EBUSY));
        assert!(matches!(err, LineError::Busy(_)));

        let err = LineError::from_open(path, io::Error::from_raw_os_error(libc::EWOULDBLOCK));
        assert!(matches!(err, LineError::Busy(_)));

        let err = LineError::from_open(path, io::Error::from_raw_os_error(libc::EIO));
        match err {
            LineError::OpenFailed { path, source } => {
                assert_eq!(path, PathBuf::from("/dev/ttyS9"));
                assert_eq!(source.raw_os_error(), Some(libc::EIO));
            }
            other => panic!("Expected OpenFailed, got: {:?}", other),
        }
    }

    #[test]
    fn test_errors_keep_io_source() {
        use std::error::Error as _;

        let err = LineError::QueryFailed {
            path: "MOCK0".to_string(),
            source: io::Error::from_raw_os_error(libc::ENOTTY),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("Failed to query line settings of 'MOCK0'"));
    }
}
