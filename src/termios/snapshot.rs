//! Raw snapshot format of a [`PlatformBitfield`].
//!
//! A snapshot is the exact `libc::termios` image: no header, no version, no
//! checksum. Its length is [`SNAPSHOT_LEN`] and differs between platforms
//! (60 bytes on Linux/glibc x86_64, 72 bytes on 64-bit macOS), so a consumer
//! must know the producing platform out of band. Loading a buffer of any
//! other length fails instead of truncating or padding.

use super::{PlatformBitfield, BITFIELD_LEN};
use crate::error::{LineError, LineResult};
use std::path::Path;
use tracing::trace;

/// Byte length of a snapshot produced by this build.
pub const SNAPSHOT_LEN: usize = BITFIELD_LEN;

/// Exact copy of the image.
pub fn to_bytes(bits: &PlatformBitfield) -> Vec<u8> {
    bits.as_bytes().to_vec()
}

/// Rebuild an image; `buf` must be exactly [`SNAPSHOT_LEN`] bytes.
pub fn from_bytes(buf: &[u8]) -> LineResult<PlatformBitfield> {
    let bytes: [u8; SNAPSHOT_LEN] = buf.try_into().map_err(|_| LineError::SizeMismatch {
        expected: SNAPSHOT_LEN,
        actual: buf.len(),
    })?;
    Ok(PlatformBitfield::from_array(bytes))
}

/// Write a snapshot file, replacing any existing one.
pub fn save(path: impl AsRef<Path>, bits: &PlatformBitfield) -> LineResult<()> {
    let path = path.as_ref();
    std::fs::write(path, bits.as_bytes()).map_err(|source| LineError::SnapshotIo {
        path: path.to_path_buf(),
        source,
    })?;
    trace!(path = %path.display(), len = SNAPSHOT_LEN, "wrote line settings snapshot");
    Ok(())
}

/// Read a snapshot file written by [`save`] on the same platform.
pub fn load(path: impl AsRef<Path>) -> LineResult<PlatformBitfield> {
    let path = path.as_ref();
    let buf = std::fs::read(path).map_err(|source| LineError::SnapshotIo {
        path: path.to_path_buf(),
        source,
    })?;
    trace!(path = %path.display(), len = buf.len(), "read line settings snapshot");
    from_bytes(&buf)
}
