//! Platform termios image and everything derived from it.
//!
//! [`PlatformBitfield`] is the exact byte image of `libc::termios` for the
//! build target. The core only interprets it through [`translate`]; bytes it
//! does not model (padding, the line discipline number, unrelated control
//! characters, reserved fields) travel through untouched.

pub mod constants;
pub mod snapshot;
pub mod translate;

use std::fmt;
use std::mem::{size_of, MaybeUninit};

pub use snapshot::SNAPSHOT_LEN;
pub use translate::{controlled_mask, decode, encode};

/// Size of `libc::termios` on this build target.
///
/// 60 bytes on Linux/glibc x86_64 and aarch64, 72 bytes on 64-bit macOS.
pub const BITFIELD_LEN: usize = size_of::<libc::termios>();

/// Opaque byte image of the OS line-discipline structure.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformBitfield {
    bytes: [u8; BITFIELD_LEN],
}

impl PlatformBitfield {
    /// All-zero image.
    pub const fn zeroed() -> Self {
        Self {
            bytes: [0; BITFIELD_LEN],
        }
    }

    /// Wrap raw bytes of the platform structure.
    pub const fn from_array(bytes: [u8; BITFIELD_LEN]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; BITFIELD_LEN] {
        &self.bytes
    }

    /// Run `f` against a typed view of the image.
    pub(crate) fn with_termios<R>(&self, f: impl FnOnce(&libc::termios) -> R) -> R {
        let view = self.materialize();
        // SAFETY: every byte of `view` was initialized from `self.bytes`, and
        // termios consists of plain integers valid for any bit pattern.
        f(unsafe { &*view.as_ptr() })
    }

    /// Run `f` against a mutable typed view and store the result back.
    ///
    /// Only bytes `f` actually writes change; padding and unmodelled fields
    /// keep their previous values.
    pub(crate) fn with_termios_mut<R>(&mut self, f: impl FnOnce(&mut libc::termios) -> R) -> R {
        let mut view = self.materialize();
        // SAFETY: as in `with_termios`.
        let out = f(unsafe { &mut *view.as_mut_ptr() });
        // SAFETY: the view is BITFIELD_LEN initialized bytes.
        unsafe {
            std::ptr::copy_nonoverlapping(
                view.as_ptr().cast::<u8>(),
                self.bytes.as_mut_ptr(),
                BITFIELD_LEN,
            );
        }
        out
    }

    /// Pointer-compatible storage for `tcgetattr`/`tcsetattr`.
    pub(crate) fn materialize(&self) -> MaybeUninit<libc::termios> {
        let mut view = MaybeUninit::<libc::termios>::zeroed();
        // SAFETY: the destination is exactly BITFIELD_LEN bytes.
        unsafe {
            std::ptr::copy_nonoverlapping(
                self.bytes.as_ptr(),
                view.as_mut_ptr().cast::<u8>(),
                BITFIELD_LEN,
            );
        }
        view
    }

    /// Capture the bytes of a termios that was filled in place.
    ///
    /// `view` must have been zero-initialized before the OS wrote into it.
    pub(crate) fn from_materialized(view: &MaybeUninit<libc::termios>) -> Self {
        let mut bytes = [0u8; BITFIELD_LEN];
        // SAFETY: `view` was zeroed then written by the OS, so all bytes
        // are initialized.
        unsafe {
            std::ptr::copy_nonoverlapping(
                view.as_ptr().cast::<u8>(),
                bytes.as_mut_ptr(),
                BITFIELD_LEN,
            );
        }
        Self { bytes }
    }

    pub fn input_flags(&self) -> libc::tcflag_t {
        self.with_termios(|t| t.c_iflag)
    }

    pub fn output_flags(&self) -> libc::tcflag_t {
        self.with_termios(|t| t.c_oflag)
    }

    pub fn control_flags(&self) -> libc::tcflag_t {
        self.with_termios(|t| t.c_cflag)
    }

    pub fn local_flags(&self) -> libc::tcflag_t {
        self.with_termios(|t| t.c_lflag)
    }

    /// Control character at `index`, `None` past `NCCS`.
    pub fn control_char(&self, index: usize) -> Option<libc::cc_t> {
        self.with_termios(|t| t.c_cc.get(index).copied())
    }
}

impl Default for PlatformBitfield {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl fmt::Debug for PlatformBitfield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformBitfield")
            .field("iflag", &format_args!("{:#x}", self.input_flags()))
            .field("oflag", &format_args!("{:#x}", self.output_flags()))
            .field("cflag", &format_args!("{:#x}", self.control_flags()))
            .field("lflag", &format_args!("{:#x}", self.local_flags()))
            .field("vmin", &self.control_char(libc::VMIN))
            .field("vtime", &self.control_char(libc::VTIME))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_len_matches_platform_struct() {
        assert_eq!(BITFIELD_LEN, size_of::<libc::termios>());
        assert_eq!(PlatformBitfield::zeroed().as_bytes().len(), BITFIELD_LEN);
    }

    #[test]
    fn test_mutation_touches_only_written_field() {
        let mut bits = PlatformBitfield::from_array([0xA5; BITFIELD_LEN]);
        let before = bits;

        bits.with_termios_mut(|t| t.c_oflag = 0);

        assert_eq!(bits.output_flags(), 0);
        assert_eq!(bits.input_flags(), before.input_flags());
        assert_eq!(bits.control_flags(), before.control_flags());
        let changed = bits
            .as_bytes()
            .iter()
            .zip(before.as_bytes())
            .filter(|(a, b)| a != b)
            .count();
        assert_eq!(changed, size_of::<libc::tcflag_t>());
    }

    #[test]
    fn test_control_char_bounds() {
        let bits = PlatformBitfield::zeroed();
        assert_eq!(bits.control_char(libc::VMIN), Some(0));
        assert_eq!(bits.control_char(libc::NCCS), None);
    }
}
