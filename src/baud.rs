//! Baud rate table.
//!
//! Maps a logical rate in bits per second to the platform `speed_t` symbol.
//! Matching is exact: a rate without a symbol on the build target is
//! reported as [`LineError::UnsupportedBaud`], never passed through as a raw
//! integer.

use crate::error::{LineError, LineResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform speed code as stored in the termios speed fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BaudCode(libc::speed_t);

impl BaudCode {
    /// The raw `speed_t` value.
    pub fn raw(self) -> libc::speed_t {
        self.0
    }
}

/// Rates every supported Unix target defines.
const COMMON_RATES: &[(u32, libc::speed_t)] = &[
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

#[cfg(any(target_os = "linux", target_os = "android"))]
const PLATFORM_RATES: &[(u32, libc::speed_t)] = &[
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

#[cfg(any(target_os = "macos", target_os = "ios"))]
const PLATFORM_RATES: &[(u32, libc::speed_t)] = &[
    (7200, libc::B7200),
    (14400, libc::B14400),
    (28800, libc::B28800),
    (76800, libc::B76800),
];

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios"
)))]
const PLATFORM_RATES: &[(u32, libc::speed_t)] = &[];

fn entries() -> impl Iterator<Item = &'static (u32, libc::speed_t)> {
    COMMON_RATES.iter().chain(PLATFORM_RATES.iter())
}

/// Resolve `rate` to its platform code. Exact match only.
pub fn resolve(rate: u32) -> LineResult<BaudCode> {
    entries()
        .find(|(r, _)| *r == rate)
        .map(|(_, code)| BaudCode(*code))
        .ok_or(LineError::UnsupportedBaud(rate))
}

/// Whether the build target defines a symbol for `rate`.
pub fn is_supported(rate: u32) -> bool {
    resolve(rate).is_ok()
}

/// All rates this target can express, ascending.
pub fn supported_rates() -> Vec<u32> {
    let mut rates: Vec<u32> = entries().map(|(r, _)| *r).collect();
    rates.sort_unstable();
    rates
}

/// Inverse lookup from a speed value read back out of a termios structure.
///
/// Some C libraries store the integral rate instead of the symbolic code, so
/// a value equal to a supported rate is accepted as that rate.
pub fn rate_for_code(code: libc::speed_t) -> Option<u32> {
    entries()
        .find(|(_, c)| *c == code)
        .map(|(r, _)| *r)
        .or_else(|| {
            u32::try_from(code)
                .ok()
                .filter(|rate| is_supported(*rate))
        })
}

/// A baud rate validated against the platform table.
///
/// Serializes as the plain integer rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct BaudRate {
    rate: u32,
    code: BaudCode,
}

impl BaudRate {
    /// Validate `rate` against the table.
    pub fn new(rate: u32) -> LineResult<Self> {
        let code = resolve(rate)?;
        Ok(Self { rate, code })
    }

    /// Bits per second.
    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Platform speed code.
    pub fn code(&self) -> BaudCode {
        self.code
    }
}

impl Default for BaudRate {
    /// 9600, present in the common table on every target.
    fn default() -> Self {
        Self {
            rate: 9600,
            code: BaudCode(libc::B9600),
        }
    }
}

impl TryFrom<u32> for BaudRate {
    type Error = LineError;

    fn try_from(rate: u32) -> Result<Self, Self::Error> {
        Self::new(rate)
    }
}

impl From<BaudRate> for u32 {
    fn from(baud: BaudRate) -> Self {
        baud.rate
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rate)
    }
}
