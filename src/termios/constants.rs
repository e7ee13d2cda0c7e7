//! Read-only view of the platform constants the translator is built on.
//!
//! Flag values differ between Linux and BSD-derived systems; this table lets
//! a caller print or diff them without a C compiler at hand.

use serde::Serialize;

/// One named platform constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformConstant {
    pub name: &'static str,
    pub value: u64,
}

macro_rules! constants {
    ($($name:ident),* $(,)?) => {
        &[$(PlatformConstant {
            name: stringify!($name),
            value: libc::$name as u64,
        }),*]
    };
}

static CONSTANTS: &[PlatformConstant] = constants![
    CREAD, CLOCAL, PARENB, PARODD, CSTOPB, CSIZE, CS5, CS6, CS7, CS8, CRTSCTS,
    IXON, IXOFF, IXANY, INPCK, IGNPAR, ICANON, ECHO, ECHOE, ISIG, OPOST,
    VMIN, VTIME, NCCS, TCSANOW, O_RDWR, O_NOCTTY, O_NONBLOCK,
];

/// Every constant, in a fixed order.
pub fn all() -> &'static [PlatformConstant] {
    CONSTANTS
}

/// Value of the constant called `name`.
pub fn lookup(name: &str) -> Option<u64> {
    CONSTANTS.iter().find(|c| c.name == name).map(|c| c.value)
}

/// The table as a JSON array of `{ "name", "value" }` objects.
pub fn to_json() -> serde_json::Result<String> {
    serde_json::to_string_pretty(CONSTANTS)
}
