//! Serial Line Configuration Library
//!
//! This library turns a platform-neutral description of a serial link into
//! `termios` settings, applies them to an opened device and reads them back.
//!
//! # Modules
//!
//! - `baud`: Supported baud rates and their platform speed codes
//! - `line`: The `LineConfig` value type
//! - `termios`: Byte image of the OS structure, translation and snapshots
//! - `port`: Device sessions and the in-memory mock
//! - `error`: Unified error handling
//! - `config`: Configuration management with TOML support
//! - `logging`: Subscriber initialisation
//!
//! # Example
//!
//! ```no_run
//! use serial_lineconf::{LineConfig, LineDiscipline, Parity, PortSession};
//!
//! let cfg = LineConfig::new(115200)?.with_parity(Parity::Even);
//!
//! let mut session = PortSession::open("/dev/ttyUSB0")?;
//! session.apply(&cfg)?;
//! assert!(session.verify(&cfg)?);
//! session.close();
//! # Ok::<(), serial_lineconf::LineError>(())
//! ```

#[cfg(not(unix))]
compile_error!("serial-lineconf supports Unix targets only");

pub mod baud;
pub mod config;
pub mod error;
pub mod line;
pub mod logging;
pub mod port;
pub mod termios;

// Re-export commonly used types for convenience
pub use baud::{BaudCode, BaudRate};
pub use error::{LineError, LineResult};
pub use line::{DataBits, FlowControl, LineConfig, Mode, Parity, ReadTimeout, StopBits};
pub use port::{LineDiscipline, MockLine, PortSession};
pub use termios::{PlatformBitfield, BITFIELD_LEN, SNAPSHOT_LEN};

// Re-export config types
pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
