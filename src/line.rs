//! Platform-neutral line settings.
//!
//! [`LineConfig`] is the value handed to the translator. It is always fully
//! specified: the baud rate is validated on construction and every other
//! field is a closed enumeration, so there is no partially-filled state.

use crate::baud::BaudRate;
use crate::error::{LineError, LineResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Number of data bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

impl DataBits {
    pub fn count(self) -> u8 {
        match self {
            DataBits::Five => 5,
            DataBits::Six => 6,
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        }
    }
}

impl TryFrom<u8> for DataBits {
    type Error = LineError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            5 => Ok(DataBits::Five),
            6 => Ok(DataBits::Six),
            7 => Ok(DataBits::Seven),
            8 => Ok(DataBits::Eight),
            other => Err(LineError::invalid(format!(
                "data bits must be 5, 6, 7 or 8, got {other}"
            ))),
        }
    }
}

impl From<DataBits> for u8 {
    fn from(bits: DataBits) -> Self {
        bits.count()
    }
}

/// Parity checking modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum StopBits {
    One,
    Two,
}

impl TryFrom<u8> for StopBits {
    type Error = LineError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            1 => Ok(StopBits::One),
            2 => Ok(StopBits::Two),
            other => Err(LineError::invalid(format!(
                "stop bits must be 1 or 2, got {other}"
            ))),
        }
    }
}

impl From<StopBits> for u8 {
    fn from(bits: StopBits) -> Self {
        match bits {
            StopBits::One => 1,
            StopBits::Two => 2,
        }
    }
}

/// Flow control modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowControl {
    None,
    /// XON/XOFF.
    Software,
    /// RTS/CTS.
    Hardware,
}

/// Line editing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Bytes are delivered as received: no line editing, echo or signals.
    Raw,
    /// Line-buffered input with echo and signal characters.
    Canonical,
}

/// Read completion policy, stored in the `VMIN`/`VTIME` control characters.
///
/// A blocking read returns once `min_bytes` are available or `deciseconds`
/// tenths of a second pass after the first byte. With both at zero a read
/// is a poll: it returns immediately with whatever is buffered, possibly
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReadTimeout {
    pub min_bytes: u8,
    pub deciseconds: u8,
}

impl ReadTimeout {
    /// Largest timeout a single control character can hold.
    pub const MAX: Duration = Duration::from_millis(25_500);

    pub const fn new(min_bytes: u8, deciseconds: u8) -> Self {
        Self {
            min_bytes,
            deciseconds,
        }
    }

    /// Build from a duration, rounded to the nearest decisecond.
    pub fn from_duration(min_bytes: u8, timeout: Duration) -> LineResult<Self> {
        let deciseconds = (timeout.as_millis() + 50) / 100;
        let deciseconds = u8::try_from(deciseconds).map_err(|_| {
            LineError::invalid(format!(
                "read timeout {:?} exceeds the maximum of {:?}",
                timeout,
                Self::MAX
            ))
        })?;
        Ok(Self::new(min_bytes, deciseconds))
    }

    /// The inter-byte timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.deciseconds) * 100)
    }

    /// Whether reads return immediately without waiting.
    pub fn is_polling(&self) -> bool {
        self.min_bytes == 0 && self.deciseconds == 0
    }
}

impl Default for ReadTimeout {
    fn default() -> Self {
        Self::new(0, 20)
    }
}

/// Complete logical configuration of a serial line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineConfig {
    baud: BaudRate,
    data_bits: DataBits,
    parity: Parity,
    stop_bits: StopBits,
    flow_control: FlowControl,
    mode: Mode,
    read_timeout: ReadTimeout,
}

impl LineConfig {
    /// 8N1 at `baud`, no flow control, raw mode, default read timeout.
    pub fn new(baud: u32) -> LineResult<Self> {
        Ok(Self::from_baud(BaudRate::new(baud)?))
    }

    /// 8N1 at an already validated rate.
    pub fn from_baud(baud: BaudRate) -> Self {
        Self {
            baud,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
            mode: Mode::Raw,
            read_timeout: ReadTimeout::default(),
        }
    }

    pub fn with_baud(self, baud: BaudRate) -> Self {
        Self { baud, ..self }
    }

    pub fn with_data_bits(self, data_bits: DataBits) -> Self {
        Self { data_bits, ..self }
    }

    pub fn with_parity(self, parity: Parity) -> Self {
        Self { parity, ..self }
    }

    pub fn with_stop_bits(self, stop_bits: StopBits) -> Self {
        Self { stop_bits, ..self }
    }

    pub fn with_flow_control(self, flow_control: FlowControl) -> Self {
        Self {
            flow_control,
            ..self
        }
    }

    pub fn with_mode(self, mode: Mode) -> Self {
        Self { mode, ..self }
    }

    pub fn with_read_timeout(self, read_timeout: ReadTimeout) -> Self {
        Self {
            read_timeout,
            ..self
        }
    }

    pub fn baud(&self) -> BaudRate {
        self.baud
    }

    pub fn data_bits(&self) -> DataBits {
        self.data_bits
    }

    pub fn parity(&self) -> Parity {
        self.parity
    }

    pub fn stop_bits(&self) -> StopBits {
        self.stop_bits
    }

    pub fn flow_control(&self) -> FlowControl {
        self.flow_control
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn read_timeout(&self) -> ReadTimeout {
        self.read_timeout
    }
}

impl Default for LineConfig {
    fn default() -> Self {
        Self::from_baud(BaudRate::default())
    }
}

impl fmt::Display for LineConfig {
    /// Conventional short form, e.g. `115200 8N1 raw` or `9600 7E2 canonical xon/xoff`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parity = match self.parity {
            Parity::None => 'N',
            Parity::Even => 'E',
            Parity::Odd => 'O',
        };
        let stop = u8::from(self.stop_bits);
        let mode = match self.mode {
            Mode::Raw => "raw",
            Mode::Canonical => "canonical",
        };
        write!(
            f,
            "{} {}{}{} {}",
            self.baud,
            self.data_bits.count(),
            parity,
            stop,
            mode
        )?;
        match self.flow_control {
            FlowControl::None => Ok(()),
            FlowControl::Software => f.write_str(" xon/xoff"),
            FlowControl::Hardware => f.write_str(" rts/cts"),
        }
    }
}
