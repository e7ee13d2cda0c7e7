//! Translation between [`LineConfig`] and the platform termios image.
//!
//! `encode` copies a baseline and patches only the fields a `LineConfig`
//! controls. `decode` is the inverse and refuses images no `LineConfig` can
//! describe. For every constructible config and any baseline,
//! `decode(&encode(&baseline, &cfg)?)? == cfg`.

use super::PlatformBitfield;
use crate::baud::{self, BaudRate};
use crate::error::{LineError, LineResult};
use crate::line::{DataBits, FlowControl, LineConfig, Mode, Parity, ReadTimeout, StopBits};
use libc::tcflag_t;

/// Local-mode bits cleared in raw mode and set in canonical mode.
const LINE_EDITING: tcflag_t = libc::ICANON | libc::ECHO | libc::ECHOE | libc::ISIG;

/// Input bits of XON/XOFF flow control.
const SOFTWARE_FLOW: tcflag_t = libc::IXON | libc::IXOFF;

/// Receiver enabled, modem control lines ignored. Always asserted.
const RAW_LINK: tcflag_t = libc::CREAD | libc::CLOCAL;

/// Mark/space ("stick") parity selector. Only Linux defines it.
#[cfg(any(target_os = "linux", target_os = "android"))]
const STICK_PARITY: tcflag_t = libc::CMSPAR;
#[cfg(not(any(target_os = "linux", target_os = "android")))]
const STICK_PARITY: tcflag_t = 0;

#[cfg(any(target_os = "linux", target_os = "android"))]
const IBSHIFT: u32 = 16;

/// Split input-rate field; zero means "same as output".
#[cfg(any(target_os = "linux", target_os = "android"))]
const CIBAUD: tcflag_t = libc::CBAUD << IBSHIFT;

/// glibc's private "input speed 0" marker in `c_iflag`.
#[cfg(all(target_os = "linux", target_env = "gnu"))]
const GLIBC_IBAUD0: tcflag_t = 0o20000000000;

/// Derive the termios image for `cfg` on top of `baseline`.
///
/// Fails with [`LineError::UnsupportedBaud`] only if the C library refuses
/// the speed code.
pub fn encode(baseline: &PlatformBitfield, cfg: &LineConfig) -> LineResult<PlatformBitfield> {
    let mut bits = *baseline;
    let speed_set = bits.with_termios_mut(|t| {
        t.c_cflag &= !libc::CSIZE;
        t.c_cflag |= match cfg.data_bits() {
            DataBits::Five => libc::CS5,
            DataBits::Six => libc::CS6,
            DataBits::Seven => libc::CS7,
            DataBits::Eight => libc::CS8,
        };

        t.c_cflag &= !STICK_PARITY;
        match cfg.parity() {
            Parity::None => {
                t.c_cflag &= !(libc::PARENB | libc::PARODD);
                t.c_iflag &= !libc::INPCK;
                t.c_iflag |= libc::IGNPAR;
            }
            Parity::Even => {
                t.c_cflag |= libc::PARENB;
                t.c_cflag &= !libc::PARODD;
                t.c_iflag |= libc::INPCK;
                t.c_iflag &= !libc::IGNPAR;
            }
            Parity::Odd => {
                t.c_cflag |= libc::PARENB | libc::PARODD;
                t.c_iflag |= libc::INPCK;
                t.c_iflag &= !libc::IGNPAR;
            }
        }

        match cfg.stop_bits() {
            StopBits::One => t.c_cflag &= !libc::CSTOPB,
            StopBits::Two => t.c_cflag |= libc::CSTOPB,
        }

        t.c_cflag &= !libc::CRTSCTS;
        t.c_iflag &= !(SOFTWARE_FLOW | libc::IXANY);
        match cfg.flow_control() {
            FlowControl::None => {}
            FlowControl::Software => t.c_iflag |= SOFTWARE_FLOW,
            FlowControl::Hardware => t.c_cflag |= libc::CRTSCTS,
        }

        t.c_cflag |= RAW_LINK;

        match cfg.mode() {
            Mode::Raw => t.c_lflag &= !LINE_EDITING,
            Mode::Canonical => t.c_lflag |= LINE_EDITING,
        }

        let timeout = cfg.read_timeout();
        t.c_cc[libc::VMIN] = timeout.min_bytes;
        t.c_cc[libc::VTIME] = timeout.deciseconds;

        set_speed(t, cfg.baud())
    });

    if !speed_set {
        return Err(LineError::UnsupportedBaud(cfg.baud().rate()));
    }
    Ok(bits)
}

/// Write the same rate to the input and output speed.
fn set_speed(t: &mut libc::termios, baud: BaudRate) -> bool {
    let code = baud.code().raw();
    let ptr: *mut libc::termios = t;
    // SAFETY: `ptr` comes from a live exclusive reference; the cf* functions
    // only write fields of the structure.
    let ok = unsafe { libc::cfsetispeed(ptr, code) == 0 && libc::cfsetospeed(ptr, code) == 0 };
    #[cfg(any(target_os = "linux", target_os = "android"))]
    {
        t.c_cflag &= !CIBAUD;
    }
    ok
}

/// Recover the `LineConfig` an image encodes.
pub fn decode(bits: &PlatformBitfield) -> LineResult<LineConfig> {
    bits.with_termios(decode_termios)
}

fn decode_termios(t: &libc::termios) -> LineResult<LineConfig> {
    let baud = decode_speed(t)?;

    if t.c_cflag & RAW_LINK != RAW_LINK {
        return Err(LineError::unrepresentable(
            "receiver disabled or modem control lines honoured (CREAD/CLOCAL clear)",
        ));
    }

    let data_bits = match t.c_cflag & libc::CSIZE {
        libc::CS5 => DataBits::Five,
        libc::CS6 => DataBits::Six,
        libc::CS7 => DataBits::Seven,
        libc::CS8 => DataBits::Eight,
        other => {
            return Err(LineError::unrepresentable(format!(
                "character size bits {other:#x}"
            )))
        }
    };

    if t.c_cflag & STICK_PARITY != 0 {
        return Err(LineError::unrepresentable("mark/space parity is selected"));
    }

    let parity = match (t.c_cflag & libc::PARENB != 0, t.c_cflag & libc::PARODD != 0) {
        (false, false) => Parity::None,
        (true, false) => Parity::Even,
        (true, true) => Parity::Odd,
        (false, true) => {
            return Err(LineError::unrepresentable(
                "odd parity selected with parity disabled",
            ))
        }
    };

    let stop_bits = if t.c_cflag & libc::CSTOPB != 0 {
        StopBits::Two
    } else {
        StopBits::One
    };

    let flow_control = decode_flow(t)?;

    let mode = match t.c_lflag & LINE_EDITING {
        0 => Mode::Raw,
        bits if bits == LINE_EDITING => Mode::Canonical,
        bits => {
            return Err(LineError::unrepresentable(format!(
                "partial line editing flags {bits:#x}"
            )))
        }
    };

    let read_timeout = ReadTimeout::new(t.c_cc[libc::VMIN], t.c_cc[libc::VTIME]);

    Ok(LineConfig::from_baud(baud)
        .with_data_bits(data_bits)
        .with_parity(parity)
        .with_stop_bits(stop_bits)
        .with_flow_control(flow_control)
        .with_mode(mode)
        .with_read_timeout(read_timeout))
}

fn decode_flow(t: &libc::termios) -> LineResult<FlowControl> {
    let hardware = t.c_cflag & libc::CRTSCTS;
    let software = t.c_iflag & SOFTWARE_FLOW;

    if t.c_iflag & libc::IXANY != 0 {
        return Err(LineError::unrepresentable("IXANY restart is enabled"));
    }

    match (hardware, software) {
        (0, 0) => Ok(FlowControl::None),
        (0, SOFTWARE_FLOW) => Ok(FlowControl::Software),
        (libc::CRTSCTS, 0) => Ok(FlowControl::Hardware),
        (libc::CRTSCTS, SOFTWARE_FLOW) => Err(LineError::unrepresentable(
            "hardware and software flow control both enabled",
        )),
        (hw, sw) => Err(LineError::unrepresentable(format!(
            "partial flow control bits (cflag {hw:#x}, iflag {sw:#x})"
        ))),
    }
}

fn decode_speed(t: &libc::termios) -> LineResult<BaudRate> {
    // SAFETY: `t` is a valid termios; the cf* getters only read it.
    let (input, output) = unsafe { (libc::cfgetispeed(t), libc::cfgetospeed(t)) };
    if input != output {
        return Err(LineError::unrepresentable(format!(
            "split input/output speed ({input:#x} vs {output:#x})"
        )));
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    {
        let split = (t.c_cflag & CIBAUD) >> IBSHIFT;
        if split != 0 && split != t.c_cflag & libc::CBAUD {
            return Err(LineError::unrepresentable(format!(
                "split input speed field {split:#x}"
            )));
        }
    }

    let rate = baud::rate_for_code(output).ok_or_else(|| {
        LineError::unrepresentable(format!("speed code {output:#x} is not in the baud table"))
    })?;
    BaudRate::new(rate)
}

/// Image with every bit `encode` may write set to one.
///
/// Bits outside the mask are always carried over from the baseline.
pub fn controlled_mask() -> PlatformBitfield {
    let mut mask = PlatformBitfield::zeroed();
    mask.with_termios_mut(|t| {
        t.c_iflag = SOFTWARE_FLOW | libc::IXANY | libc::INPCK | libc::IGNPAR;
        t.c_cflag = libc::CSIZE
            | libc::PARENB
            | libc::PARODD
            | STICK_PARITY
            | libc::CSTOPB
            | libc::CRTSCTS
            | RAW_LINK;
        t.c_lflag = LINE_EDITING;
        t.c_cc[libc::VMIN] = libc::cc_t::MAX;
        t.c_cc[libc::VTIME] = libc::cc_t::MAX;
        mask_speed_storage(t);
    });
    mask
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn mask_speed_storage(t: &mut libc::termios) {
    t.c_cflag |= libc::CBAUD | CIBAUD;
    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    {
        t.c_iflag |= GLIBC_IBAUD0;
        t.c_ispeed = libc::speed_t::MAX;
        t.c_ospeed = libc::speed_t::MAX;
    }
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn mask_speed_storage(t: &mut libc::termios) {
    t.c_ispeed = libc::speed_t::MAX;
    t.c_ospeed = libc::speed_t::MAX;
}
