//! Core trait for devices that carry a line discipline.
//!
//! Defines the `LineDiscipline` trait so the real [`PortSession`] and the
//! in-memory [`MockLine`] share one apply/verify implementation.
//!
//! [`PortSession`]: super::PortSession
//! [`MockLine`]: super::MockLine

use crate::error::LineResult;
use crate::line::LineConfig;
use crate::termios::{translate, PlatformBitfield};
use tracing::debug;

/// A handle whose termios settings can be read and replaced.
pub trait LineDiscipline: std::fmt::Debug {
    /// Device path or identifier, used in errors and logs.
    fn name(&self) -> &str;

    /// Read the live settings. This is the baseline for [`apply`].
    ///
    /// [`apply`]: LineDiscipline::apply
    fn current_config(&self) -> LineResult<PlatformBitfield>;

    /// Replace the live settings immediately with `bits`.
    fn write_config(&mut self, bits: &PlatformBitfield) -> LineResult<()>;

    /// Encode `cfg` over the live settings and write the result now.
    ///
    /// Fields `cfg` does not control keep the values the device reported.
    fn apply(&mut self, cfg: &LineConfig) -> LineResult<()> {
        let baseline = self.current_config()?;
        let bits = translate::encode(&baseline, cfg)?;
        self.write_config(&bits)?;
        debug!(port = self.name(), config = %cfg, "applied line settings");
        Ok(())
    }

    /// Decode the live settings.
    fn active_line_config(&self) -> LineResult<LineConfig> {
        translate::decode(&self.current_config()?)
    }

    /// Whether the live settings decode to exactly `expected`.
    ///
    /// Settings that cannot be decoded at all count as a mismatch.
    fn verify(&self, expected: &LineConfig) -> LineResult<bool> {
        let bits = self.current_config()?;
        Ok(translate::decode(&bits).is_ok_and(|active| active == *expected))
    }
}
