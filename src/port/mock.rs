//! Mock line implementation for testing.
//!
//! Provides a `MockLine` that holds a termios image in memory instead of a
//! device. Supports a configurable baseline, a log of every image written and
//! failure injection for both directions.

use super::traits::LineDiscipline;
use crate::error::{LineError, LineResult};
use crate::termios::PlatformBitfield;
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;

/// Inner state of the mock line, protected by a mutex for interior mutability.
#[derive(Debug, Default)]
struct MockLineState {
    /// Image returned by `current_config`.
    bits: PlatformBitfield,
    /// Every image passed to `write_config`, in order.
    write_log: Vec<PlatformBitfield>,
    /// Whether the next query fails.
    fail_query: bool,
    /// Whether the next write fails.
    fail_apply: bool,
}

/// In-memory stand-in for a serial device.
///
/// Clones share state, so a test can keep one handle for inspection while
/// handing another to the code under test.
///
/// # Example
/// ```
/// use serial_lineconf::port::{LineDiscipline, MockLine};
/// use serial_lineconf::LineConfig;
///
/// let mut line = MockLine::new("MOCK0");
/// let cfg = LineConfig::new(115200).unwrap();
///
/// line.apply(&cfg).unwrap();
///
/// assert!(line.verify(&cfg).unwrap());
/// assert_eq!(line.write_log().len(), 1);
/// ```
#[derive(Clone)]
pub struct MockLine {
    name: String,
    state: Arc<Mutex<MockLineState>>,
}

impl MockLine {
    /// Create a mock line whose settings start all-zero.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockLineState::default())),
        }
    }

    /// Create a mock line that reports `baseline` until first written.
    pub fn with_baseline(name: impl Into<String>, baseline: PlatformBitfield) -> Self {
        let line = Self::new(name);
        line.state.lock().bits = baseline;
        line
    }

    /// The image the line currently holds.
    pub fn bits(&self) -> PlatformBitfield {
        self.state.lock().bits
    }

    /// Get a copy of every image written so far.
    pub fn write_log(&self) -> Vec<PlatformBitfield> {
        self.state.lock().write_log.clone()
    }

    pub fn clear_write_log(&mut self) {
        self.state.lock().write_log.clear();
    }

    /// Make the next `current_config` call fail.
    pub fn set_fail_query(&mut self, fail: bool) {
        self.state.lock().fail_query = fail;
    }

    /// Make the next `write_config` call fail.
    pub fn set_fail_apply(&mut self, fail: bool) {
        self.state.lock().fail_apply = fail;
    }
}

impl LineDiscipline for MockLine {
    fn name(&self) -> &str {
        &self.name
    }

    fn current_config(&self) -> LineResult<PlatformBitfield> {
        let mut state = self.state.lock();

        if state.fail_query {
            state.fail_query = false;
            return Err(LineError::QueryFailed {
                path: self.name.clone(),
                source: io::Error::other("injected query failure"),
            });
        }

        Ok(state.bits)
    }

    fn write_config(&mut self, bits: &PlatformBitfield) -> LineResult<()> {
        let mut state = self.state.lock();

        if state.fail_apply {
            state.fail_apply = false;
            return Err(LineError::ApplyFailed {
                path: self.name.clone(),
                source: io::Error::other("injected apply failure"),
            });
        }

        state.write_log.push(*bits);
        state.bits = *bits;
        Ok(())
    }
}

impl std::fmt::Debug for MockLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockLine")
            .field("name", &self.name)
            .field("writes", &self.state.lock().write_log.len())
            .finish()
    }
}
