//! Port abstraction layer for line configuration.
//!
//! Provides the `LineDiscipline` trait, the real `PortSession` over an opened
//! device, and an in-memory mock for testing.

pub mod mock;
pub mod session;
pub mod traits;

pub use mock::MockLine;
pub use session::PortSession;
pub use traits::*;
