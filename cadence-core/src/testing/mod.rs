//! Deterministic testing support.
//!
//! The loop harness reads time through a [`ClockProvider`], so tests can
//! substitute a [`MockClock`] and control loop timing exactly.

pub mod clock;

pub use clock::{ClockProvider, MockClock, RealClock};
