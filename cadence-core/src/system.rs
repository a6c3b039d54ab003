//! Per-loop system state shared with every block.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Read-only loop state exposed to blocks during `process`.
///
/// Reset when a system starts and updated exactly once at the beginning of
/// every tick by the loop harness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemValues {
    loop_number: u64,
    loop_time: f64,
    total_time: f64,
}

impl SystemValues {
    /// Fresh values for a system that has not ticked yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the current tick, starting at zero.
    #[must_use]
    pub fn loop_number(&self) -> u64 {
        self.loop_number
    }

    /// Duration of the current loop in seconds.
    #[must_use]
    pub fn loop_time(&self) -> f64 {
        self.loop_time
    }

    /// Cumulative loop time in seconds, including the current loop.
    #[must_use]
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Reset to the initial state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record the start of tick `loop_number` lasting `loop_time`.
    pub fn begin_loop(&mut self, loop_number: u64, loop_time: Duration) {
        let seconds = loop_time.as_secs_f64();
        self.loop_number = loop_number;
        self.loop_time = seconds;
        self.total_time += seconds;
    }
}
