//! The LoopSystem trait and its block-engine implementation.

use crate::arrangement::Arrangement;
use crate::scheduler::Runner;
use cadence_core::error::Result;
use std::time::Duration;

/// A system driven by a control loop.
pub trait LoopSystem {
    /// Prepare for the first tick.
    fn init(&mut self) -> Result<()>;

    /// Run one loop. `loop_time` is the time since the previous loop
    /// started (zero on the first). Returns `true` to request a stop.
    fn tick(&mut self, loop_time: Duration) -> Result<bool>;

    /// Release resources. Called exactly once after the last tick, also
    /// after a failed one.
    fn stop(&mut self);
}

/// Runs an arrangement of blocks as a [`LoopSystem`].
#[derive(Debug)]
pub struct BlocksSystem {
    runner: Runner,
}

impl BlocksSystem {
    /// Wrap a built arrangement.
    pub fn new(arrangement: Arrangement) -> Self {
        Self {
            runner: Runner::new(arrangement),
        }
    }

    /// The underlying runner.
    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    /// Mutable access to the underlying runner.
    pub fn runner_mut(&mut self) -> &mut Runner {
        &mut self.runner
    }
}

impl From<Runner> for BlocksSystem {
    fn from(runner: Runner) -> Self {
        Self { runner }
    }
}

impl LoopSystem for BlocksSystem {
    fn init(&mut self) -> Result<()> {
        self.runner.init()
    }

    fn tick(&mut self, loop_time: Duration) -> Result<bool> {
        self.runner.process_once(loop_time)?;
        Ok(self.runner.shutdown_requested())
    }

    fn stop(&mut self) {
        self.runner.stop();
    }
}
