//! One-tick delay.

use cadence_core::prelude::*;
use std::any::Any;

/// Outputs the value its input had on the previous tick.
///
/// `Delay` is out-first: its output is produced before anything else runs,
/// so it may sit on a feedback loop. On the first tick, before any input
/// has been seen, it outputs `initial`.
pub struct Delay<T> {
    initial: T,
}

impl<T> Delay<T> {
    /// The value to delay.
    pub const INPUT: InputSlot<T> = InputSlot::new(0);
    /// The delayed value.
    pub const OUTPUT: OutputSlot<T> = OutputSlot::new(0);

    /// Create a delay that starts out at `initial`.
    pub fn new(initial: T) -> Self {
        Self { initial }
    }
}

impl<T: Any + Clone + Send + Sync> Block for Delay<T> {
    fn info(&self) -> BlockInfo {
        BlockInfo::new("delay", ProcessingPolicy::OutFirst)
            .with_input(PortInfo::of::<T>().named("input"))
            .with_output(PortInfo::of::<T>().named("delayed"))
    }

    fn process(&mut self, ctx: &mut dyn BlockContext) -> Result<()> {
        let value = match ctx.try_get(Self::INPUT)? {
            Some(previous) => previous,
            None => self.initial.clone(),
        };
        ctx.set(Self::OUTPUT, value)
    }
}
