//! Constant values.

use cadence_core::prelude::*;
use std::any::Any;

/// Outputs the same value every time it is requested.
pub struct Constant<T> {
    value: T,
}

impl<T> Constant<T> {
    /// The constant value.
    pub const OUTPUT: OutputSlot<T> = OutputSlot::new(0);

    /// Create a constant block.
    pub fn new(value: T) -> Self {
        Self { value }
    }

    /// The value this block outputs.
    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T: Any + Clone + Send + Sync> Block for Constant<T> {
    fn info(&self) -> BlockInfo {
        BlockInfo::new("constant", ProcessingPolicy::Lazy)
            .with_output(PortInfo::of::<T>().named("value"))
    }

    fn process(&mut self, ctx: &mut dyn BlockContext) -> Result<()> {
        ctx.set(Self::OUTPUT, self.value.clone())
    }
}
