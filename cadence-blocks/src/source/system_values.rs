//! Loop state as block outputs.

use cadence_core::prelude::*;

/// Exposes [`SystemValues`] to blocks that take them as inputs.
#[derive(Debug, Default)]
pub struct SystemValuesBlock;

impl SystemValuesBlock {
    /// Index of the current tick.
    pub const LOOP_NUMBER: OutputSlot<u64> = OutputSlot::new(0);
    /// Duration of the current loop in seconds.
    pub const LOOP_TIME: OutputSlot<f64> = OutputSlot::new(1);
    /// Cumulative loop time in seconds.
    pub const TOTAL_TIME: OutputSlot<f64> = OutputSlot::new(2);

    /// Create the block.
    pub fn new() -> Self {
        Self
    }
}

impl Block for SystemValuesBlock {
    fn info(&self) -> BlockInfo {
        BlockInfo::new("system_values", ProcessingPolicy::Lazy)
            .with_output(PortInfo::of::<u64>().named("loop_number"))
            .with_output(PortInfo::of::<f64>().named("loop_time"))
            .with_output(PortInfo::of::<f64>().named("total_time"))
    }

    fn process(&mut self, ctx: &mut dyn BlockContext) -> Result<()> {
        let values = *ctx.system();
        ctx.set(Self::LOOP_NUMBER, values.loop_number())?;
        ctx.set(Self::LOOP_TIME, values.loop_time())?;
        ctx.set(Self::TOTAL_TIME, values.total_time())
    }
}
