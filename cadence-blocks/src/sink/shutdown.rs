//! Conditional loop shutdown.

use cadence_core::prelude::*;
use tracing::info;

/// Asks the loop harness to stop once its input is `true`.
///
/// The current tick always completes; the harness stops before the next.
#[derive(Debug, Default)]
pub struct Shutdown;

impl Shutdown {
    /// Stop when true.
    pub const INPUT: InputSlot<bool> = InputSlot::new(0);

    /// Create the block.
    pub fn new() -> Self {
        Self
    }
}

impl Block for Shutdown {
    fn info(&self) -> BlockInfo {
        BlockInfo::new("shutdown", ProcessingPolicy::Always)
            .with_input(PortInfo::of::<bool>().named("stop"))
    }

    fn process(&mut self, ctx: &mut dyn BlockContext) -> Result<()> {
        if ctx.get(Self::INPUT)? {
            info!(
                block = %ctx.block_id(),
                loop_number = ctx.system().loop_number(),
                "Shutdown requested"
            );
            ctx.request_shutdown();
        }
        Ok(())
    }
}
