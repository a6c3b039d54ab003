//! Fixture blocks for scheduling tests.

#![allow(dead_code)]

use cadence_core::prelude::*;
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared record of which blocks processed, in order.
pub type ProcessLog = Arc<Mutex<Vec<String>>>;

/// Create an empty process log.
pub fn process_log() -> ProcessLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Emits the current loop number plus an offset.
pub struct TickSource {
    pub name: &'static str,
    pub offset: f64,
    pub log: ProcessLog,
}

impl TickSource {
    pub const OUT: OutputSlot<f64> = OutputSlot::new(0);

    pub fn new(name: &'static str, log: &ProcessLog) -> Self {
        Self {
            name,
            offset: 0.0,
            log: Arc::clone(log),
        }
    }
}

impl Block for TickSource {
    fn info(&self) -> BlockInfo {
        BlockInfo::new(self.name, ProcessingPolicy::Lazy).with_output(PortInfo::of::<f64>())
    }

    fn process(&mut self, ctx: &mut dyn BlockContext) -> Result<()> {
        self.log.lock().push(self.name.to_string());
        let value = ctx.system().loop_number() as f64 + self.offset;
        ctx.set(Self::OUT, value)
    }
}

/// Adds one to its input.
pub struct Increment {
    pub name: &'static str,
    pub log: ProcessLog,
}

impl Increment {
    pub const IN: InputSlot<f64> = InputSlot::new(0);
    pub const OUT: OutputSlot<f64> = OutputSlot::new(0);

    pub fn new(name: &'static str, log: &ProcessLog) -> Self {
        Self {
            name,
            log: Arc::clone(log),
        }
    }
}

impl Block for Increment {
    fn info(&self) -> BlockInfo {
        BlockInfo::new(self.name, ProcessingPolicy::Lazy)
            .with_input(PortInfo::of::<f64>())
            .with_output(PortInfo::of::<f64>())
    }

    fn process(&mut self, ctx: &mut dyn BlockContext) -> Result<()> {
        self.log.lock().push(self.name.to_string());
        let value = ctx.get(Self::IN)?;
        ctx.set(Self::OUT, value + 1.0)
    }
}

/// Sums two inputs.
pub struct Sum {
    pub name: &'static str,
    pub log: ProcessLog,
}

impl Sum {
    pub const A: InputSlot<f64> = InputSlot::new(0);
    pub const B: InputSlot<f64> = InputSlot::new(1);
    pub const OUT: OutputSlot<f64> = OutputSlot::new(0);

    pub fn new(name: &'static str, log: &ProcessLog) -> Self {
        Self {
            name,
            log: Arc::clone(log),
        }
    }
}

impl Block for Sum {
    fn info(&self) -> BlockInfo {
        BlockInfo::new(self.name, ProcessingPolicy::Lazy)
            .with_input(PortInfo::of::<f64>().named("a"))
            .with_input(PortInfo::of::<f64>().named("b"))
            .with_output(PortInfo::of::<f64>())
    }

    fn process(&mut self, ctx: &mut dyn BlockContext) -> Result<()> {
        self.log.lock().push(self.name.to_string());
        let sum = ctx.get(Self::A)? + ctx.get(Self::B)?;
        ctx.set(Self::OUT, sum)
    }
}

/// Out-first unit delay; emits `initial` until it has seen an input.
pub struct UnitDelay {
    pub initial: f64,
    pub saw_none: Arc<Mutex<Vec<bool>>>,
}

impl UnitDelay {
    pub const IN: InputSlot<f64> = InputSlot::new(0);
    pub const OUT: OutputSlot<f64> = OutputSlot::new(0);

    pub fn new(initial: f64) -> Self {
        Self {
            initial,
            saw_none: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Block for UnitDelay {
    fn info(&self) -> BlockInfo {
        BlockInfo::new("delay", ProcessingPolicy::OutFirst)
            .with_input(PortInfo::of::<f64>())
            .with_output(PortInfo::of::<f64>())
    }

    fn process(&mut self, ctx: &mut dyn BlockContext) -> Result<()> {
        let input = ctx.try_get(Self::IN)?;
        self.saw_none.lock().push(input.is_none());
        ctx.set(Self::OUT, input.unwrap_or(self.initial))
    }
}

/// Always-processed sink that records what it reads.
pub struct Recorder {
    pub values: Arc<Mutex<Vec<Option<f64>>>>,
}

impl Recorder {
    pub const IN: InputSlot<f64> = InputSlot::new(0);

    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Block for Recorder {
    fn info(&self) -> BlockInfo {
        BlockInfo::new("recorder", ProcessingPolicy::Always)
            .with_input(PortInfo::of::<f64>().optional())
    }

    fn process(&mut self, ctx: &mut dyn BlockContext) -> Result<()> {
        let value = ctx.try_get(Self::IN)?;
        self.values.lock().push(value);
        Ok(())
    }
}

/// Declares an output and never sets it.
pub struct ForgetfulBlock;

impl Block for ForgetfulBlock {
    fn info(&self) -> BlockInfo {
        BlockInfo::new("forgetful", ProcessingPolicy::Always).with_output(PortInfo::of::<f64>())
    }

    fn process(&mut self, _ctx: &mut dyn BlockContext) -> Result<()> {
        Ok(())
    }
}

/// Sets its only output twice.
pub struct StutterBlock;

impl StutterBlock {
    pub const OUT: OutputSlot<f64> = OutputSlot::new(0);
}

impl Block for StutterBlock {
    fn info(&self) -> BlockInfo {
        BlockInfo::new("stutter", ProcessingPolicy::Always).with_output(PortInfo::of::<f64>())
    }

    fn process(&mut self, ctx: &mut dyn BlockContext) -> Result<()> {
        ctx.set(Self::OUT, 1.0)?;
        ctx.set(Self::OUT, 2.0)
    }
}

/// Requests shutdown once the loop number reaches `at`.
pub struct StopAt {
    pub at: u64,
}

impl Block for StopAt {
    fn info(&self) -> BlockInfo {
        BlockInfo::new("stop_at", ProcessingPolicy::Always)
    }

    fn process(&mut self, ctx: &mut dyn BlockContext) -> Result<()> {
        if ctx.system().loop_number() >= self.at {
            ctx.request_shutdown();
        }
        Ok(())
    }
}
