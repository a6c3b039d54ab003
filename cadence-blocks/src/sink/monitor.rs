//! Observing values from outside the control loop.

use cadence_core::prelude::*;
use parking_lot::Mutex;
use std::any::Any;
use std::sync::Arc;

struct Observed<T> {
    latest: Option<T>,
    updates: u64,
}

/// Read side of a [`Monitor`]. Cheap to clone and safe to use from any
/// thread.
pub struct MonitorHandle<T> {
    observed: Arc<Mutex<Observed<T>>>,
}

impl<T> Clone for MonitorHandle<T> {
    fn clone(&self) -> Self {
        Self {
            observed: Arc::clone(&self.observed),
        }
    }
}

impl<T: Clone> MonitorHandle<T> {
    /// The value seen on the most recent tick, if any tick has run.
    pub fn latest(&self) -> Option<T> {
        self.observed.lock().latest.clone()
    }

    /// Number of ticks observed since the system started.
    pub fn updates(&self) -> u64 {
        self.observed.lock().updates
    }
}

/// Records its input every tick so other threads can read it.
///
/// The last value stays readable after the system stops; it is cleared
/// when the system is started again.
pub struct Monitor<T> {
    name: String,
    observed: Arc<Mutex<Observed<T>>>,
}

impl<T> Monitor<T> {
    /// The observed value.
    pub const INPUT: InputSlot<T> = InputSlot::new(0);

    /// Create a monitor; `name` appears in diagnostics.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            observed: Arc::new(Mutex::new(Observed {
                latest: None,
                updates: 0,
            })),
        }
    }

    /// A handle for reading observed values.
    pub fn handle(&self) -> MonitorHandle<T> {
        MonitorHandle {
            observed: Arc::clone(&self.observed),
        }
    }
}

impl<T: Any + Clone + Send> Block for Monitor<T> {
    fn info(&self) -> BlockInfo {
        BlockInfo::new(self.name.clone(), ProcessingPolicy::Always)
            .with_input(PortInfo::of::<T>().named("observed"))
    }

    fn init(&mut self) -> Result<()> {
        let mut observed = self.observed.lock();
        observed.latest = None;
        observed.updates = 0;
        Ok(())
    }

    fn process(&mut self, ctx: &mut dyn BlockContext) -> Result<()> {
        let value = ctx.get(Self::INPUT)?;
        let mut observed = self.observed.lock();
        observed.latest = Some(value);
        observed.updates += 1;
        Ok(())
    }
}
