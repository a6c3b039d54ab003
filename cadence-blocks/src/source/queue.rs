//! Values pushed into a running system from other threads.
//!
//! A [`QueueSource`] is the only way to feed a block system from outside
//! the control loop. Producers hold a [`QueueHandle`] and push without
//! ever blocking on the loop; the source drains everything pushed so far
//! once per tick.

use cadence_core::prelude::*;
use parking_lot::Mutex;
use std::any::Any;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace};

/// State shared between the block and its handles.
struct QueueState<T> {
    items: Mutex<VecDeque<T>>,
    /// Set on push, cleared on drain; lets an idle tick skip the lock.
    pending: AtomicBool,
    /// Set when the system stops; pushes are refused until the next init.
    closed: AtomicBool,
}

/// Thread-safe producer side of a [`QueueSource`].
pub struct QueueHandle<T> {
    state: Arc<QueueState<T>>,
}

impl<T> Clone for QueueHandle<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> QueueHandle<T> {
    /// Queue a value for the next tick.
    ///
    /// Returns `false` and drops the value if the system has stopped.
    pub fn push(&self, item: T) -> bool {
        if self.is_closed() {
            return false;
        }
        self.state.items.lock().push_back(item);
        self.state.pending.store(true, Ordering::Release);
        true
    }

    /// Number of values waiting for the next tick.
    pub fn len(&self) -> usize {
        self.state.items.lock().len()
    }

    /// Whether no values are waiting.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the consuming system has stopped.
    pub fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::Acquire)
    }
}

/// Drains a queue filled from other threads.
///
/// Every tick it outputs the values received since the previous tick, in
/// push order, and the most recent value ever received.
pub struct QueueSource<T> {
    state: Arc<QueueState<T>>,
    latest: Option<T>,
}

impl<T> QueueSource<T> {
    /// Values received since the previous tick.
    pub const ITEMS: OutputSlot<Vec<T>> = OutputSlot::new(0);
    /// The most recent value received, if any.
    pub const LATEST: OutputSlot<Option<T>> = OutputSlot::new(1);

    /// Create an empty queue source.
    pub fn new() -> Self {
        Self {
            state: Arc::new(QueueState {
                items: Mutex::new(VecDeque::new()),
                pending: AtomicBool::new(false),
                closed: AtomicBool::new(false),
            }),
            latest: None,
        }
    }

    /// A handle for pushing values into this source.
    pub fn handle(&self) -> QueueHandle<T> {
        QueueHandle {
            state: Arc::clone(&self.state),
        }
    }

    fn drain(&mut self) -> Vec<T> {
        if !self.state.pending.swap(false, Ordering::AcqRel) {
            return Vec::new();
        }
        self.state.items.lock().drain(..).collect()
    }
}

impl<T> Default for QueueSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Any + Clone + Send + Sync> Block for QueueSource<T> {
    fn info(&self) -> BlockInfo {
        BlockInfo::new("queue_source", ProcessingPolicy::Always)
            .with_output(PortInfo::of::<Vec<T>>().named("items"))
            .with_output(PortInfo::of::<Option<T>>().named("latest"))
    }

    fn init(&mut self) -> Result<()> {
        self.state.items.lock().clear();
        self.state.pending.store(false, Ordering::Release);
        self.state.closed.store(false, Ordering::Release);
        self.latest = None;
        Ok(())
    }

    fn process(&mut self, ctx: &mut dyn BlockContext) -> Result<()> {
        let items = self.drain();
        if let Some(last) = items.last() {
            trace!(block = %ctx.block_id(), count = items.len(), "Drained queue");
            self.latest = Some(last.clone());
        }
        ctx.set(Self::ITEMS, items)?;
        ctx.set(Self::LATEST, self.latest.clone())
    }

    fn stop(&mut self) {
        self.state.closed.store(true, Ordering::Release);
        let dropped = {
            let mut items = self.state.items.lock();
            let count = items.len();
            items.clear();
            count
        };
        self.state.pending.store(false, Ordering::Release);
        if dropped > 0 {
            debug!(dropped, "Queue source stopped with undelivered values");
        }
        self.latest = None;
    }
}
