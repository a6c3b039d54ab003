//! Clock provider for time abstraction.
//!
//! Allows tests to use a mock clock with controllable time, while production
//! code uses the real monotonic clock.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Provider trait for time operations.
pub trait ClockProvider: Send + Sync {
    /// Monotonic time in nanoseconds since the clock was created.
    fn now(&self) -> u64;

    /// Block the calling thread for `duration`.
    ///
    /// Mock implementations advance their time instead of sleeping.
    fn sleep(&self, duration: Duration);

    /// Advance time by the specified duration (mock-only operation).
    ///
    /// Real implementations should do nothing.
    fn advance(&self, duration: Duration);

    /// Check if this is a mock clock.
    fn is_mock(&self) -> bool;
}

/// Real clock backed by [`Instant`].
#[derive(Debug, Clone)]
pub struct RealClock {
    start: Instant,
}

impl RealClock {
    /// Create a new real clock.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for RealClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockProvider for RealClock {
    fn now(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn advance(&self, _duration: Duration) {
        // Real clock cannot be manually advanced
    }

    fn is_mock(&self) -> bool {
        false
    }
}

/// Mock clock for testing with controllable time.
///
/// Time starts at zero and only moves through [`ClockProvider::advance`],
/// [`ClockProvider::sleep`], or a per-read auto-advance step that simulates
/// work done between reads.
pub struct MockClock {
    /// Current time in nanoseconds since start.
    current_nanos: AtomicU64,
    /// Amount added after every `now()` read.
    auto_advance_nanos: AtomicU64,
    /// Every sleep requested so far.
    sleeps: Mutex<Vec<Duration>>,
}

impl MockClock {
    /// Create a mock clock starting at time zero.
    pub fn new() -> Self {
        Self {
            current_nanos: AtomicU64::new(0),
            auto_advance_nanos: AtomicU64::new(0),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    /// Advance time by `step` after every `now()` read.
    pub fn with_auto_advance(self, step: Duration) -> Self {
        self.auto_advance_nanos
            .store(step.as_nanos() as u64, Ordering::SeqCst);
        self
    }

    /// Current mock time as a duration since start.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.current_nanos.load(Ordering::SeqCst))
    }

    /// Sleeps requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockProvider for MockClock {
    fn now(&self) -> u64 {
        let step = self.auto_advance_nanos.load(Ordering::SeqCst);
        self.current_nanos.fetch_add(step, Ordering::SeqCst)
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().push(duration);
        self.advance(duration);
    }

    fn advance(&self, duration: Duration) {
        self.current_nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::SeqCst);
    }

    fn is_mock(&self) -> bool {
        true
    }
}
