//! LoopDriver - runs a LoopSystem at a regulated period.

use super::blocks_system::LoopSystem;
use super::config::LoopConfig;
use cadence_core::error::Result;
use cadence_core::testing::{ClockProvider, RealClock};
use std::sync::Arc;
use std::time::Duration;

/// Enforces a minimum period between loop starts.
pub struct LoopRegulator {
    period: Duration,
    clock: Arc<dyn ClockProvider>,
    /// Clock reading at the start of the current loop.
    loop_start: Option<u64>,
}

impl LoopRegulator {
    /// Create a regulator. A zero period never sleeps.
    pub fn new(period: Duration, clock: Arc<dyn ClockProvider>) -> Self {
        Self {
            period,
            clock,
            loop_start: None,
        }
    }

    /// Mark the start of a loop and return the time since the previous
    /// start (zero for the first loop).
    pub fn begin_loop(&mut self) -> Duration {
        let now = self.clock.now();
        let loop_time = self
            .loop_start
            .map(|start| Duration::from_nanos(now.saturating_sub(start)))
            .unwrap_or(Duration::ZERO);
        self.loop_start = Some(now);
        loop_time
    }

    /// Sleep for whatever remains of the period since `begin_loop`.
    pub fn end_loop(&self) {
        let Some(start) = self.loop_start else {
            return;
        };
        let spent = Duration::from_nanos(self.clock.now().saturating_sub(start));
        if let Some(remaining) = self.period.checked_sub(spent) {
            if !remaining.is_zero() {
                self.clock.sleep(remaining);
            }
        }
    }
}

/// Why a [`LoopDriver`] stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The system asked to stop.
    Requested,
    /// `max_loops` was reached.
    MaxLoops,
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopReport {
    /// Number of completed loops.
    pub loops: u64,
    /// Why the run ended.
    pub reason: StopReason,
}

/// Drives a [`LoopSystem`] until it requests a stop or `max_loops` is hit.
pub struct LoopDriver {
    config: LoopConfig,
    clock: Arc<dyn ClockProvider>,
}

impl LoopDriver {
    /// Create a driver on the real clock.
    pub fn new(config: LoopConfig) -> Self {
        Self::with_clock(config, Arc::new(RealClock::new()))
    }

    /// Create a driver on a specific clock.
    pub fn with_clock(config: LoopConfig, clock: Arc<dyn ClockProvider>) -> Self {
        Self { config, clock }
    }

    /// The configuration.
    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Run the system to completion.
    ///
    /// `stop` is called on the system however the run ends. A failing
    /// `init` or tick is returned after stopping.
    pub fn run(&self, system: &mut dyn LoopSystem) -> Result<LoopReport> {
        system.init()?;
        tracing::info!(
            period_ms = self.config.target_period_ms,
            max_loops = ?self.config.max_loops,
            "Loop started"
        );

        let result = self.run_loops(system);
        system.stop();

        match &result {
            Ok(report) => {
                tracing::info!(loops = report.loops, reason = ?report.reason, "Loop finished")
            }
            Err(e) => tracing::error!(error = %e, "Loop aborted"),
        }
        result
    }

    fn run_loops(&self, system: &mut dyn LoopSystem) -> Result<LoopReport> {
        let mut regulator =
            LoopRegulator::new(self.config.target_period(), Arc::clone(&self.clock));
        let mut loops = 0;

        loop {
            if self.config.max_loops.is_some_and(|max| loops >= max) {
                return Ok(LoopReport {
                    loops,
                    reason: StopReason::MaxLoops,
                });
            }

            let loop_time = regulator.begin_loop();
            let stop = system.tick(loop_time)?;
            loops += 1;
            if stop {
                return Ok(LoopReport {
                    loops,
                    reason: StopReason::Requested,
                });
            }
            regulator.end_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::error::CadenceError;
    use cadence_core::testing::MockClock;

    #[derive(Default)]
    struct Counter {
        inits: u32,
        ticks: u32,
        stops: u32,
        stop_after: Option<u32>,
        fail_on: Option<u32>,
        loop_times: Vec<Duration>,
    }

    impl LoopSystem for Counter {
        fn init(&mut self) -> Result<()> {
            self.inits += 1;
            Ok(())
        }

        fn tick(&mut self, loop_time: Duration) -> Result<bool> {
            self.ticks += 1;
            self.loop_times.push(loop_time);
            if self.fail_on == Some(self.ticks) {
                return Err(CadenceError::NotRunning {
                    cause: "tick failed".to_string(),
                });
            }
            Ok(self.stop_after == Some(self.ticks))
        }

        fn stop(&mut self) {
            self.stops += 1;
        }
    }

    fn driver(period_ms: u64, max_loops: Option<u64>, clock: Arc<MockClock>) -> LoopDriver {
        LoopDriver::with_clock(
            LoopConfig {
                target_period_ms: period_ms,
                max_loops,
            },
            clock,
        )
    }

    #[test]
    fn stops_at_max_loops() {
        let clock = Arc::new(MockClock::new());
        let mut system = Counter::default();
        let report = driver(10, Some(5), clock).run(&mut system).unwrap();

        assert_eq!(report, LoopReport { loops: 5, reason: StopReason::MaxLoops });
        assert_eq!(system.inits, 1);
        assert_eq!(system.ticks, 5);
        assert_eq!(system.stops, 1);
    }

    #[test]
    fn stops_when_requested() {
        let clock = Arc::new(MockClock::new());
        let mut system = Counter {
            stop_after: Some(3),
            ..Default::default()
        };
        let report = driver(10, None, clock).run(&mut system).unwrap();
        assert_eq!(report.reason, StopReason::Requested);
        assert_eq!(report.loops, 3);
    }

    #[test]
    fn failed_tick_still_stops_system() {
        let clock = Arc::new(MockClock::new());
        let mut system = Counter {
            fail_on: Some(2),
            ..Default::default()
        };
        let err = driver(10, Some(10), clock).run(&mut system).unwrap_err();
        assert_eq!(err.code(), "E206");
        assert_eq!(system.ticks, 2);
        assert_eq!(system.stops, 1);
    }

    #[test]
    fn regulator_sleeps_out_the_period() {
        let clock = Arc::new(MockClock::new());
        let mut system = Counter::default();
        driver(10, Some(3), Arc::clone(&clock)).run(&mut system).unwrap();

        // ticks take no mock time, so each loop sleeps the full period
        assert_eq!(clock.sleeps(), vec![Duration::from_millis(10); 3]);
        assert_eq!(
            system.loop_times,
            vec![Duration::ZERO, Duration::from_millis(10), Duration::from_millis(10)]
        );
    }

    #[test]
    fn slow_loops_do_not_sleep() {
        let clock = Arc::new(MockClock::new().with_auto_advance(Duration::from_millis(20)));
        let mut regulator = LoopRegulator::new(Duration::from_millis(10), clock.clone());
        regulator.begin_loop();
        regulator.end_loop();
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn zero_period_is_unregulated() {
        let clock = Arc::new(MockClock::new());
        let mut system = Counter::default();
        driver(0, Some(4), Arc::clone(&clock)).run(&mut system).unwrap();
        assert!(clock.sleeps().is_empty());
    }
}
