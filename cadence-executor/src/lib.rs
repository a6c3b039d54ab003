//! Cadence Executor - arrangement assembly and tick scheduling.
//!
//! This crate turns blocks into a running control loop:
//! - Arrangement builder with typed, checked connections
//! - Dependency analysis with cycle rejection and pruning of unused blocks
//! - Demand-driven runner with lazy, always, and out-first policies
//! - Loop harness with period regulation and a mockable clock
//! - Tracing subscriber setup

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arrangement;
pub mod observability;
pub mod scheduler;
pub mod system;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::arrangement::{Arrangement, ArrangementBuilder};
    pub use crate::observability::{LogFormat, TracingConfig, init_tracing};
    pub use crate::scheduler::{ExecutionPlan, Runner, RunnerPhase};
    pub use crate::system::{
        BlocksSystem, LoopConfig, LoopDriver, LoopRegulator, LoopReport, LoopSystem, StopReason,
    };
}
