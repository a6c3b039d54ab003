//! Dependency analysis and tick execution.
//!
//! - [`ExecutionPlan`] - roots, pruned blocks, and cycle validation
//! - [`Runner`] - demand-driven evaluation of an arrangement, one tick at a time

mod context;
mod graph;
mod runner;

pub use graph::ExecutionPlan;
pub use runner::{Runner, RunnerPhase};
