//! Loop harness.
//!
//! - [`LoopSystem`] - anything that can be initialized, ticked, and stopped
//! - [`BlocksSystem`] - a [`Runner`](crate::scheduler::Runner) as a loop system
//! - [`LoopDriver`] - runs a loop system at a regulated period
//! - [`LoopConfig`] - period and loop bound, loadable from YAML or env

mod blocks_system;
mod config;
mod driver;

pub use blocks_system::{BlocksSystem, LoopSystem};
pub use config::LoopConfig;
pub use driver::{LoopDriver, LoopRegulator, LoopReport, StopReason};
