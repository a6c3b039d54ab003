//! Blocks that consume values.
//!
//! - [`Monitor`] - publishes its input to other threads
//! - [`Shutdown`] - stops the loop when its input turns true

mod monitor;
mod shutdown;

pub use monitor::{Monitor, MonitorHandle};
pub use shutdown::Shutdown;
