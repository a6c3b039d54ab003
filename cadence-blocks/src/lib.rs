//! Standard blocks for cadence block systems.
//!
//! ## Sources (`source::*`)
//! - [`source::Constant`] - a fixed value, computed on demand
//! - [`source::SystemValuesBlock`] - loop number and timing
//! - [`source::QueueSource`] - values pushed from other threads through a
//!   [`source::QueueHandle`]
//!
//! ## Flow (`flow::*`)
//! - [`flow::Delay`] - previous tick's input; the way to close a feedback loop
//! - [`flow::MapBlock`] - function of one input
//! - [`flow::CombineBlock`] - function of two inputs
//!
//! ## Sinks (`sink::*`)
//! - [`sink::Monitor`] - publishes its input through a [`sink::MonitorHandle`]
//! - [`sink::Shutdown`] - stops the loop when its input is true
//!
//! ## Motion (`motion::*`)
//! - [`motion::TrajectoryFollower`] - plays back trajectories in loop time

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod flow;
pub mod motion;
pub mod sink;
pub mod source;

pub use flow::{CombineBlock, Delay, MapBlock};
pub use motion::TrajectoryFollower;
pub use sink::{Monitor, MonitorHandle, Shutdown};
pub use source::{Constant, QueueHandle, QueueSource, SystemValuesBlock};

/// Prelude for commonly used types.
pub mod prelude {
    pub use crate::flow::{CombineBlock, Delay, MapBlock};
    pub use crate::motion::TrajectoryFollower;
    pub use crate::sink::{Monitor, MonitorHandle, Shutdown};
    pub use crate::source::{Constant, QueueHandle, QueueSource, SystemValuesBlock};
}
