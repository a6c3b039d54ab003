//! Blocks that introduce values into a system.
//!
//! - [`Constant`] - a fixed value
//! - [`SystemValuesBlock`] - the loop number and timing
//! - [`QueueSource`] - values pushed from other threads

mod constant;
mod queue;
mod system_values;

pub use constant::Constant;
pub use queue::{QueueHandle, QueueSource};
pub use system_values::SystemValuesBlock;
