//! Blocks that transform or delay values.
//!
//! - [`Delay`] - the previous tick's input; breaks feedback loops
//! - [`MapBlock`] - a function of one input
//! - [`CombineBlock`] - a function of two inputs

mod delay;
mod map;

pub use delay::Delay;
pub use map::{CombineBlock, MapBlock};
