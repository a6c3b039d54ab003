//! Arrangement assembly.
//!
//! - [`ArrangementBuilder`] - accumulates blocks and connections
//! - [`Arrangement`] - the frozen, validated result

mod builder;

pub use builder::{Arrangement, ArrangementBuilder};
