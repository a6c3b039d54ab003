//! Cadence Core Library
//!
//! This crate provides the foundational types and traits for the cadence
//! block engine and the motion profiling subsystem built next to it.
//!
//! # Key Components
//!
//! - **Blocks**: the [`Block`] trait, slot declarations, and the
//!   [`BlockContext`] a block sees while processing
//! - **Connections**: the static wiring of an arrangement
//! - **Primitives**: closed [`Interval`]s and [`Stepper`] cursors, shared
//!   with the motion crate
//! - **System values**: per-loop state readable by every block
//!
//! Arrangements are assembled and scheduled by `cadence-executor`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod connections;
pub mod error;
pub mod interval;
pub mod prelude;
pub mod stepper;
pub mod system;
pub mod testing;
pub mod traits;
pub mod types;
pub mod value;

// Re-export key types at crate root for convenience
pub use connections::{BlockConnections, Connections};
pub use error::{CadenceError, Result, ResultExt};
pub use interval::Interval;
pub use stepper::{KnotCursor, Stepper};
pub use system::SystemValues;
pub use traits::{
    Block, BlockContext, BlockHandle, BlockInfo, Input, InputRef, InputSlot, Output, OutputRef,
    OutputSlot, PortDirection, PortInfo, ProcessingPolicy,
};
pub use types::{ArrangementId, BlockId};
pub use value::{Value, ValueType};
