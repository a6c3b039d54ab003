//! Core traits for cadence.
//!
//! This module defines the main abstractions:
//! - [`Block`] - A computation node with typed slots and a processing policy
//! - [`BlockContext`] - Per-call access to inputs, outputs, and loop state
//! - Slots and endpoints used to wire blocks together

mod block;
mod context;
mod ports;

pub use block::{Block, BlockInfo, PortDirection, PortInfo, ProcessingPolicy};
pub use context::BlockContext;
pub use ports::{BlockHandle, Input, InputRef, InputSlot, Output, OutputRef, OutputSlot};
