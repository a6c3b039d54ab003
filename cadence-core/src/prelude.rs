//! Prelude for convenient imports.
//!
//! ```ignore
//! use cadence_core::prelude::*;
//! ```

// Core types
pub use crate::types::{ArrangementId, BlockId};
pub use crate::value::{Value, ValueType};

// Error handling
pub use crate::error::{CadenceError, Result, ResultExt};

// Blocks
pub use crate::connections::Connections;
pub use crate::system::SystemValues;
pub use crate::traits::{
    Block, BlockContext, BlockHandle, BlockInfo, Input, InputRef, InputSlot, Output, OutputRef,
    OutputSlot, PortDirection, PortInfo, ProcessingPolicy,
};

// Primitives
pub use crate::interval::Interval;
pub use crate::stepper::{KnotCursor, Stepper};
