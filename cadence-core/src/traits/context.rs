//! Execution context handed to blocks during `process`.

use super::ports::{InputSlot, OutputSlot};
use crate::error::{CadenceError, Result};
use crate::system::SystemValues;
use crate::types::BlockId;
use crate::value::{Value, ValueType};
use std::any::Any;

/// Access to a block's inputs, outputs, and the loop state.
///
/// The scheduler creates one context per `process` call, bound to the block
/// being processed. Blocks normally use the typed helpers [`get`],
/// [`try_get`], and [`set`] defined on `dyn BlockContext`.
///
/// [`get`]: trait.BlockContext.html#method.get
/// [`try_get`]: trait.BlockContext.html#method.try_get
/// [`set`]: trait.BlockContext.html#method.set
pub trait BlockContext {
    /// The block being processed.
    fn block_id(&self) -> BlockId;

    /// Raw value of input `index`, `None` if no value is available.
    fn input_value(&self, index: usize) -> Result<Option<&Value>>;

    /// Whether input `index` has a source.
    fn is_connected(&self, index: usize) -> bool;

    /// Store the value of output `index`.
    fn set_value(&mut self, index: usize, value: Value) -> Result<()>;

    /// Loop state for the current tick.
    fn system(&self) -> &SystemValues;

    /// Ask the loop harness to stop after the current tick.
    fn request_shutdown(&mut self);
}

impl<'a> dyn BlockContext + 'a {
    /// Read a required input.
    ///
    /// Fails if the input has no value (unconnected, or an out-first block's
    /// first tick) or holds a different type.
    pub fn get<T: Any + Clone>(&self, slot: InputSlot<T>) -> Result<T> {
        self.try_get(slot)?
            .ok_or_else(|| CadenceError::InputUnavailable {
                block: self.block_id(),
                input: slot.index(),
            })
    }

    /// Read an input that may have no value.
    pub fn try_get<T: Any + Clone>(&self, slot: InputSlot<T>) -> Result<Option<T>> {
        let Some(value) = self.input_value(slot.index())? else {
            return Ok(None);
        };
        match value.downcast_ref::<T>() {
            Some(v) => Ok(Some(v.clone())),
            None => Err(CadenceError::ValueTypeMismatch {
                block: self.block_id(),
                expected: ValueType::of::<T>().name(),
                actual: value.value_type().name(),
            }),
        }
    }

    /// Set an output.
    pub fn set<T: Any + Send + Sync>(&mut self, slot: OutputSlot<T>, value: T) -> Result<()> {
        self.set_value(slot.index(), Value::new(value))
    }
}
