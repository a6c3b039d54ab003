//! The BlockContext handed to a block while the runner processes it.

use cadence_core::error::{CadenceError, Result};
use cadence_core::system::SystemValues;
use cadence_core::traits::{BlockContext, BlockInfo, OutputRef, PortDirection};
use cadence_core::types::BlockId;
use cadence_core::value::Value;

/// Borrowed view of one block's ports for the duration of `process`.
pub(crate) struct RunnerContext<'a> {
    pub(crate) block: BlockId,
    pub(crate) info: &'a BlockInfo,
    pub(crate) sources: &'a [Option<OutputRef>],
    pub(crate) inputs: &'a [Option<Value>],
    pub(crate) outputs: &'a mut [Option<Value>],
    pub(crate) system: &'a SystemValues,
    pub(crate) shutdown: &'a mut bool,
}

impl RunnerContext<'_> {
    fn invalid_port(&self, direction: PortDirection, index: usize, count: usize) -> CadenceError {
        CadenceError::InvalidPort {
            block: self.block,
            direction: direction.as_str(),
            index,
            cause: format!(
                "block '{}' declares {} {}s",
                self.info.name,
                count,
                direction.as_str()
            ),
        }
    }
}

impl BlockContext for RunnerContext<'_> {
    fn block_id(&self) -> BlockId {
        self.block
    }

    fn input_value(&self, index: usize) -> Result<Option<&Value>> {
        match self.inputs.get(index) {
            Some(value) => Ok(value.as_ref()),
            None => Err(self.invalid_port(PortDirection::Input, index, self.inputs.len())),
        }
    }

    fn is_connected(&self, index: usize) -> bool {
        matches!(self.sources.get(index), Some(Some(_)))
    }

    fn set_value(&mut self, index: usize, value: Value) -> Result<()> {
        let Some(port) = self.info.output(index) else {
            return Err(self.invalid_port(PortDirection::Output, index, self.outputs.len()));
        };
        if port.value_type != value.value_type() {
            return Err(CadenceError::ValueTypeMismatch {
                block: self.block,
                expected: port.value_type.name(),
                actual: value.value_type().name(),
            });
        }

        let slot = &mut self.outputs[index];
        if slot.is_some() {
            return Err(CadenceError::OutputAlreadySet {
                block: self.block,
                output: index,
            });
        }
        *slot = Some(value);
        Ok(())
    }

    fn system(&self) -> &SystemValues {
        self.system
    }

    fn request_shutdown(&mut self) {
        *self.shutdown = true;
    }
}
