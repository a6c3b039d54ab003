//! Static wiring between blocks.

use crate::error::{CadenceError, Result};
use crate::traits::{BlockInfo, InputRef, OutputRef, PortDirection};
use crate::types::{ArrangementId, BlockId};

/// Connection record for one block.
#[derive(Debug, Clone)]
pub struct BlockConnections {
    sources: Vec<Option<OutputRef>>,
    output_used: Vec<bool>,
}

impl BlockConnections {
    fn new(info: &BlockInfo) -> Self {
        Self {
            sources: vec![None; info.inputs.len()],
            output_used: vec![false; info.outputs.len()],
        }
    }

    /// Source of each input, by index.
    #[must_use]
    pub fn sources(&self) -> &[Option<OutputRef>] {
        &self.sources
    }

    /// Whether each output is read by some input, by index.
    #[must_use]
    pub fn outputs_used(&self) -> &[bool] {
        &self.output_used
    }
}

/// The wiring of every block in one arrangement.
///
/// Holds each block's declared [`BlockInfo`] and its connection record.
/// Mutated only while an arrangement is being built; afterwards it is
/// exposed read-only to blocks (through `check_config`) and the scheduler.
#[derive(Debug, Clone)]
pub struct Connections {
    arrangement: ArrangementId,
    infos: Vec<BlockInfo>,
    records: Vec<BlockConnections>,
}

impl Connections {
    /// Create empty wiring for an arrangement.
    #[must_use]
    pub fn new(arrangement: ArrangementId) -> Self {
        Self {
            arrangement,
            infos: Vec::new(),
            records: Vec::new(),
        }
    }

    /// The arrangement these connections belong to.
    #[must_use]
    pub fn arrangement(&self) -> ArrangementId {
        self.arrangement
    }

    /// Number of blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Whether there are no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Ids of all blocks, in insertion order.
    pub fn block_ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        (0..self.infos.len()).map(|i| BlockId::new(self.arrangement, i as u32))
    }

    /// Every block with its declared info and connection record, in
    /// insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (BlockId, &BlockInfo, &BlockConnections)> + '_ {
        self.block_ids()
            .zip(self.infos.iter().zip(&self.records))
            .map(|(id, (info, record))| (id, info, record))
    }

    /// Register a block and return its id.
    pub fn add_block(&mut self, info: BlockInfo) -> BlockId {
        let id = BlockId::new(self.arrangement, self.infos.len() as u32);
        self.records.push(BlockConnections::new(&info));
        self.infos.push(info);
        id
    }

    /// Check that `block` belongs to this arrangement.
    pub fn check_owned(&self, block: BlockId) -> Result<()> {
        if block.arrangement() != self.arrangement {
            return Err(CadenceError::ForeignBlock {
                block,
                owner: block.arrangement(),
                expected: self.arrangement,
            });
        }
        if block.index() >= self.infos.len() {
            return Err(CadenceError::BlockNotFound { block });
        }
        Ok(())
    }

    /// Declared info of a block.
    pub fn info(&self, block: BlockId) -> Result<&BlockInfo> {
        self.check_owned(block)?;
        Ok(&self.infos[block.index()])
    }

    /// Connection record of a block.
    pub fn record(&self, block: BlockId) -> Result<&BlockConnections> {
        self.check_owned(block)?;
        Ok(&self.records[block.index()])
    }

    /// Source of each input of `block`.
    pub fn sources(&self, block: BlockId) -> Result<&[Option<OutputRef>]> {
        Ok(self.record(block)?.sources())
    }

    /// The output feeding `input`, if any.
    pub fn source_of(&self, input: InputRef) -> Result<Option<OutputRef>> {
        self.check_port(input.block, PortDirection::Input, input.index)?;
        Ok(self.records[input.block.index()].sources[input.index])
    }

    /// Whether some input reads `output`.
    pub fn is_output_used(&self, output: OutputRef) -> Result<bool> {
        self.check_port(output.block, PortDirection::Output, output.index)?;
        Ok(self.records[output.block.index()].output_used[output.index])
    }

    /// Connect `output` into `input`.
    ///
    /// Both blocks must belong to this arrangement, both ports must exist
    /// and carry the same type, and `input` must not already have a source.
    pub fn connect(&mut self, output: OutputRef, input: InputRef) -> Result<()> {
        self.check_port(output.block, PortDirection::Output, output.index)?;
        self.check_port(input.block, PortDirection::Input, input.index)?;

        let out_type = self.infos[output.block.index()].outputs[output.index].value_type;
        let in_type = self.infos[input.block.index()].inputs[input.index].value_type;
        if out_type != in_type {
            return Err(CadenceError::InvalidPort {
                block: input.block,
                direction: PortDirection::Input.as_str(),
                index: input.index,
                cause: format!(
                    "expects {} but {} produces {}",
                    in_type, output, out_type
                ),
            });
        }

        let slot = &mut self.records[input.block.index()].sources[input.index];
        if let Some(existing) = slot {
            return Err(CadenceError::InputAlreadyConnected {
                block: input.block,
                input: input.index,
                existing: existing.to_string(),
            });
        }
        *slot = Some(output);
        self.records[output.block.index()].output_used[output.index] = true;
        Ok(())
    }

    /// Check that a block owns a port with the given direction and index.
    pub fn check_port(&self, block: BlockId, direction: PortDirection, index: usize) -> Result<()> {
        let info = self.info(block)?;
        let count = match direction {
            PortDirection::Input => info.inputs.len(),
            PortDirection::Output => info.outputs.len(),
        };
        if index >= count {
            return Err(CadenceError::InvalidPort {
                block,
                direction: direction.as_str(),
                index,
                cause: format!("block '{}' declares {} {}s", info.name, count, direction.as_str()),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{PortInfo, ProcessingPolicy};

    fn source_info() -> BlockInfo {
        BlockInfo::new("source", ProcessingPolicy::Lazy).with_output(PortInfo::of::<f64>())
    }

    fn sink_info() -> BlockInfo {
        BlockInfo::new("sink", ProcessingPolicy::Always)
            .with_input(PortInfo::of::<f64>())
            .with_input(PortInfo::of::<bool>().optional())
    }

    #[test]
    fn connect_records_source_and_usage() {
        let mut connections = Connections::new(ArrangementId::new(1));
        let source = connections.add_block(source_info());
        let sink = connections.add_block(sink_info());

        let out = OutputRef { block: source, index: 0 };
        let input = InputRef { block: sink, index: 0 };
        connections.connect(out, input).unwrap();

        assert_eq!(connections.source_of(input).unwrap(), Some(out));
        assert!(connections.is_output_used(out).unwrap());
        assert_eq!(connections.sources(sink).unwrap(), &[Some(out), None]);
    }

    #[test]
    fn entries_follow_insertion_order() {
        let mut connections = Connections::new(ArrangementId::new(3));
        let source = connections.add_block(source_info());
        let sink = connections.add_block(sink_info());
        connections
            .connect(OutputRef { block: source, index: 0 }, InputRef { block: sink, index: 0 })
            .unwrap();

        let entries: Vec<_> = connections.entries().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, source);
        assert_eq!(entries[0].1.name, "source");
        assert_eq!(entries[0].2.outputs_used(), &[true]);
        assert_eq!(entries[1].0, sink);
        assert_eq!(entries[1].1.name, "sink");
        assert_eq!(entries[1].2.sources()[0], Some(OutputRef { block: source, index: 0 }));
    }

    #[test]
    fn second_source_is_rejected() {
        let mut connections = Connections::new(ArrangementId::new(1));
        let a = connections.add_block(source_info());
        let b = connections.add_block(source_info());
        let sink = connections.add_block(sink_info());
        let input = InputRef { block: sink, index: 0 };

        connections.connect(OutputRef { block: a, index: 0 }, input).unwrap();
        let err = connections
            .connect(OutputRef { block: b, index: 0 }, input)
            .unwrap_err();
        assert!(matches!(err, CadenceError::InputAlreadyConnected { .. }));
    }

    #[test]
    fn type_mismatch_is_rejected() {
        let mut connections = Connections::new(ArrangementId::new(1));
        let source = connections.add_block(source_info());
        let sink = connections.add_block(sink_info());

        let err = connections
            .connect(OutputRef { block: source, index: 0 }, InputRef { block: sink, index: 1 })
            .unwrap_err();
        assert!(matches!(err, CadenceError::InvalidPort { .. }));
    }

    #[test]
    fn foreign_and_missing_blocks_are_rejected() {
        let mut connections = Connections::new(ArrangementId::new(1));
        let sink = connections.add_block(sink_info());
        let foreign = BlockId::new(ArrangementId::new(2), 0);

        let err = connections
            .connect(OutputRef { block: foreign, index: 0 }, InputRef { block: sink, index: 0 })
            .unwrap_err();
        assert!(matches!(err, CadenceError::ForeignBlock { .. }));

        let missing = BlockId::new(ArrangementId::new(1), 5);
        assert!(matches!(
            connections.info(missing),
            Err(CadenceError::BlockNotFound { .. })
        ));

        let err = connections
            .check_port(sink, PortDirection::Input, 2)
            .unwrap_err();
        assert_eq!(err.code(), "E105");
    }
}
