//! ArrangementBuilder - collects blocks and wiring into a frozen Arrangement.

use crate::scheduler::ExecutionPlan;
use cadence_core::connections::Connections;
use cadence_core::error::{CadenceError, Result};
use cadence_core::traits::{
    Block, BlockHandle, BlockInfo, Input, InputRef, Output, OutputRef, PortDirection,
};
use cadence_core::types::{ArrangementId, BlockId};
use cadence_core::value::ValueType;
use std::any::Any;

/// Builder that owns blocks while they are being wired together.
///
/// Adding a block moves it into the builder; the returned [`BlockHandle`]
/// is only valid for this builder and the arrangement it produces.
pub struct ArrangementBuilder {
    /// Wiring being built.
    connections: Connections,
    /// Block implementations, indexed like the connection records.
    blocks: Vec<Box<dyn Block>>,
}

impl ArrangementBuilder {
    /// Create a builder with a fresh arrangement id.
    pub fn new() -> Self {
        Self {
            connections: Connections::new(ArrangementId::allocate()),
            blocks: Vec::new(),
        }
    }

    /// The id of the arrangement being built.
    pub fn arrangement_id(&self) -> ArrangementId {
        self.connections.arrangement()
    }

    /// Add a block and return its handle.
    pub fn add<B: Block + 'static>(&mut self, block: B) -> BlockHandle {
        self.add_boxed(Box::new(block))
    }

    /// Add an already boxed block.
    pub fn add_boxed(&mut self, block: Box<dyn Block>) -> BlockHandle {
        let info = block.info();
        let id = self.connections.add_block(info);
        self.blocks.push(block);
        BlockHandle::new(id)
    }

    /// Connect a typed output into a typed input.
    pub fn connect<T: Any>(&mut self, from: Output<T>, into: Input<T>) -> Result<()> {
        self.check_slot_type::<T>(from.block(), PortDirection::Output, from.index())?;
        self.check_slot_type::<T>(into.block(), PortDirection::Input, into.index())?;
        self.connect_ref(from.erase(), into.erase())
    }

    /// Connect an untyped output into an untyped input.
    ///
    /// The declared port types must still match.
    pub fn connect_ref(&mut self, from: OutputRef, into: InputRef) -> Result<()> {
        self.connections.connect(from, into)?;
        tracing::trace!(from = %from, into = %into, "Connected");
        Ok(())
    }

    /// Read-only view of the wiring so far.
    pub fn connections(&self) -> &Connections {
        &self.connections
    }

    /// Freeze the arrangement.
    ///
    /// Verifies that every required input is connected, runs every block's
    /// `check_config`, and analyzes the dependency graph. Any failure
    /// rejects the whole arrangement.
    pub fn build(self) -> Result<Arrangement> {
        self.check_required_inputs()?;

        for (id, block) in self.connections.block_ids().zip(&self.blocks) {
            block.check_config(id, &self.connections)?;
        }

        let plan = ExecutionPlan::analyze(&self.connections)?;

        tracing::debug!(
            arrangement = %self.connections.arrangement(),
            blocks = self.blocks.len(),
            active = plan.active_count(),
            "Arrangement built"
        );

        Ok(Arrangement {
            connections: self.connections,
            blocks: self.blocks,
            plan,
        })
    }

    fn check_required_inputs(&self) -> Result<()> {
        for id in self.connections.block_ids() {
            let info = self.connections.info(id)?;
            let sources = self.connections.sources(id)?;
            for (index, (port, source)) in info.inputs.iter().zip(sources).enumerate() {
                if source.is_none() && !port.optional {
                    return Err(CadenceError::UnconnectedInput {
                        block: id,
                        block_name: info.name.clone(),
                        input: index,
                    });
                }
            }
        }
        Ok(())
    }

    fn check_slot_type<T: Any>(
        &self,
        block: BlockId,
        direction: PortDirection,
        index: usize,
    ) -> Result<()> {
        self.connections.check_port(block, direction, index)?;
        let info = self.connections.info(block)?;
        let declared = info
            .port(direction, index)
            .map(|port| port.value_type)
            .ok_or(CadenceError::BlockNotFound { block })?;
        let requested = ValueType::of::<T>();
        if declared != requested {
            return Err(CadenceError::InvalidPort {
                block,
                direction: direction.as_str(),
                index,
                cause: format!(
                    "slot is typed {} but block '{}' declares {}",
                    requested, info.name, declared
                ),
            });
        }
        Ok(())
    }
}

impl Default for ArrangementBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A frozen, validated graph of connected blocks.
///
/// Produced only by [`ArrangementBuilder::build`]; consumed by the
/// [`Runner`](crate::scheduler::Runner) that executes it.
pub struct Arrangement {
    pub(crate) connections: Connections,
    pub(crate) blocks: Vec<Box<dyn Block>>,
    pub(crate) plan: ExecutionPlan,
}

impl Arrangement {
    /// The arrangement id.
    pub fn id(&self) -> ArrangementId {
        self.connections.arrangement()
    }

    /// The wiring.
    pub fn connections(&self) -> &Connections {
        &self.connections
    }

    /// The execution plan derived from the wiring.
    pub fn plan(&self) -> &ExecutionPlan {
        &self.plan
    }

    /// Number of blocks, including pruned ones.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the arrangement has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Declared info of a block.
    pub fn info(&self, block: BlockId) -> Result<&BlockInfo> {
        self.connections.info(block)
    }
}

impl std::fmt::Debug for Arrangement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arrangement")
            .field("id", &self.id())
            .field("blocks", &self.blocks.len())
            .field("plan", &self.plan)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::traits::{BlockContext, InputSlot, OutputSlot, PortInfo, ProcessingPolicy};

    struct Source;

    impl Source {
        const OUT: OutputSlot<f64> = OutputSlot::new(0);
    }

    impl Block for Source {
        fn info(&self) -> BlockInfo {
            BlockInfo::new("source", ProcessingPolicy::Lazy).with_output(PortInfo::of::<f64>())
        }

        fn process(&mut self, ctx: &mut dyn BlockContext) -> Result<()> {
            ctx.set(Self::OUT, 1.0)
        }
    }

    struct Sink {
        optional: bool,
    }

    impl Sink {
        const IN: InputSlot<f64> = InputSlot::new(0);
    }

    impl Block for Sink {
        fn info(&self) -> BlockInfo {
            let port = PortInfo::of::<f64>();
            let port = if self.optional { port.optional() } else { port };
            BlockInfo::new("sink", ProcessingPolicy::Always).with_input(port)
        }

        fn process(&mut self, ctx: &mut dyn BlockContext) -> Result<()> {
            ctx.try_get(Self::IN).map(|_| ())
        }
    }

    struct Picky;

    impl Block for Picky {
        fn info(&self) -> BlockInfo {
            BlockInfo::new("picky", ProcessingPolicy::Always)
                .with_input(PortInfo::of::<f64>().optional())
        }

        fn process(&mut self, _ctx: &mut dyn BlockContext) -> Result<()> {
            Ok(())
        }

        fn check_config(&self, id: BlockId, connections: &Connections) -> Result<()> {
            let sources = connections.sources(id)?;
            if sources[0].is_none() {
                return Err(CadenceError::BlockConfig {
                    block: id,
                    cause: "picky wants its input".to_string(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn unconnected_required_input_fails_build() {
        let mut builder = ArrangementBuilder::new();
        builder.add(Sink { optional: false });
        let err = builder.build().unwrap_err();
        assert!(matches!(err, CadenceError::UnconnectedInput { input: 0, .. }));
        assert!(err.is_config_error());
    }

    #[test]
    fn unconnected_optional_input_is_fine() {
        let mut builder = ArrangementBuilder::new();
        builder.add(Sink { optional: true });
        let arrangement = builder.build().unwrap();
        assert_eq!(arrangement.len(), 1);
    }

    #[test]
    fn check_config_runs_on_build() {
        let mut builder = ArrangementBuilder::new();
        builder.add(Picky);
        let err = builder.build().unwrap_err();
        assert!(matches!(err, CadenceError::BlockConfig { .. }));
    }

    #[test]
    fn typed_connect_and_duplicate_rejection() {
        let mut builder = ArrangementBuilder::new();
        let a = builder.add(Source);
        let b = builder.add(Source);
        let sink = builder.add(Sink { optional: false });

        builder
            .connect(a.output(Source::OUT), sink.input(Sink::IN))
            .unwrap();
        let err = builder
            .connect(b.output(Source::OUT), sink.input(Sink::IN))
            .unwrap_err();
        assert!(matches!(err, CadenceError::InputAlreadyConnected { .. }));
    }

    #[test]
    fn slot_type_must_match_declaration() {
        const WRONG: OutputSlot<i32> = OutputSlot::new(0);
        const WRONG_IN: InputSlot<i32> = InputSlot::new(0);

        let mut builder = ArrangementBuilder::new();
        let a = builder.add(Source);
        let sink = builder.add(Sink { optional: false });
        let err = builder
            .connect(a.output(WRONG), sink.input(WRONG_IN))
            .unwrap_err();
        assert!(matches!(err, CadenceError::InvalidPort { .. }));
    }

    #[test]
    fn handles_from_another_builder_are_rejected() {
        let mut first = ArrangementBuilder::new();
        let foreign = first.add(Source);

        let mut second = ArrangementBuilder::new();
        let sink = second.add(Sink { optional: false });
        let err = second
            .connect(foreign.output(Source::OUT), sink.input(Sink::IN))
            .unwrap_err();
        assert!(matches!(err, CadenceError::ForeignBlock { .. }));
    }
}
