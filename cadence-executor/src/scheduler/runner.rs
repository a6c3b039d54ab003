//! Runner - demand-driven evaluation of an arrangement.
//!
//! Each tick runs in four steps:
//!
//! 1. every `OutFirst` block is processed against the inputs it captured at
//!    the end of the previous tick (no values on the first tick)
//! 2. every `Always` block is brought up to date, recursively processing
//!    whatever it reads from first
//! 3. every `OutFirst` block captures its inputs for the next tick,
//!    processing their sources on demand
//! 4. the tick counter advances
//!
//! A `Lazy` block is processed at most once per tick, and only when a
//! consumer reads one of its outputs.

use super::context::RunnerContext;
use super::graph::ExecutionPlan;
use crate::arrangement::Arrangement;
use cadence_core::error::{CadenceError, Result};
use cadence_core::system::SystemValues;
use cadence_core::traits::{Block, BlockInfo, OutputRef, ProcessingPolicy};
use cadence_core::types::BlockId;
use cadence_core::value::Value;
use std::time::Duration;

/// Lifecycle phase of a [`Runner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerPhase {
    /// Built but not initialized.
    Ready,
    /// Initialized; ticks may be processed.
    Running,
    /// A tick failed; only `stop` is accepted.
    Failed,
    /// Stopped; `init` may start it again.
    Stopped,
}

/// Per-tick storage of one block.
#[derive(Debug)]
struct BlockState {
    /// Input values for the next `process` call.
    inputs: Vec<Option<Value>>,
    /// Output values of the latest `process` call.
    outputs: Vec<Option<Value>>,
    /// Tick of the latest `process` call.
    last_processed: Option<u64>,
}

impl BlockState {
    fn new(info: &BlockInfo) -> Self {
        Self {
            inputs: vec![None; info.inputs.len()],
            outputs: vec![None; info.outputs.len()],
            last_processed: None,
        }
    }

    fn reset(&mut self) {
        self.inputs.iter_mut().for_each(|v| *v = None);
        self.outputs.iter_mut().for_each(|v| *v = None);
        self.last_processed = None;
    }
}

/// Executes an [`Arrangement`] one tick at a time.
pub struct Runner {
    ids: Vec<BlockId>,
    infos: Vec<BlockInfo>,
    sources: Vec<Vec<Option<OutputRef>>>,
    blocks: Vec<Box<dyn Block>>,
    plan: ExecutionPlan,
    states: Vec<BlockState>,
    /// Blocks whose `process` call is on the current stack.
    in_progress: Vec<bool>,
    tick: u64,
    system: SystemValues,
    shutdown: bool,
    phase: RunnerPhase,
}

impl Runner {
    /// Take ownership of a built arrangement.
    pub fn new(arrangement: Arrangement) -> Self {
        let Arrangement {
            connections,
            blocks,
            plan,
        } = arrangement;

        let mut ids = Vec::with_capacity(connections.len());
        let mut infos = Vec::with_capacity(connections.len());
        let mut sources = Vec::with_capacity(connections.len());
        for (id, info, record) in connections.entries() {
            ids.push(id);
            infos.push(info.clone());
            sources.push(record.sources().to_vec());
        }
        let states = infos.iter().map(BlockState::new).collect();

        Self {
            in_progress: vec![false; ids.len()],
            ids,
            infos,
            sources,
            blocks,
            plan,
            states,
            tick: 0,
            system: SystemValues::new(),
            shutdown: false,
            phase: RunnerPhase::Ready,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> RunnerPhase {
        self.phase
    }

    /// Number of completed ticks since `init`.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Loop state as of the latest tick.
    pub fn system_values(&self) -> &SystemValues {
        &self.system
    }

    /// Whether a block asked the loop to stop.
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown
    }

    /// The execution plan.
    pub fn plan(&self) -> &ExecutionPlan {
        &self.plan
    }

    /// Latest value of an output, if its block has produced one.
    pub fn output(&self, output: OutputRef) -> Option<&Value> {
        self.states
            .get(output.block.index())?
            .outputs
            .get(output.index)?
            .as_ref()
    }

    /// Tick on which a block was last processed.
    pub fn last_processed(&self, block: BlockId) -> Option<u64> {
        self.states.get(block.index())?.last_processed
    }

    /// Reset all state and initialize every active block.
    pub fn init(&mut self) -> Result<()> {
        if self.phase == RunnerPhase::Running {
            return Err(CadenceError::NotRunning {
                cause: "init called on a running block system".to_string(),
            });
        }

        self.tick = 0;
        self.shutdown = false;
        self.system.reset();
        self.states.iter_mut().for_each(BlockState::reset);
        self.in_progress.iter_mut().for_each(|f| *f = false);

        for (i, block) in self.blocks.iter_mut().enumerate() {
            if self.plan.is_active(self.ids[i]) {
                if let Err(e) = block.init() {
                    self.phase = RunnerPhase::Failed;
                    tracing::error!(block = %self.ids[i], error = %e, "Block init failed");
                    return Err(e);
                }
            }
        }

        self.phase = RunnerPhase::Running;
        tracing::info!(
            blocks = self.blocks.len(),
            active = self.plan.active_count(),
            "Block system initialized"
        );
        Ok(())
    }

    /// Process one tick.
    ///
    /// Any error is fatal: the tick is abandoned and the runner moves to
    /// [`RunnerPhase::Failed`].
    pub fn process_once(&mut self, loop_time: Duration) -> Result<()> {
        if self.phase != RunnerPhase::Running {
            return Err(CadenceError::NotRunning {
                cause: format!("process_once called in phase {:?}", self.phase),
            });
        }

        match self.run_tick(loop_time) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.phase = RunnerPhase::Failed;
                self.in_progress.iter_mut().for_each(|f| *f = false);
                tracing::error!(tick = self.tick, code = e.code(), error = %e, "Tick failed");
                Err(e)
            }
        }
    }

    /// Stop every active block.
    pub fn stop(&mut self) {
        if matches!(self.phase, RunnerPhase::Ready | RunnerPhase::Stopped) {
            return;
        }
        for (i, block) in self.blocks.iter_mut().enumerate() {
            if self.plan.is_active(self.ids[i]) {
                block.stop();
            }
        }
        self.phase = RunnerPhase::Stopped;
        tracing::info!(ticks = self.tick, "Block system stopped");
    }

    fn run_tick(&mut self, loop_time: Duration) -> Result<()> {
        self.system.begin_loop(self.tick, loop_time);

        for k in 0..self.plan.out_first().len() {
            let i = self.plan.out_first()[k].index();
            self.run_block(i)?;
            self.states[i].last_processed = Some(self.tick);
        }

        for k in 0..self.plan.always().len() {
            let i = self.plan.always()[k].index();
            self.ensure_processed(i)?;
        }

        for k in 0..self.plan.out_first().len() {
            let i = self.plan.out_first()[k].index();
            self.gather_inputs(i)?;
        }

        tracing::trace!(tick = self.tick, "Tick complete");
        self.tick += 1;
        Ok(())
    }

    /// Make sure block `i` has been processed on the current tick.
    fn ensure_processed(&mut self, i: usize) -> Result<()> {
        // out-first outputs were produced at the start of the tick
        if self.infos[i].policy == ProcessingPolicy::OutFirst {
            return Ok(());
        }
        if self.states[i].last_processed == Some(self.tick) {
            return Ok(());
        }
        if self.in_progress[i] {
            return Err(CadenceError::ReentrantProcessing {
                block: self.ids[i],
                tick: self.tick,
            });
        }

        self.in_progress[i] = true;
        let result = self.gather_inputs(i).and_then(|()| self.run_block(i));
        self.in_progress[i] = false;
        result?;

        self.states[i].last_processed = Some(self.tick);
        Ok(())
    }

    /// Read the current value of every source of block `i` into its inputs.
    ///
    /// The new inputs replace the old ones all at once.
    fn gather_inputs(&mut self, i: usize) -> Result<()> {
        let mut fresh = Vec::with_capacity(self.sources[i].len());
        for k in 0..self.sources[i].len() {
            let value = match self.sources[i][k] {
                Some(source) => {
                    let j = source.block.index();
                    self.ensure_processed(j)?;
                    self.states[j].outputs[source.index].clone()
                }
                None => None,
            };
            fresh.push(value);
        }
        self.states[i].inputs = fresh;
        Ok(())
    }

    /// Call `process` on block `i` and verify every output was set.
    fn run_block(&mut self, i: usize) -> Result<()> {
        let id = self.ids[i];
        let state = &mut self.states[i];
        state.outputs.iter_mut().for_each(|v| *v = None);

        let mut ctx = RunnerContext {
            block: id,
            info: &self.infos[i],
            sources: &self.sources[i],
            inputs: &state.inputs,
            outputs: &mut state.outputs,
            system: &self.system,
            shutdown: &mut self.shutdown,
        };
        self.blocks[i].process(&mut ctx)?;

        if let Some(output) = state.outputs.iter().position(Option::is_none) {
            return Err(CadenceError::OutputNotSet {
                block: id,
                block_name: self.infos[i].name.clone(),
                output,
                tick: self.tick,
            });
        }

        tracing::trace!(block = %id, tick = self.tick, "Block processed");
        Ok(())
    }
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("blocks", &self.blocks.len())
            .field("tick", &self.tick)
            .field("phase", &self.phase)
            .finish()
    }
}
