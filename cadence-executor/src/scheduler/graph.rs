//! Dependency graph analysis.
//!
//! Blocks depend on the sources of their inputs. Starting from every root
//! (`Always` or `OutFirst` block), a depth-first walk follows those
//! dependencies. Reaching a block that is still on the walk's stack is a
//! cycle. An `OutFirst` block reached as a dependency is not expanded
//! further: its outputs are computed from the previous tick's inputs, so
//! it breaks any cycle that passes through it.

use cadence_core::connections::Connections;
use cadence_core::error::{CadenceError, Result};
use cadence_core::traits::{OutputRef, ProcessingPolicy};
use cadence_core::types::BlockId;

/// Walk state of a block during analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    InProgress,
    Done,
}

/// The outcome of analyzing an arrangement's dependency graph.
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    /// Processing policy per block index.
    policies: Vec<ProcessingPolicy>,
    /// `OutFirst` blocks in insertion order.
    out_first: Vec<BlockId>,
    /// `Always` blocks in insertion order.
    always: Vec<BlockId>,
    /// Whether each block is reachable from some root.
    active: Vec<bool>,
}

impl ExecutionPlan {
    /// Analyze the wiring of an arrangement.
    ///
    /// Fails with [`CadenceError::UnresolvableCycle`] if some dependency
    /// cycle contains no `OutFirst` block. Lazy blocks no root depends on
    /// are marked inactive and logged.
    pub fn analyze(connections: &Connections) -> Result<Self> {
        let ids: Vec<BlockId> = connections.block_ids().collect();
        let mut policies = Vec::with_capacity(ids.len());
        let mut sources = Vec::with_capacity(ids.len());
        for &id in &ids {
            policies.push(connections.info(id)?.policy);
            sources.push(connections.sources(id)?);
        }

        let mut walk = Walk {
            ids: &ids,
            policies: &policies,
            sources: &sources,
            visit: vec![Visit::Unvisited; ids.len()],
            stack: Vec::new(),
            active: vec![false; ids.len()],
        };

        for (index, policy) in policies.iter().enumerate() {
            if policy.is_root() {
                walk.visit(index, true)?;
            }
        }
        let active = walk.active;

        let out_first = select(&ids, &policies, ProcessingPolicy::OutFirst);
        let always = select(&ids, &policies, ProcessingPolicy::Always);

        if !ids.is_empty() && out_first.is_empty() && always.is_empty() {
            tracing::warn!(
                arrangement = %connections.arrangement(),
                "Arrangement has no always or out-first blocks; nothing will be processed"
            );
        }

        for (id, &reached) in ids.iter().zip(&active) {
            if !reached {
                let name = connections.info(*id).map(|info| info.name.as_str()).unwrap_or("?");
                tracing::warn!(
                    block = %id,
                    block_name = %name,
                    "Block is not needed by any always or out-first block and will never be processed"
                );
            }
        }

        Ok(Self {
            policies,
            out_first,
            always,
            active,
        })
    }

    /// `OutFirst` blocks, in insertion order.
    pub fn out_first(&self) -> &[BlockId] {
        &self.out_first
    }

    /// `Always` blocks, in insertion order.
    pub fn always(&self) -> &[BlockId] {
        &self.always
    }

    /// Policy of a block.
    pub fn policy(&self, block: BlockId) -> Option<ProcessingPolicy> {
        self.policies.get(block.index()).copied()
    }

    /// Whether a block can ever be processed.
    pub fn is_active(&self, block: BlockId) -> bool {
        self.active.get(block.index()).copied().unwrap_or(false)
    }

    /// Number of blocks that can be processed.
    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }

    /// Blocks that no root depends on.
    pub fn pruned(&self) -> impl Iterator<Item = usize> + '_ {
        self.active
            .iter()
            .enumerate()
            .filter(|&(_, &a)| !a)
            .map(|(i, _)| i)
    }
}

fn select(
    ids: &[BlockId],
    policies: &[ProcessingPolicy],
    wanted: ProcessingPolicy,
) -> Vec<BlockId> {
    ids.iter()
        .zip(policies)
        .filter(|&(_, &p)| p == wanted)
        .map(|(&id, _)| id)
        .collect()
}

struct Walk<'a> {
    ids: &'a [BlockId],
    policies: &'a [ProcessingPolicy],
    sources: &'a [&'a [Option<OutputRef>]],
    visit: Vec<Visit>,
    stack: Vec<usize>,
    active: Vec<bool>,
}

impl Walk<'_> {
    /// Visit block `index`. `root` forces expansion of an `OutFirst` block.
    fn visit(&mut self, index: usize, root: bool) -> Result<()> {
        self.active[index] = true;
        if self.policies[index] == ProcessingPolicy::OutFirst && !root {
            return Ok(());
        }

        match self.visit[index] {
            Visit::Done => return Ok(()),
            Visit::InProgress => {
                let start = self.stack.iter().position(|&i| i == index).unwrap_or(0);
                let blocks = self.stack[start..].iter().map(|&i| self.ids[i]).collect();
                return Err(CadenceError::UnresolvableCycle { blocks });
            }
            Visit::Unvisited => {}
        }

        self.visit[index] = Visit::InProgress;
        self.stack.push(index);
        for source in self.sources[index].iter().flatten() {
            self.visit(source.block.index(), false)?;
        }
        self.stack.pop();
        self.visit[index] = Visit::Done;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::traits::{BlockInfo, InputRef, PortInfo};
    use cadence_core::types::ArrangementId;

    fn info(policy: ProcessingPolicy) -> BlockInfo {
        BlockInfo::new("node", policy)
            .with_input(PortInfo::of::<f64>().optional())
            .with_output(PortInfo::of::<f64>())
    }

    fn link(connections: &mut Connections, from: BlockId, to: BlockId) {
        connections
            .connect(
                OutputRef { block: from, index: 0 },
                InputRef { block: to, index: 0 },
            )
            .unwrap();
    }

    #[test]
    fn chain_is_active_from_root() {
        let mut c = Connections::new(ArrangementId::allocate());
        let a = c.add_block(info(ProcessingPolicy::Lazy));
        let b = c.add_block(info(ProcessingPolicy::Lazy));
        let root = c.add_block(info(ProcessingPolicy::Always));
        link(&mut c, a, b);
        link(&mut c, b, root);

        let plan = ExecutionPlan::analyze(&c).unwrap();
        assert!(plan.is_active(a));
        assert!(plan.is_active(b));
        assert_eq!(plan.always(), &[root]);
        assert_eq!(plan.pruned().count(), 0);
    }

    #[test]
    fn unneeded_lazy_block_is_pruned() {
        let mut c = Connections::new(ArrangementId::allocate());
        let orphan = c.add_block(info(ProcessingPolicy::Lazy));
        let root = c.add_block(info(ProcessingPolicy::Always));

        let plan = ExecutionPlan::analyze(&c).unwrap();
        assert!(!plan.is_active(orphan));
        assert!(plan.is_active(root));
        assert_eq!(plan.pruned().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn cycle_without_out_first_is_rejected() {
        let mut c = Connections::new(ArrangementId::allocate());
        let a = c.add_block(info(ProcessingPolicy::Always));
        let b = c.add_block(info(ProcessingPolicy::Lazy));
        link(&mut c, a, b);
        link(&mut c, b, a);

        let err = ExecutionPlan::analyze(&c).unwrap_err();
        match err {
            CadenceError::UnresolvableCycle { blocks } => {
                assert_eq!(blocks.len(), 2);
                assert!(blocks.contains(&a));
                assert!(blocks.contains(&b));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn out_first_breaks_cycle() {
        let mut c = Connections::new(ArrangementId::allocate());
        let delay = c.add_block(info(ProcessingPolicy::OutFirst));
        let a = c.add_block(info(ProcessingPolicy::Lazy));
        let root = c.add_block(info(ProcessingPolicy::Always));
        link(&mut c, delay, a);
        link(&mut c, a, delay);
        let tap = c.add_block(info(ProcessingPolicy::Lazy));
        link(&mut c, tap, root);

        let plan = ExecutionPlan::analyze(&c).unwrap();
        assert!(plan.is_active(delay));
        assert!(plan.is_active(a));
        assert!(plan.is_active(tap));
        assert_eq!(plan.out_first(), &[delay]);
    }

    #[test]
    fn cycle_behind_out_first_consumer_is_rejected() {
        // delay <- a <- b <- a: the a/b loop does not pass through delay
        let mut c = Connections::new(ArrangementId::allocate());
        let delay = c.add_block(info(ProcessingPolicy::OutFirst));
        let a = c.add_block(info(ProcessingPolicy::Lazy));
        let b = c.add_block(info(ProcessingPolicy::Lazy));
        link(&mut c, a, delay);
        link(&mut c, b, a);
        link(&mut c, a, b);

        let err = ExecutionPlan::analyze(&c).unwrap_err();
        assert!(matches!(err, CadenceError::UnresolvableCycle { .. }));
    }

    #[test]
    fn self_loop_on_out_first_is_allowed() {
        let mut c = Connections::new(ArrangementId::allocate());
        let delay = c.add_block(info(ProcessingPolicy::OutFirst));
        link(&mut c, delay, delay);
        let plan = ExecutionPlan::analyze(&c).unwrap();
        assert!(plan.is_active(delay));
    }

    #[test]
    fn unreachable_cycle_is_pruned_not_rejected() {
        let mut c = Connections::new(ArrangementId::allocate());
        let a = c.add_block(info(ProcessingPolicy::Lazy));
        c.add_block(info(ProcessingPolicy::Always));
        link(&mut c, a, a);

        let plan = ExecutionPlan::analyze(&c).unwrap();
        assert!(!plan.is_active(a));
    }
}
