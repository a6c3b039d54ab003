//! Closure blocks.

use cadence_core::prelude::*;
use std::any::Any;

/// Applies a function to its input.
pub struct MapBlock<A, B> {
    name: String,
    f: Box<dyn FnMut(A) -> B + Send>,
}

impl<A, B> MapBlock<A, B> {
    /// The argument.
    pub const INPUT: InputSlot<A> = InputSlot::new(0);
    /// The result.
    pub const OUTPUT: OutputSlot<B> = OutputSlot::new(0);

    /// Create a map block; `name` appears in diagnostics.
    pub fn new(name: impl Into<String>, f: impl FnMut(A) -> B + Send + 'static) -> Self {
        Self {
            name: name.into(),
            f: Box::new(f),
        }
    }
}

impl<A: Any + Clone, B: Any + Send + Sync> Block for MapBlock<A, B> {
    fn info(&self) -> BlockInfo {
        BlockInfo::new(self.name.clone(), ProcessingPolicy::Lazy)
            .with_input(PortInfo::of::<A>())
            .with_output(PortInfo::of::<B>())
    }

    fn process(&mut self, ctx: &mut dyn BlockContext) -> Result<()> {
        let input = ctx.get(Self::INPUT)?;
        ctx.set(Self::OUTPUT, (self.f)(input))
    }
}

/// Applies a function to two inputs.
pub struct CombineBlock<A, B, C> {
    name: String,
    f: Box<dyn FnMut(A, B) -> C + Send>,
}

impl<A, B, C> CombineBlock<A, B, C> {
    /// The first argument.
    pub const FIRST: InputSlot<A> = InputSlot::new(0);
    /// The second argument.
    pub const SECOND: InputSlot<B> = InputSlot::new(1);
    /// The result.
    pub const OUTPUT: OutputSlot<C> = OutputSlot::new(0);

    /// Create a combine block; `name` appears in diagnostics.
    pub fn new(name: impl Into<String>, f: impl FnMut(A, B) -> C + Send + 'static) -> Self {
        Self {
            name: name.into(),
            f: Box::new(f),
        }
    }
}

impl<A: Any + Clone, B: Any + Clone, C: Any + Send + Sync> Block for CombineBlock<A, B, C> {
    fn info(&self) -> BlockInfo {
        BlockInfo::new(self.name.clone(), ProcessingPolicy::Lazy)
            .with_input(PortInfo::of::<A>())
            .with_input(PortInfo::of::<B>())
            .with_output(PortInfo::of::<C>())
    }

    fn process(&mut self, ctx: &mut dyn BlockContext) -> Result<()> {
        let first = ctx.get(Self::FIRST)?;
        let second = ctx.get(Self::SECOND)?;
        ctx.set(Self::OUTPUT, (self.f)(first, second))
    }
}
