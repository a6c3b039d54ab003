//! Slot indices and connection endpoints.
//!
//! Blocks declare typed slot constants (`InputSlot<T>`, `OutputSlot<T>`)
//! and use them inside `process`. Once a block has been added to an
//! arrangement, its [`BlockHandle`] lifts those slots into endpoints
//! (`Input<T>`, `Output<T>`) that can be wired together.

use crate::types::BlockId;
use std::fmt;
use std::marker::PhantomData;

macro_rules! typed_slot {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name<T> {
            index: usize,
            _marker: PhantomData<fn() -> T>,
        }

        impl<T> $name<T> {
            /// Create a slot for the given index.
            #[must_use]
            pub const fn new(index: usize) -> Self {
                Self {
                    index,
                    _marker: PhantomData,
                }
            }

            /// The slot index.
            #[must_use]
            pub const fn index(&self) -> usize {
                self.index
            }
        }

        impl<T> Clone for $name<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $name<T> {}

        impl<T> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.index)
            }
        }
    };
}

typed_slot!(
    /// Index of an input slot carrying `T`.
    InputSlot
);

typed_slot!(
    /// Index of an output slot carrying `T`.
    OutputSlot
);

/// Untyped reference to an input of a specific block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputRef {
    /// The owning block.
    pub block: BlockId,
    /// The input index.
    pub index: usize,
}

/// Untyped reference to an output of a specific block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputRef {
    /// The owning block.
    pub block: BlockId,
    /// The output index.
    pub index: usize,
}

impl fmt::Display for InputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.in[{}]", self.block, self.index)
    }
}

impl fmt::Display for OutputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.out[{}]", self.block, self.index)
    }
}

/// Typed input endpoint: a slot on a specific block.
pub struct Input<T> {
    block: BlockId,
    slot: InputSlot<T>,
}

/// Typed output endpoint: a slot on a specific block.
pub struct Output<T> {
    block: BlockId,
    slot: OutputSlot<T>,
}

macro_rules! endpoint_impls {
    ($name:ident, $slot:ident, $erased:ident) => {
        impl<T> $name<T> {
            /// Create an endpoint.
            #[must_use]
            pub const fn new(block: BlockId, slot: $slot<T>) -> Self {
                Self { block, slot }
            }

            /// The owning block.
            #[must_use]
            pub const fn block(&self) -> BlockId {
                self.block
            }

            /// The slot index.
            #[must_use]
            pub const fn index(&self) -> usize {
                self.slot.index()
            }

            /// Drop the type parameter.
            #[must_use]
            pub const fn erase(&self) -> $erased {
                $erased {
                    block: self.block,
                    index: self.slot.index(),
                }
            }
        }

        impl<T> Clone for $name<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $name<T> {}

        impl<T> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.erase())
            }
        }
    };
}

endpoint_impls!(Input, InputSlot, InputRef);
endpoint_impls!(Output, OutputSlot, OutputRef);

/// Handle to a block that has been moved into an arrangement builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockHandle {
    id: BlockId,
}

impl BlockHandle {
    /// Wrap a block id.
    #[must_use]
    pub const fn new(id: BlockId) -> Self {
        Self { id }
    }

    /// The block id.
    #[must_use]
    pub const fn id(&self) -> BlockId {
        self.id
    }

    /// Endpoint for one of this block's inputs.
    #[must_use]
    pub const fn input<T>(&self, slot: InputSlot<T>) -> Input<T> {
        Input::new(self.id, slot)
    }

    /// Endpoint for one of this block's outputs.
    #[must_use]
    pub const fn output<T>(&self, slot: OutputSlot<T>) -> Output<T> {
        Output::new(self.id, slot)
    }

    /// Untyped endpoint for input `index`.
    #[must_use]
    pub const fn input_ref(&self, index: usize) -> InputRef {
        InputRef {
            block: self.id,
            index,
        }
    }

    /// Untyped endpoint for output `index`.
    #[must_use]
    pub const fn output_ref(&self, index: usize) -> OutputRef {
        OutputRef {
            block: self.id,
            index,
        }
    }
}
