//! Strongly-typed identifiers for blocks and arrangements.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_ARRANGEMENT: AtomicU32 = AtomicU32::new(1);

/// Identifier for one arrangement (and the builder that produced it).
///
/// Every builder allocates a fresh id, so block handles carry the
/// generation they were issued under and cannot be used with another
/// arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArrangementId(u32);

impl ArrangementId {
    /// Create an arrangement id from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Allocate a process-unique arrangement id.
    #[must_use]
    pub fn allocate() -> Self {
        Self(NEXT_ARRANGEMENT.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ArrangementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arrangement_{}", self.0)
    }
}

/// Identifier for a block within an arrangement.
///
/// The index addresses the block's slot in the arrangement's arena; the
/// arrangement id is checked whenever the handle is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId {
    arrangement: ArrangementId,
    index: u32,
}

impl BlockId {
    /// Create a block id.
    #[must_use]
    pub const fn new(arrangement: ArrangementId, index: u32) -> Self {
        Self { arrangement, index }
    }

    /// The arrangement this block belongs to.
    #[must_use]
    pub const fn arrangement(&self) -> ArrangementId {
        self.arrangement
    }

    /// The block's slot index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block_{}.{}", self.arrangement.0, self.index)
    }
}
