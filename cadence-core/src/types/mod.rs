//! Core type definitions.

mod ids;

pub use ids::{ArrangementId, BlockId};
