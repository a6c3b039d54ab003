//! Error types for cadence.
//!
//! Every error names the block, port, or field it concerns so a failing
//! arrangement or profile can be traced back to its cause. Configuration
//! errors are raised while an arrangement is being built; runtime errors
//! halt the tick in which they occur.

use crate::types::{ArrangementId, BlockId};
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for cadence operations.
#[derive(Error, Debug)]
pub enum CadenceError {
    // =========================================================================
    // Configuration Errors (E100-E199)
    // =========================================================================
    /// A non-optional input was left unconnected.
    #[error("E101: Input {input} of block {block} ('{block_name}') is not connected")]
    UnconnectedInput {
        /// The block owning the input.
        block: BlockId,
        /// Name of the block, for diagnostics.
        block_name: String,
        /// Index of the input.
        input: usize,
    },

    /// An input already has a source.
    #[error("E102: Input {input} of block {block} is already connected to {existing}")]
    InputAlreadyConnected {
        /// The block owning the input.
        block: BlockId,
        /// Index of the input.
        input: usize,
        /// Description of the existing source.
        existing: String,
    },

    /// A dependency cycle contains no out-first block.
    #[error("E103: Unresolvable cycle through blocks {blocks:?}; one block in the cycle must be out-first")]
    UnresolvableCycle {
        /// The blocks on the cycle, in dependency order.
        blocks: Vec<BlockId>,
    },

    /// A handle refers to a block owned by another arrangement.
    #[error("E104: Block {block} belongs to arrangement {owner}, not {expected}")]
    ForeignBlock {
        /// The offending block handle.
        block: BlockId,
        /// The arrangement that owns the block.
        owner: ArrangementId,
        /// The arrangement being built.
        expected: ArrangementId,
    },

    /// A port index or type does not match the block's declaration.
    #[error("E105: Invalid {direction} port {index} on block {block}: {cause}")]
    InvalidPort {
        /// The block the port was looked up on.
        block: BlockId,
        /// "input" or "output".
        direction: &'static str,
        /// The requested index.
        index: usize,
        /// Why the port is invalid.
        cause: String,
    },

    /// A block rejected its own configuration.
    #[error("E106: Invalid configuration for block {block}: {cause}")]
    BlockConfig {
        /// The block reporting the problem.
        block: BlockId,
        /// Description of the configuration error.
        cause: String,
    },

    /// A block id is unknown to the arrangement.
    #[error("E107: Block {block} is not part of this arrangement")]
    BlockNotFound {
        /// The missing block.
        block: BlockId,
    },

    /// Invalid configuration value.
    #[error("E108: Invalid configuration '{field}': {cause}")]
    ConfigValue {
        /// The configuration field with the invalid value.
        field: String,
        /// Why the value is invalid.
        cause: String,
    },

    // =========================================================================
    // Scheduling Errors (E200-E299)
    // =========================================================================
    /// A block returned from `process` without setting an output.
    #[error("E201: Block {block} ('{block_name}') did not set output {output} on tick {tick}")]
    OutputNotSet {
        /// The block that failed to set its output.
        block: BlockId,
        /// Name of the block, for diagnostics.
        block_name: String,
        /// Index of the unset output.
        output: usize,
        /// Tick during which it happened.
        tick: u64,
    },

    /// A block set the same output twice in one `process` call.
    #[error("E202: Block {block} set output {output} more than once")]
    OutputAlreadySet {
        /// The offending block.
        block: BlockId,
        /// Index of the output.
        output: usize,
    },

    /// A block was re-entered while it was still processing.
    #[error("E203: Loop in block system: block {block} re-entered on tick {tick}")]
    ReentrantProcessing {
        /// The re-entered block.
        block: BlockId,
        /// Tick during which it happened.
        tick: u64,
    },

    /// An input value was read before any value was available.
    #[error("E204: Input {input} of block {block} has no value")]
    InputUnavailable {
        /// The block reading the input.
        block: BlockId,
        /// Index of the input.
        input: usize,
    },

    /// A value did not have the type the reader expected.
    #[error("E205: Type mismatch on block {block}: expected {expected}, found {actual}")]
    ValueTypeMismatch {
        /// The block reading or writing the value.
        block: BlockId,
        /// The expected type name.
        expected: &'static str,
        /// The actual type name.
        actual: &'static str,
    },

    /// The system was ticked before `init` or after `stop`.
    #[error("E206: Block system is not running: {cause}")]
    NotRunning {
        /// What was attempted.
        cause: String,
    },

    // =========================================================================
    // Block Errors (E300-E399)
    // =========================================================================
    /// A block's `process` reported a failure.
    #[error("E301: Block {block} failed on tick {tick}: {cause}")]
    BlockProcess {
        /// The failing block.
        block: BlockId,
        /// Tick during which it happened.
        tick: u64,
        /// Reason for the failure.
        cause: String,
    },

    // =========================================================================
    // Geometry / Profile Errors (E400-E499)
    // =========================================================================
    /// A path and a profile disagree on length.
    #[error("E401: Path length {path_length} does not match profile distance {profile_distance}")]
    LengthMismatch {
        /// Length of the path.
        path_length: f64,
        /// Distance covered by the profile.
        profile_distance: f64,
    },

    /// The constraints force zero velocity over a nonzero distance.
    #[error("E402: Motion profile stalls at distance {distance}: constraints allow no motion")]
    ProfileStall {
        /// Arc length at which the stall begins.
        distance: f64,
    },

    /// A geometric argument is out of range.
    #[error("E403: Invalid geometry '{field}': {cause}")]
    InvalidGeometry {
        /// The parameter at fault.
        field: String,
        /// Why it is invalid.
        cause: String,
    },

    /// A profile sample has no acceleration that stays within its limits.
    #[error(
        "E404: Constraints admit no acceleration at distance {distance} and velocity {velocity}"
    )]
    InfeasibleConstraints {
        /// Arc length of the sample.
        distance: f64,
        /// Velocity at which the constraints were evaluated.
        velocity: f64,
    },

    // =========================================================================
    // Persistence Errors (E500-E599)
    // =========================================================================
    /// Serialization or deserialization failed.
    #[error("E501: Serialization error: {0}")]
    Serialization(
        /// The serialization error message.
        String,
    ),

    /// File I/O error.
    #[error("E502: I/O error at {path}: {cause}")]
    Io {
        /// The path where the I/O error occurred.
        path: PathBuf,
        /// Description of the I/O error.
        cause: String,
    },

    /// YAML parsing failed.
    #[error("E503: Failed to parse YAML: {cause}")]
    YamlParse {
        /// Reason for the parse failure.
        cause: String,
    },
}

impl CadenceError {
    /// Get the error code (e.g., "E101").
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnconnectedInput { .. } => "E101",
            Self::InputAlreadyConnected { .. } => "E102",
            Self::UnresolvableCycle { .. } => "E103",
            Self::ForeignBlock { .. } => "E104",
            Self::InvalidPort { .. } => "E105",
            Self::BlockConfig { .. } => "E106",
            Self::BlockNotFound { .. } => "E107",
            Self::ConfigValue { .. } => "E108",
            Self::OutputNotSet { .. } => "E201",
            Self::OutputAlreadySet { .. } => "E202",
            Self::ReentrantProcessing { .. } => "E203",
            Self::InputUnavailable { .. } => "E204",
            Self::ValueTypeMismatch { .. } => "E205",
            Self::NotRunning { .. } => "E206",
            Self::BlockProcess { .. } => "E301",
            Self::LengthMismatch { .. } => "E401",
            Self::ProfileStall { .. } => "E402",
            Self::InvalidGeometry { .. } => "E403",
            Self::InfeasibleConstraints { .. } => "E404",
            Self::Serialization(_) => "E501",
            Self::Io { .. } => "E502",
            Self::YamlParse { .. } => "E503",
        }
    }

    /// Check if this error is raised while building an arrangement.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::UnconnectedInput { .. }
                | Self::InputAlreadyConnected { .. }
                | Self::UnresolvableCycle { .. }
                | Self::ForeignBlock { .. }
                | Self::InvalidPort { .. }
                | Self::BlockConfig { .. }
                | Self::BlockNotFound { .. }
                | Self::ConfigValue { .. }
                | Self::YamlParse { .. }
        )
    }

    /// Check if this error is a fatal scheduling error raised during a tick.
    #[must_use]
    pub fn is_runtime_error(&self) -> bool {
        matches!(
            self,
            Self::OutputNotSet { .. }
                | Self::OutputAlreadySet { .. }
                | Self::ReentrantProcessing { .. }
                | Self::InputUnavailable { .. }
                | Self::ValueTypeMismatch { .. }
                | Self::NotRunning { .. }
                | Self::BlockProcess { .. }
        )
    }
}

/// Result type alias using `CadenceError`.
pub type Result<T> = std::result::Result<T, CadenceError>;

/// Extension trait for adding block context to foreign errors.
pub trait ResultExt<T> {
    /// Wrap the error as a processing failure of `block` on `tick`.
    fn with_block(self, block: BlockId, tick: u64) -> Result<T>;

    /// Wrap the error as a configuration failure of `block`.
    fn with_block_config(self, block: BlockId) -> Result<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    fn with_block(self, block: BlockId, tick: u64) -> Result<T> {
        self.map_err(|e| CadenceError::BlockProcess {
            block,
            tick,
            cause: e.to_string(),
        })
    }

    fn with_block_config(self, block: BlockId) -> Result<T> {
        self.map_err(|e| CadenceError::BlockConfig {
            block,
            cause: e.to_string(),
        })
    }
}
