//! Block trait and related metadata.

use super::context::BlockContext;
use crate::connections::Connections;
use crate::error::Result;
use crate::types::BlockId;
use crate::value::ValueType;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

/// When a block is evaluated relative to a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingPolicy {
    /// Processed only when one of its outputs is requested, at most once per tick.
    Lazy,
    /// Processed exactly once every tick.
    Always,
    /// Outputs are produced at the start of the tick from the previous tick's
    /// inputs; inputs are refreshed at the end of the tick.
    OutFirst,
}

impl ProcessingPolicy {
    /// Whether blocks with this policy are scheduled without being demanded.
    #[must_use]
    pub fn is_root(&self) -> bool {
        !matches!(self, Self::Lazy)
    }
}

impl fmt::Display for ProcessingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Lazy => "lazy",
            Self::Always => "always",
            Self::OutFirst => "out_first",
        };
        f.write_str(s)
    }
}

/// Direction of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    /// Input port.
    Input,
    /// Output port.
    Output,
}

impl PortDirection {
    /// Lowercase name used in error messages.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
        }
    }
}

/// Declaration of one input or output slot.
#[derive(Debug, Clone)]
pub struct PortInfo {
    /// Optional developer-supplied name, used in diagnostics.
    pub name: Option<String>,
    /// Type carried by the port.
    pub value_type: ValueType,
    /// Whether an input may be left unconnected. Ignored for outputs.
    pub optional: bool,
}

impl PortInfo {
    /// A required port carrying `T`.
    #[must_use]
    pub fn of<T: Any>() -> Self {
        Self {
            name: None,
            value_type: ValueType::of::<T>(),
            optional: false,
        }
    }

    /// Set the port name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Mark an input as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Name for display: the given name or the slot index.
    #[must_use]
    pub fn display_name(&self, index: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("#{}", index),
        }
    }
}

/// Static description of a block: name, policy, and its slots.
///
/// Read once when the block is added to an arrangement; the arity recorded
/// there is final.
#[derive(Debug, Clone)]
pub struct BlockInfo {
    /// Block name for diagnostics (e.g. "delay", "heading_pid").
    pub name: String,
    /// Processing policy.
    pub policy: ProcessingPolicy,
    /// Input slots, by index.
    pub inputs: Vec<PortInfo>,
    /// Output slots, by index.
    pub outputs: Vec<PortInfo>,
}

impl BlockInfo {
    /// Create info with no ports.
    #[must_use]
    pub fn new(name: impl Into<String>, policy: ProcessingPolicy) -> Self {
        Self {
            name: name.into(),
            policy,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Append an input slot.
    #[must_use]
    pub fn with_input(mut self, port: PortInfo) -> Self {
        self.inputs.push(port);
        self
    }

    /// Append an output slot.
    #[must_use]
    pub fn with_output(mut self, port: PortInfo) -> Self {
        self.outputs.push(port);
        self
    }

    /// Get an input slot by index.
    #[must_use]
    pub fn input(&self, index: usize) -> Option<&PortInfo> {
        self.inputs.get(index)
    }

    /// Get an output slot by index.
    #[must_use]
    pub fn output(&self, index: usize) -> Option<&PortInfo> {
        self.outputs.get(index)
    }

    /// Get a port by direction and index.
    #[must_use]
    pub fn port(&self, direction: PortDirection, index: usize) -> Option<&PortInfo> {
        match direction {
            PortDirection::Input => self.input(index),
            PortDirection::Output => self.output(index),
        }
    }
}

/// A computation node in a block system.
///
/// A block declares its slots through [`Block::info`] and computes every
/// output from its inputs in [`Block::process`]. The scheduler calls `init`
/// once when the system starts, `process` according to the block's
/// [`ProcessingPolicy`], and `stop` once at shutdown.
///
/// # Example
///
/// ```
/// use cadence_core::prelude::*;
///
/// struct Gain {
///     gain: f64,
/// }
///
/// impl Gain {
///     const INPUT: InputSlot<f64> = InputSlot::new(0);
///     const OUTPUT: OutputSlot<f64> = OutputSlot::new(0);
/// }
///
/// impl Block for Gain {
///     fn info(&self) -> BlockInfo {
///         BlockInfo::new("gain", ProcessingPolicy::Lazy)
///             .with_input(PortInfo::of::<f64>().named("signal"))
///             .with_output(PortInfo::of::<f64>().named("scaled"))
///     }
///
///     fn process(&mut self, ctx: &mut dyn BlockContext) -> Result<()> {
///         let signal = ctx.get(Self::INPUT)?;
///         ctx.set(Self::OUTPUT, signal * self.gain)
///     }
/// }
/// ```
pub trait Block: Send {
    /// Describe this block's name, policy, and slots.
    fn info(&self) -> BlockInfo;

    /// Reset internal state. Called once when the system starts.
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Compute every output. Each declared output must be set exactly once.
    fn process(&mut self, ctx: &mut dyn BlockContext) -> Result<()>;

    /// Release internal state. Called once at shutdown.
    fn stop(&mut self) {}

    /// Validate this block's wiring beyond the required-input rule.
    fn check_config(&self, _id: BlockId, _connections: &Connections) -> Result<()> {
        Ok(())
    }
}
