//! Logging setup for applications embedding cadence.
//!
//! The library itself only emits `tracing` events. Binaries and tests that
//! want to see them install a subscriber with [`init_tracing`]:
//!
//! ```ignore
//! use cadence_executor::observability::{TracingConfig, init_tracing};
//!
//! init_tracing(&TracingConfig::from_env())?;
//! ```
//!
//! Format is controlled by `CADENCE_LOG_FORMAT` (`json`, `pretty`,
//! `compact`) and the filter by `CADENCE_LOG` or `RUST_LOG`.

mod config;
mod tracing_setup;

pub use config::{LogFormat, TracingConfig, TracingConfigBuilder};
pub use tracing_setup::init_tracing;
