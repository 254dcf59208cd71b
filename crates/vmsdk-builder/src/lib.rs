//! # Block Builder
//!
//! Decides *when* the consensus engine should try to build a block. The
//! builder never builds anything itself: it sends an advisory
//! [`shared_types::EngineMessage::PendingTxs`] on the engine's inbound
//! channel and lets the engine call back into the VM.
//!
//! ## Variants
//!
//! | Variant | Loop | Triggered by |
//! |---------|------|--------------|
//! | [`ManualBuilder`] | none | explicit [`Builder::trigger_build`] calls |
//! | [`TimeBuilder`] | every `check_interval` | spacing + mempool depth + rolling rate |
//!
//! Both satisfy the same [`Builder`] contract; pick one with [`new_builder`].
//!
//! ## Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Variants: ManualBuilder, TimeBuilder               │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Ports                                              │
//! │  - Inbound: Builder                                 │
//! │  - Outbound: BuilderVm (engine channel, mempool,    │
//! │    tip, stop signal)                                │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain: RateLimiter, Completion                    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Signal semantics
//!
//! The engine channel holds at most one message. A signal sent while one is
//! pending is dropped and logged at debug level; this is normal operation.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Scheduling decisions
pub mod domain;
pub mod ports;

mod config;
mod error;
mod manual;
mod metrics;
mod signal;
mod time;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{
    BuilderConfig, BuilderMode, DEFAULT_BUILD_INTERVAL_MS, DEFAULT_CHECK_INTERVAL_MS,
    DEFAULT_TARGET_BLOCKS_PER_SECOND,
};
pub use domain::{Completion, RateLimiter};
pub use error::{BuilderError, Result};
pub use manual::ManualBuilder;
pub use metrics::BuilderMetrics;
pub use ports::{Builder, BuilderVm, TipSnapshot};
pub use time::{CycleOutcome, TimeBuilder};

use shared_types::TimeSource;
use std::sync::Arc;

/// Construct the builder variant selected by `config`
pub fn new_builder(
    vm: Arc<dyn BuilderVm>,
    config: BuilderConfig,
    clock: Arc<dyn TimeSource>,
) -> Result<Arc<dyn Builder>> {
    config.validate()?;
    let builder: Arc<dyn Builder> = match config.mode {
        BuilderMode::Manual => Arc::new(ManualBuilder::new(vm)),
        BuilderMode::Time => Arc::new(TimeBuilder::new(vm, config).with_time_source(clock)),
    };
    Ok(builder)
}
