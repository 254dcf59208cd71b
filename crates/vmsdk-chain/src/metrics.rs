//! # Chain Metrics
//!
//! Prometheus counters for the block lifecycle, registered on a
//! caller-supplied [`Registry`] so several stores can coexist in one process.
//!
//! - `vmsdk_blocks_verified_total`
//! - `vmsdk_blocks_accepted_total`
//! - `vmsdk_blocks_rejected_total`
//! - `vmsdk_accepted_queue_full_total`
//! - `vmsdk_accepted_blocks_processed_total`
//! - `vmsdk_verified_blocks` (gauge)

use crate::error::Result;
use prometheus::{IntCounter, IntGauge, Opts, Registry};

/// Handles to the chain's registered collectors
#[derive(Clone, Debug)]
pub struct ChainMetrics {
    /// Blocks that passed verification
    pub blocks_verified: IntCounter,
    /// Blocks accepted by the engine
    pub blocks_accepted: IntCounter,
    /// Blocks rejected by the engine
    pub blocks_rejected: IntCounter,
    /// Accepts that found the processor queue full
    pub accepted_queue_full: IntCounter,
    /// Accepted blocks persisted by the processor
    pub accepted_processed: IntCounter,
    /// Blocks currently awaiting a decision
    pub verified_blocks: IntGauge,
}

impl ChainMetrics {
    /// Create the collectors and register them on `registry`.
    pub fn register(registry: &Registry) -> Result<Self> {
        let metrics = Self::unregistered()?;
        registry.register(Box::new(metrics.blocks_verified.clone()))?;
        registry.register(Box::new(metrics.blocks_accepted.clone()))?;
        registry.register(Box::new(metrics.blocks_rejected.clone()))?;
        registry.register(Box::new(metrics.accepted_queue_full.clone()))?;
        registry.register(Box::new(metrics.accepted_processed.clone()))?;
        registry.register(Box::new(metrics.verified_blocks.clone()))?;
        Ok(metrics)
    }

    /// Collectors that are not exported anywhere.
    pub fn unregistered() -> Result<Self> {
        Ok(Self {
            blocks_verified: counter("vmsdk_blocks_verified_total", "Blocks that passed verification")?,
            blocks_accepted: counter("vmsdk_blocks_accepted_total", "Blocks accepted by consensus")?,
            blocks_rejected: counter("vmsdk_blocks_rejected_total", "Blocks rejected by consensus")?,
            accepted_queue_full: counter(
                "vmsdk_accepted_queue_full_total",
                "Accepts refused because the accepted-block queue was full",
            )?,
            accepted_processed: counter(
                "vmsdk_accepted_blocks_processed_total",
                "Accepted blocks persisted by the processor",
            )?,
            verified_blocks: IntGauge::with_opts(Opts::new(
                "vmsdk_verified_blocks",
                "Blocks verified and awaiting a decision",
            ))?,
        })
    }
}

fn counter(name: &str, help: &str) -> Result<IntCounter> {
    Ok(IntCounter::with_opts(Opts::new(name, help))?)
}
