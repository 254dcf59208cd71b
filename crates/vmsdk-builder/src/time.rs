//! Time-driven builder.
//!
//! Every `check_interval` the loop asks three questions, cheapest first:
//!
//! 1. Has `build_interval` passed since the last build attempt?
//! 2. Is anything waiting in the mempool?
//! 3. Does the tip's rolling window leave room for one more block this second?
//!
//! Only when all three pass does it signal the engine. A failed rate check
//! counts as a pass so a transient read error never stalls the chain.

use crate::config::BuilderConfig;
use crate::domain::{Completion, RateLimiter};
use crate::error::Result;
use crate::metrics::BuilderMetrics;
use crate::ports::{Builder, BuilderVm};
use crate::signal::notify_pending_txs;
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{SystemTimeSource, TimeSource};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Result of one pass of the check loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Last build attempt is within `build_interval`
    RecentlyBuilt,
    /// Nothing to put in a block
    EmptyMempool,
    /// The rolling window is at the target for this second
    RateLimited,
    /// Engine was signalled (the signal itself may still be coalesced)
    Triggered,
}

/// Builder that tells the engine when to build on its own schedule
pub struct TimeBuilder {
    vm: Arc<dyn BuilderVm>,
    config: BuilderConfig,
    limiter: RateLimiter,
    clock: Arc<dyn TimeSource>,

    last_build: Mutex<Option<Instant>>,
    started: AtomicBool,
    completion: Completion,
    metrics: Arc<BuilderMetrics>,
}

impl TimeBuilder {
    /// Create a time builder for `vm`
    pub fn new(vm: Arc<dyn BuilderVm>, config: BuilderConfig) -> Self {
        let limiter = RateLimiter::new(config.target_blocks_per_second);
        if limiter.stalls_busy_chain() {
            warn!(
                target = limiter.target(),
                "target below 2 blocks per second: a new build waits until the tip is a full window old"
            );
        }
        Self {
            vm,
            config,
            limiter,
            clock: Arc::new(SystemTimeSource),
            last_build: Mutex::new(None),
            started: AtomicBool::new(false),
            completion: Completion::new(),
            metrics: Arc::new(BuilderMetrics::new()),
        }
    }

    /// Replace the wall clock used for the rate check
    pub fn with_time_source(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    /// Scheduling counters
    pub fn metrics(&self) -> Arc<BuilderMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Whether the tip's window leaves room for one more block right now
    pub async fn should_build(&self) -> Result<bool> {
        let tip = self.vm.preferred_block().await?;
        let now = self.clock.now();
        let permitted = self.limiter.should_build(&tip, now);
        debug!(
            tip_height = tip.height,
            elapsed = now.saturating_sub(tip.timestamp),
            last_slot = tip.window.last(),
            target = self.limiter.target(),
            permitted,
            "evaluated rate window"
        );
        Ok(permitted)
    }

    fn built_recently(&self) -> bool {
        match *self.last_build.lock() {
            Some(at) => at.elapsed() < self.config.build_interval(),
            None => false,
        }
    }

    async fn check_cycle(&self) -> CycleOutcome {
        // Prevent runaway block production during window
        if self.built_recently() {
            debug!("skipping build because block built recently");
            self.metrics
                .skipped_recent_build
                .fetch_add(1, Ordering::Relaxed);
            return CycleOutcome::RecentlyBuilt;
        }
        if self.vm.mempool_len().await == 0 {
            debug!("skipping build because no transactions in mempool");
            self.metrics
                .skipped_empty_mempool
                .fetch_add(1, Ordering::Relaxed);
            return CycleOutcome::EmptyMempool;
        }
        let permitted = match self.should_build().await {
            Ok(permitted) => permitted,
            Err(e) => {
                warn!(error = %e, "unable to determine if should build, building anyways");
                self.metrics
                    .rate_check_failures
                    .fetch_add(1, Ordering::Relaxed);
                true
            }
        };
        if !permitted {
            self.metrics.rate_limited.fetch_add(1, Ordering::Relaxed);
            return CycleOutcome::RateLimited;
        }
        self.trigger_build();
        CycleOutcome::Triggered
    }
}

#[async_trait]
impl Builder for TimeBuilder {
    async fn run(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            warn!("builder loop already started");
            self.completion.wait().await;
            return;
        }
        let _completion = self.completion.guard();

        info!(
            build_interval_ms = self.config.build_interval_ms,
            check_interval_ms = self.config.check_interval_ms,
            target_blocks_per_second = self.config.target_blocks_per_second,
            "starting builder"
        );

        let mut stop = self.vm.stop_signal();
        if *stop.borrow_and_update() {
            info!("stopping build loop");
            return;
        }

        let period = self.config.check_interval();
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.check_cycle().await;
                }
                changed = stop.changed() => {
                    // A dropped stop sender means the VM is gone.
                    if changed.is_err() || *stop.borrow_and_update() {
                        info!("stopping build loop");
                        return;
                    }
                }
            }
        }
    }

    fn handle_generate_block(&self) {
        *self.last_build.lock() = Some(Instant::now());
    }

    fn trigger_build(&self) {
        notify_pending_txs(self.vm.engine_sender(), &self.metrics);
    }

    async fn done(&self) {
        self.completion.wait().await;
    }
}
