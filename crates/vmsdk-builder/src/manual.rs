//! Manually triggered builder.
//!
//! No autonomous loop: blocks are only attempted when someone calls
//! [`Builder::trigger_build`]. Used by tests and by VMs that build on demand.

use crate::domain::Completion;
use crate::metrics::BuilderMetrics;
use crate::ports::{Builder, BuilderVm};
use crate::signal::notify_pending_txs;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Builder that only signals the engine on request
pub struct ManualBuilder {
    vm: Arc<dyn BuilderVm>,
    completion: Completion,
    metrics: Arc<BuilderMetrics>,
}

impl ManualBuilder {
    /// Create a manual builder for `vm`
    pub fn new(vm: Arc<dyn BuilderVm>) -> Self {
        Self {
            vm,
            completion: Completion::new(),
            metrics: Arc::new(BuilderMetrics::new()),
        }
    }

    /// Scheduling counters
    pub fn metrics(&self) -> Arc<BuilderMetrics> {
        Arc::clone(&self.metrics)
    }
}

#[async_trait]
impl Builder for ManualBuilder {
    async fn run(&self) {
        debug!("manual builder has no loop");
        self.completion.complete();
    }

    fn handle_generate_block(&self) {}

    fn trigger_build(&self) {
        notify_pending_txs(self.vm.engine_sender(), &self.metrics);
    }

    async fn done(&self) {
        self.completion.wait().await;
    }
}
