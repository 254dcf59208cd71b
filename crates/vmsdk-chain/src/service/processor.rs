//! Accepted-block processor.
//!
//! Single consumer of the accepted queue. Blocks arrive already persisted by
//! `BlockStore::accept`; each one is handed to the listeners strictly in
//! acceptance order. On stop it finishes whatever is already queued and
//! exits; a listener failure ends the loop with the error.

use super::store::AcceptedReceiver;
use crate::domain::Block;
use crate::error::Result;
use crate::metrics::ChainMetrics;
use crate::ports::AcceptedListener;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Drains the accepted queue into the registered listeners
pub struct AcceptedProcessor {
    queue: AcceptedReceiver,
    listeners: Vec<Arc<dyn AcceptedListener>>,
    metrics: ChainMetrics,
}

impl AcceptedProcessor {
    /// Consume `queue`
    pub fn new(queue: AcceptedReceiver, metrics: ChainMetrics) -> Self {
        Self {
            queue,
            listeners: Vec::new(),
            metrics,
        }
    }

    /// Register a downstream consumer
    pub fn with_listener(mut self, listener: Arc<dyn AcceptedListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Run until every sender is dropped or `stop` turns true.
    ///
    /// Returns the number of blocks processed.
    pub async fn run(mut self, mut stop: watch::Receiver<bool>) -> Result<u64> {
        info!(listeners = self.listeners.len(), "starting accepted processor");
        let mut processed = 0u64;

        if !*stop.borrow_and_update() {
            loop {
                tokio::select! {
                    next = self.queue.recv() => match next {
                        Some(block) => {
                            self.process(&block)?;
                            processed += 1;
                        }
                        None => {
                            info!(processed, "accepted queue closed");
                            return Ok(processed);
                        }
                    },
                    changed = stop.changed() => {
                        if changed.is_err() || *stop.borrow_and_update() {
                            break;
                        }
                    }
                }
            }
        }

        self.queue.close();
        while let Some(block) = self.queue.recv().await {
            self.process(&block)?;
            processed += 1;
        }
        info!(processed, "stopped accepted processor");
        Ok(processed)
    }

    fn process(&self, block: &Block) -> Result<()> {
        let id = block.id();
        for listener in &self.listeners {
            if let Err(e) = listener.on_accepted(block) {
                error!(block = %id, height = block.height(), error = %e, "accepted listener failed");
                return Err(e);
            }
        }
        self.metrics.accepted_processed.inc();
        debug!(block = %id, height = block.height(), "processed accepted block");
        Ok(())
    }
}
