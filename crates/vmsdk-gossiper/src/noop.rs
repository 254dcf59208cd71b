//! Gossiper for VMs that do not propagate transactions.

use crate::error::Result;
use crate::ports::{AppSender, Gossiper};
use async_trait::async_trait;
use shared_types::NodeId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Accepts every call and sends nothing
pub struct NoopGossiper {
    finished: watch::Sender<bool>,
    received: AtomicU64,
}

impl Default for NoopGossiper {
    fn default() -> Self {
        Self::new()
    }
}

impl NoopGossiper {
    /// Create a gossiper whose `run` returns immediately
    pub fn new() -> Self {
        let (finished, _) = watch::channel(false);
        Self {
            finished,
            received: AtomicU64::new(0),
        }
    }

    /// Gossip messages received and ignored
    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Gossiper for NoopGossiper {
    async fn run(&self, _sender: Arc<dyn AppSender>) {
        debug!("noop gossiper has no loop");
        self.finished.send_replace(true);
    }

    async fn trigger_gossip(&self) -> Result<()> {
        Ok(())
    }

    async fn handle_app_gossip(&self, node_id: NodeId, payload: Vec<u8>) -> Result<()> {
        self.received.fetch_add(1, Ordering::Relaxed);
        debug!(node = %node_id, bytes = payload.len(), "ignoring app gossip");
        Ok(())
    }

    async fn done(&self) {
        let mut rx = self.finished.subscribe();
        // The sender lives in self, so the wait cannot fail.
        let _ = rx.wait_for(|finished| *finished).await;
    }
}
