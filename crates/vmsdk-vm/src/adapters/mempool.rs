//! Mempool that tracks only a depth.
//!
//! For hosts that keep transactions elsewhere and for tests. Accepted blocks
//! drain `unit_cost` entries when registered as an accepted listener.

use crate::ports::Mempool;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use vmsdk_chain::{AcceptedListener, Block};

/// Depth-only [`Mempool`]
#[derive(Debug, Default)]
pub struct CountingMempool {
    pending: AtomicUsize,
}

impl CountingMempool {
    /// Empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `count` newly arrived transactions
    pub fn add(&self, count: usize) {
        self.pending.fetch_add(count, Ordering::SeqCst);
    }

    /// Current depth
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    fn drain(&self, count: usize) {
        // Saturating: a block may include transactions this pool never saw.
        let _ = self
            .pending
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |pending| {
                Some(pending.saturating_sub(count))
            });
    }
}

#[async_trait]
impl Mempool for CountingMempool {
    async fn len(&self) -> usize {
        self.pending()
    }
}

impl AcceptedListener for CountingMempool {
    fn on_accepted(&self, block: &Block) -> vmsdk_chain::Result<()> {
        let included = usize::try_from(block.unit_cost()).unwrap_or(usize::MAX);
        self.drain(included);
        Ok(())
    }
}
