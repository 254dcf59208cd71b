//! # Block Store
//!
//! Tracks every block the engine has verified until it is decided.
//!
//! ```text
//!   verify ──► verified (unbounded) ──accept──► database + accepted cache (LRU)
//!                      │                                       │
//!                      └──reject──► dropped                    └──► accepted queue ──► AcceptedProcessor
//! ```
//!
//! Lookups check the verified set first, then the cache, then the database,
//! so in-flight state always shadows anything older with the same id.
//!
//! `accept` writes the block and the last accepted id to the database before
//! the block leaves the verified set. The queue only feeds downstream
//! listeners, so an evicted block is always still in the database.
//!
//! ## Locking
//!
//! `verified` is a read/write lock; the cache sits behind a mutex because an
//! LRU read updates recency. `accept` takes `verified` then the cache and
//! holds both while moving the block so no reader sees it missing from both.
//! The database write happens under the `verified` write lock, so two
//! accepts never interleave their last accepted updates.
//! Nothing else holds the two at once.

use crate::config::ChainConfig;
use crate::domain::{Block, BlockStatus, ChainRules};
use crate::error::{ChainError, Result};
use crate::metrics::ChainMetrics;
use crate::ports::{BlockDatabase, BlockLifecycleApi};
use lru::LruCache;
use parking_lot::{Mutex, RwLock};
use shared_types::{BlockId, TimeSource};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error};

/// Receiving end of the accepted-block queue
pub type AcceptedReceiver = mpsc::Receiver<Arc<Block>>;

/// Verified set, accepted cache and accepted queue for one chain
pub struct BlockStore {
    rules: ChainRules,
    queue_capacity: usize,
    verified: RwLock<HashMap<BlockId, Arc<Block>>>,
    accepted: Mutex<LruCache<BlockId, Arc<Block>>>,
    accepted_tx: mpsc::Sender<Arc<Block>>,
    database: Arc<dyn BlockDatabase>,
    clock: Arc<dyn TimeSource>,
    metrics: ChainMetrics,
}

impl BlockStore {
    /// Build a store and the receiver its accepted blocks are queued on.
    pub fn new(
        config: &ChainConfig,
        database: Arc<dyn BlockDatabase>,
        clock: Arc<dyn TimeSource>,
        metrics: ChainMetrics,
    ) -> Result<(Self, AcceptedReceiver)> {
        config.validate()?;
        let capacity = NonZeroUsize::new(config.accepted_cache_capacity).ok_or_else(|| {
            ChainError::InvalidConfig("accepted_cache_capacity must be > 0".into())
        })?;
        let (accepted_tx, accepted_rx) = mpsc::channel(config.accepted_queue_capacity);

        let store = Self {
            rules: ChainRules::new(config.max_future_drift_secs),
            queue_capacity: config.accepted_queue_capacity,
            verified: RwLock::new(HashMap::new()),
            accepted: Mutex::new(LruCache::new(capacity)),
            accepted_tx,
            database,
            clock,
            metrics,
        };
        Ok((store, accepted_rx))
    }

    /// Put an already-final block (genesis, or the last accepted block on
    /// restart) in the accepted cache without queueing it.
    pub fn prime_accepted(&self, block: Arc<Block>) {
        self.accepted.lock().put(block.id(), block);
    }

    /// Blocks awaiting a decision
    pub fn verified_len(&self) -> usize {
        self.verified.read().len()
    }

    /// Blocks held in the accepted cache
    pub fn accepted_cache_len(&self) -> usize {
        self.accepted.lock().len()
    }

    /// Whether the accepted cache holds `id`, without touching recency
    pub fn accepted_cache_contains(&self, id: &BlockId) -> bool {
        self.accepted.lock().contains(id)
    }

    /// Store metrics
    pub fn metrics(&self) -> &ChainMetrics {
        &self.metrics
    }

    fn parent_of(&self, block: &Block) -> Result<Arc<Block>> {
        match self.get_block(&block.parent()) {
            Err(e) if e.is_not_found() => Err(ChainError::ParentNotFound {
                id: block.id(),
                parent: block.parent(),
            }),
            other => other,
        }
    }

    fn take_verified(&self, id: &BlockId, to: BlockStatus) -> Result<Arc<Block>> {
        let removed = self.verified.write().remove(id);
        match removed {
            Some(block) => {
                debug!(block = %id, from = ?BlockStatus::Verified, to = ?to, "block transition");
                Ok(block)
            }
            None => Err(self.not_verified(id, to)),
        }
    }

    fn not_verified(&self, id: &BlockId, to: BlockStatus) -> ChainError {
        error!(block = %id, to = ?to, "decision for a block that was never verified");
        ChainError::NotVerified { id: *id }
    }

    fn persist(&self, block: &Block) -> Result<()> {
        let id = block.id();
        if let Err(e) = self
            .database
            .put_block(block)
            .and_then(|()| self.database.set_last_accepted(&id))
        {
            error!(block = %id, height = block.height(), error = %e, "failed to persist accepted block");
            return Err(e);
        }
        Ok(())
    }

    fn enqueue_accepted(&self, block: Arc<Block>) -> Result<()> {
        match self.accepted_tx.try_send(block) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(block)) => {
                self.metrics.accepted_queue_full.inc();
                error!(
                    block = %block.id(),
                    height = block.height(),
                    capacity = self.queue_capacity,
                    "accepted queue full; raise accepted_queue_capacity"
                );
                Err(ChainError::AcceptedQueueFull {
                    capacity: self.queue_capacity,
                })
            }
            Err(TrySendError::Closed(block)) => {
                error!(block = %block.id(), "accepted processor is gone");
                Err(ChainError::AcceptedQueueClosed)
            }
        }
    }
}

impl BlockLifecycleApi for BlockStore {
    fn verify(&self, block: Block) -> Result<Arc<Block>> {
        let id = block.id();
        match self.status(&id)? {
            BlockStatus::Verified => {
                if let Some(existing) = self.verified.read().get(&id) {
                    return Ok(Arc::clone(existing));
                }
            }
            BlockStatus::Accepted => return Err(ChainError::AlreadyAccepted { id }),
            BlockStatus::Unknown | BlockStatus::Rejected => {}
        }

        let parent = self.parent_of(&block)?;
        self.rules.verify_child(&parent, &block, self.clock.now())?;

        let block = Arc::new(block);
        let verified_len = {
            let mut verified = self.verified.write();
            verified.insert(id, Arc::clone(&block));
            verified.len()
        };
        self.metrics.blocks_verified.inc();
        self.metrics.verified_blocks.set(verified_len as i64);
        debug!(
            block = %id,
            height = block.height(),
            from = ?BlockStatus::Unknown,
            to = ?BlockStatus::Verified,
            "block transition"
        );
        Ok(block)
    }

    fn accept(&self, id: &BlockId) -> Result<Arc<Block>> {
        let (block, verified_len) = {
            let mut verified = self.verified.write();
            let block = verified
                .get(id)
                .cloned()
                .ok_or_else(|| self.not_verified(id, BlockStatus::Accepted))?;
            self.persist(&block)?;
            verified.remove(id);
            if let Some((evicted, _)) = self.accepted.lock().push(*id, Arc::clone(&block)) {
                if evicted != *id {
                    debug!(block = %evicted, "evicted from accepted cache");
                }
            }
            (block, verified.len())
        };
        self.metrics.blocks_accepted.inc();
        self.metrics.verified_blocks.set(verified_len as i64);
        debug!(
            block = %id,
            height = block.height(),
            from = ?BlockStatus::Verified,
            to = ?BlockStatus::Accepted,
            "block transition"
        );

        self.enqueue_accepted(Arc::clone(&block))?;
        Ok(block)
    }

    fn reject(&self, id: &BlockId) -> Result<Arc<Block>> {
        let block = self.take_verified(id, BlockStatus::Rejected)?;
        self.metrics.blocks_rejected.inc();
        self.metrics.verified_blocks.set(self.verified_len() as i64);
        Ok(block)
    }

    fn get_block(&self, id: &BlockId) -> Result<Arc<Block>> {
        if let Some(block) = self.verified.read().get(id) {
            return Ok(Arc::clone(block));
        }
        if let Some(block) = self.accepted.lock().get(id) {
            return Ok(Arc::clone(block));
        }
        self.database.get_block(id).map(Arc::new)
    }

    fn status(&self, id: &BlockId) -> Result<BlockStatus> {
        if self.verified.read().contains_key(id) {
            return Ok(BlockStatus::Verified);
        }
        if self.accepted.lock().contains(id) {
            return Ok(BlockStatus::Accepted);
        }
        match self.database.get_block(id) {
            Ok(_) => Ok(BlockStatus::Accepted),
            Err(e) if e.is_not_found() => Ok(BlockStatus::Unknown),
            Err(e) => Err(e),
        }
    }
}
