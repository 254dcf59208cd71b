//! In-memory block database.
//!
//! Stores bincode-encoded headers keyed by block id, the same shape a
//! disk-backed store would hold. Counts reads so tests can tell which tier
//! served a lookup.

use crate::domain::Block;
use crate::error::{ChainError, Result};
use crate::ports::BlockDatabase;
use parking_lot::RwLock;
use shared_types::BlockId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// HashMap-backed [`BlockDatabase`]
#[derive(Default)]
pub struct InMemoryBlockDatabase {
    blocks: RwLock<HashMap<BlockId, Vec<u8>>>,
    last_accepted: RwLock<Option<BlockId>>,
    reads: AtomicU64,
    fail_writes: AtomicBool,
}

impl InMemoryBlockDatabase {
    /// Empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `get_block` calls served so far
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Number of stored blocks
    pub fn len(&self) -> usize {
        self.blocks.read().len()
    }

    /// True if no block is stored
    pub fn is_empty(&self) -> bool {
        self.blocks.read().is_empty()
    }

    /// Make every subsequent write fail with a storage error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(ChainError::Storage("database is read-only".into()));
        }
        Ok(())
    }
}

impl BlockDatabase for InMemoryBlockDatabase {
    fn get_block(&self, id: &BlockId) -> Result<Block> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        let blocks = self.blocks.read();
        let bytes = blocks.get(id).ok_or(ChainError::NotFound { id: *id })?;
        Block::from_bytes(bytes)
    }

    fn put_block(&self, block: &Block) -> Result<()> {
        self.check_writable()?;
        let bytes = block.to_bytes()?;
        self.blocks.write().insert(block.id(), bytes);
        Ok(())
    }

    fn last_accepted(&self) -> Result<Option<BlockId>> {
        Ok(*self.last_accepted.read())
    }

    fn set_last_accepted(&self, id: &BlockId) -> Result<()> {
        self.check_writable()?;
        *self.last_accepted.write() = Some(*id);
        Ok(())
    }
}
