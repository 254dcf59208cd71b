//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the block store requires from the host.

use crate::domain::Block;
use crate::error::Result;
use shared_types::BlockId;

/// Persistent storage for accepted blocks.
///
/// Production: a disk-backed store owned by the host VM.
/// Testing: `InMemoryBlockDatabase`.
pub trait BlockDatabase: Send + Sync {
    /// Read a block. Returns `ChainError::NotFound` when absent; any other
    /// error is a storage or decoding failure.
    fn get_block(&self, id: &BlockId) -> Result<Block>;

    /// Write a block.
    fn put_block(&self, block: &Block) -> Result<()>;

    /// Identifier of the last accepted block, if any has been recorded.
    fn last_accepted(&self) -> Result<Option<BlockId>>;

    /// Record the last accepted block.
    fn set_last_accepted(&self, id: &BlockId) -> Result<()>;
}

/// Downstream consumer of accepted blocks (mempool pruning, gossip cleanup).
///
/// Called from the accepted-block processor task, in acceptance order. The
/// block is already durable when a listener sees it.
pub trait AcceptedListener: Send + Sync {
    /// Handle one accepted block. Must not block for long. An error stops
    /// the processor.
    fn on_accepted(&self, block: &Block) -> Result<()>;
}
