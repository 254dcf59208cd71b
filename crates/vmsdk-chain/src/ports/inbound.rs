//! # Inbound Ports (Driving Ports)
//!
//! The surface the consensus engine and read paths call.

use crate::domain::{Block, BlockStatus};
use crate::error::Result;
use shared_types::BlockId;
use std::sync::Arc;

/// Block lifecycle API.
///
/// The engine is the sole caller of `verify`, `accept` and `reject` and
/// serializes those calls itself. `get_block` and `status` may be called
/// concurrently from any thread.
pub trait BlockLifecycleApi: Send + Sync {
    /// Validate `block` against its parent and record it as verified.
    fn verify(&self, block: Block) -> Result<Arc<Block>>;

    /// Finalize a verified block.
    fn accept(&self, id: &BlockId) -> Result<Arc<Block>>;

    /// Discard a verified block.
    fn reject(&self, id: &BlockId) -> Result<Arc<Block>>;

    /// Look a block up: verified set, then accepted cache, then database.
    fn get_block(&self, id: &BlockId) -> Result<Arc<Block>>;

    /// Lifecycle position of `id`.
    fn status(&self, id: &BlockId) -> Result<BlockStatus>;
}
