//! # Block Entity
//!
//! A [`Block`] is immutable once built. Its identifier is the SHA-256 of the
//! bincode encoding of its [`BlockHeader`], so two blocks with the same
//! header are the same block. Lifecycle status lives in the store, not here.

use crate::error::{ChainError, Result};
use serde::{Deserialize, Serialize};
use shared_types::{BlockId, Timestamp};
use std::fmt;
use vmsdk_window::Window;

/// Consensus-relevant block fields, in encoding order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Parent block identifier
    pub parent: BlockId,
    /// Height in the chain; genesis is 0
    pub height: u64,
    /// Unix seconds
    pub timestamp: Timestamp,
    /// Rolling per-second block counts as of `timestamp`
    pub window: Window,
    /// Price per unit of work in this block
    pub unit_price: u64,
    /// Units consumed by this block
    pub unit_cost: u64,
}

/// A block with its content-derived identifier.
#[derive(Clone, PartialEq, Eq)]
pub struct Block {
    id: BlockId,
    header: BlockHeader,
}

impl Block {
    /// Seal a header into a block, deriving its identifier.
    pub fn new(header: BlockHeader) -> Result<Self> {
        let bytes = bincode::serialize(&header)?;
        Ok(Self {
            id: BlockId::from_bytes(&bytes),
            header,
        })
    }

    /// Decode a block from its wire form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let header: BlockHeader = bincode::deserialize(bytes)?;
        Self::new(header)
    }

    /// Wire form: the bincode-encoded header.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&self.header)?)
    }

    /// Genesis block at `timestamp`.
    pub fn genesis(timestamp: Timestamp) -> Result<Self> {
        Self::new(BlockHeader {
            parent: BlockId::EMPTY,
            height: 0,
            timestamp,
            window: Window::zero(),
            unit_price: 0,
            unit_cost: 0,
        })
    }

    /// Build the child of `parent` stamped `timestamp`, carrying the window
    /// that verification will expect.
    pub fn child(
        parent: &Block,
        timestamp: Timestamp,
        unit_price: u64,
        unit_cost: u64,
    ) -> Result<Self> {
        let window = parent
            .window()
            .next_for_child(parent.timestamp(), timestamp)
            .map_err(|e| ChainError::InvalidBlock {
                id: parent.id(),
                reason: format!("cannot extend: {}", e),
            })?;
        Self::new(BlockHeader {
            parent: parent.id(),
            height: parent.height() + 1,
            timestamp,
            window,
            unit_price,
            unit_cost,
        })
    }

    /// Content-derived identifier
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Parent identifier
    pub fn parent(&self) -> BlockId {
        self.header.parent
    }

    /// Height
    pub fn height(&self) -> u64 {
        self.header.height
    }

    /// Timestamp (unix seconds)
    pub fn timestamp(&self) -> Timestamp {
        self.header.timestamp
    }

    /// Rolling window snapshot
    pub fn window(&self) -> &Window {
        &self.header.window
    }

    /// Unit price
    pub fn unit_price(&self) -> u64 {
        self.header.unit_price
    }

    /// Unit cost
    pub fn unit_cost(&self) -> u64 {
        self.header.unit_cost
    }

    /// Encoded header
    pub fn header(&self) -> &BlockHeader {
        &self.header
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("id", &self.id)
            .field("parent", &self.header.parent)
            .field("height", &self.header.height)
            .field("timestamp", &self.header.timestamp)
            .finish()
    }
}

/// Where a block is in its lifecycle, as seen by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockStatus {
    /// Never verified, or rejected and discarded
    Unknown,
    /// Passed verification, awaiting a decision
    Verified,
    /// Finalized
    Accepted,
    /// Discarded by the engine
    Rejected,
}

impl BlockStatus {
    /// True once the engine has decided on the block
    pub fn is_decided(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}
