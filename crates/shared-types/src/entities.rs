//! # Core Entities
//!
//! - **Identity**: [`Hash`], [`BlockId`], [`NodeId`]
//! - **Engine signalling**: [`EngineMessage`]
//! - **Time**: [`Timestamp`]

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

/// Unix timestamp in seconds. Signed so that clock skew between a tip and the
/// local clock can be represented without wrapping.
pub type Timestamp = i64;

/// Content-derived block identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct BlockId(pub Hash);

impl BlockId {
    /// The all-zero identifier, used as the parent of genesis.
    pub const EMPTY: BlockId = BlockId([0u8; 32]);

    /// Hash arbitrary bytes into an identifier.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        BlockId(out)
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }

    /// Deterministic identifier for tests and fixtures.
    pub fn from_seed(seed: u64) -> Self {
        Self::from_bytes(&seed.to_be_bytes())
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId({}..)", hex::encode(&self.0[..4]))
    }
}

/// Unique identifier for a node in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct NodeId(pub [u8; 32]);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0[..8]))
    }
}

/// Messages a VM sends to the consensus engine.
///
/// All variants are advisory. The engine may coalesce duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMessage {
    /// Transactions are pending; the engine should attempt to build a block.
    PendingTxs,
    /// State sync finished and the VM is ready for normal operation.
    StateSyncDone,
}
