//! # Chain Errors
//!
//! - `NotFound` is a distinct, expected condition: callers branch on it.
//! - Storage and codec failures propagate unchanged.
//! - `NotVerified` means the engine broke the verify-before-decide contract.

use shared_types::BlockId;
use thiserror::Error;

/// Result type alias for chain operations
pub type Result<T> = std::result::Result<T, ChainError>;

/// Errors raised by the block lifecycle store and its collaborators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// No tier (verified, cache, database) holds this block
    #[error("Block not found: {id}")]
    NotFound {
        /// Requested block
        id: BlockId,
    },

    /// Parent of a candidate block is unknown
    #[error("Parent {parent} of block {id} not found")]
    ParentNotFound {
        /// Candidate block
        id: BlockId,
        /// Missing parent
        parent: BlockId,
    },

    /// Candidate block breaks a chain rule
    #[error("Invalid block {id}: {reason}")]
    InvalidBlock {
        /// Candidate block
        id: BlockId,
        /// Rule that failed
        reason: String,
    },

    /// Candidate block was already accepted
    #[error("Block already accepted: {id}")]
    AlreadyAccepted {
        /// Accepted block
        id: BlockId,
    },

    /// Accept or reject called for a block that is not in the verified set
    #[error("Block {id} is not verified; accept/reject must follow verify")]
    NotVerified {
        /// Offending block
        id: BlockId,
    },

    /// Accepted-block queue is full; downstream processing cannot keep up
    #[error("Accepted queue full (capacity {capacity})")]
    AcceptedQueueFull {
        /// Configured capacity
        capacity: usize,
    },

    /// Accepted-block processor has shut down
    #[error("Accepted queue closed")]
    AcceptedQueueClosed,

    /// Persistent storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Encoding or decoding failure
    #[error("Codec error: {0}")]
    Codec(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Metrics registration failure
    #[error("Metrics error: {0}")]
    Metrics(String),
}

impl ChainError {
    /// True for the not-found condition only
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if error is a contract or configuration defect rather than a
    /// property of the input
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            Self::NotVerified { .. }
                | Self::AcceptedQueueFull { .. }
                | Self::AcceptedQueueClosed
                | Self::InvalidConfig(_)
        )
    }
}

impl From<bincode::Error> for ChainError {
    fn from(err: bincode::Error) -> Self {
        ChainError::Codec(err.to_string())
    }
}

impl From<prometheus::Error> for ChainError {
    fn from(err: prometheus::Error) -> Self {
        ChainError::Metrics(err.to_string())
    }
}
