//! State errors

use thiserror::Error;

/// Result type alias for state operations
pub type Result<T> = std::result::Result<T, StateError>;

/// Errors from a [`crate::Database`] or the overlay on top of it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// Key is absent (or removed in a pending change)
    #[error("Key not found: {key}")]
    NotFound {
        /// Hex-encoded key
        key: String,
    },

    /// Underlying store failure
    #[error("Database error: {0}")]
    Backend(String),

    /// Another commit on the same overlay has not finished
    #[error("Commit already in progress")]
    CommitInProgress,

    /// Rollback target is newer than the current journal
    #[error("Invalid checkpoint {checkpoint} (journal length {len})")]
    InvalidCheckpoint {
        /// Requested checkpoint
        checkpoint: usize,
        /// Current journal length
        len: usize,
    },
}

impl StateError {
    /// Not-found error for `key`
    pub fn not_found(key: &[u8]) -> Self {
        Self::NotFound {
            key: hex::encode(key),
        }
    }

    /// True for the not-found condition only
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
