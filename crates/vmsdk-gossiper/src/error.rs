//! Gossip errors

use shared_types::NodeId;
use thiserror::Error;

/// Result type alias for gossip operations
pub type Result<T> = std::result::Result<T, GossipError>;

/// Errors surfaced by gossipers and app senders
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GossipError {
    /// The network layer refused the message
    #[error("Failed to send gossip: {0}")]
    Send(String),

    /// A peer sent something that does not decode
    #[error("Invalid gossip from {node}: {reason}")]
    InvalidPayload {
        /// Sending peer
        node: NodeId,
        /// Decoding failure
        reason: String,
    },
}
