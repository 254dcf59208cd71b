//! # Outbound Port
//!
//! The network capability a gossiper is given when it starts.

use crate::error::Result;
use async_trait::async_trait;

/// Sends application-level gossip to peers
#[async_trait]
pub trait AppSender: Send + Sync {
    /// Broadcast `payload` to a sample of connected peers.
    async fn send_app_gossip(&self, payload: Vec<u8>) -> Result<()>;
}
