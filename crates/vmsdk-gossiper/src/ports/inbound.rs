//! # Inbound Port
//!
//! What the VM calls on its gossiper.

use super::outbound::AppSender;
use crate::error::Result;
use async_trait::async_trait;
use shared_types::NodeId;
use std::sync::Arc;

/// Transaction propagation driven by the VM.
///
/// Cancellation is the stop signal the implementation was constructed with.
/// Every method is cancel-safe at its await points.
#[async_trait]
pub trait Gossiper: Send + Sync {
    /// Start gossiping through `sender`; returns once stopped.
    async fn run(&self, sender: Arc<dyn AppSender>);

    /// Push local pending transactions to peers now.
    async fn trigger_gossip(&self) -> Result<()>;

    /// Handle a gossip message from `node_id`.
    async fn handle_app_gossip(&self, node_id: NodeId, payload: Vec<u8>) -> Result<()>;

    /// Wait until `run` has exited.
    async fn done(&self);
}
