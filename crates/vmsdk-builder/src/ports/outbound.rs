//! Outbound ports (driven side - SPI)

use crate::error::Result;
use async_trait::async_trait;
use shared_types::{EngineMessage, Timestamp};
use tokio::sync::{mpsc, watch};
use vmsdk_window::Window;

/// Port: capabilities the builder needs from its VM.
///
/// Logging goes through the `tracing` dispatcher rather than this port.
#[async_trait]
pub trait BuilderVm: Send + Sync {
    /// Inbound channel of the consensus engine.
    ///
    /// Sized for a single pending message; the builder only ever `try_send`s.
    fn engine_sender(&self) -> &mpsc::Sender<EngineMessage>;

    /// Number of transactions waiting in the mempool.
    async fn mempool_len(&self) -> usize;

    /// Timestamp and window of the block the next build would extend.
    async fn preferred_block(&self) -> Result<TipSnapshot>;

    /// Receiver that observes `true` once the VM is shutting down.
    fn stop_signal(&self) -> watch::Receiver<bool>;
}

/// Rate-relevant view of the preferred block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TipSnapshot {
    /// Block height
    pub height: u64,
    /// Block timestamp (unix seconds)
    pub timestamp: Timestamp,
    /// Rolling window carried by the block
    pub window: Window,
}
