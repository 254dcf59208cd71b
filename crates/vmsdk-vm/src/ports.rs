//! Host-provided collaborators the VM depends on.

use async_trait::async_trait;

/// Pending-transaction pool. The VM only needs its depth.
#[async_trait]
pub trait Mempool: Send + Sync {
    /// Transactions waiting to be included
    async fn len(&self) -> usize;
}
