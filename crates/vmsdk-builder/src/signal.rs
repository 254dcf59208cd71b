//! Non-blocking engine notification shared by both builder variants.

use crate::metrics::BuilderMetrics;
use shared_types::EngineMessage;
use tokio::sync::mpsc::{error::TrySendError, Sender};
use tracing::debug;

/// Offer `PendingTxs` to the engine. Returns whether it was delivered.
///
/// A full channel means the engine has not drained the previous signal yet,
/// which already says the same thing.
pub(crate) fn notify_pending_txs(sender: &Sender<EngineMessage>, metrics: &BuilderMetrics) -> bool {
    let delivered = match sender.try_send(EngineMessage::PendingTxs) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            debug!("dropping message to consensus engine");
            false
        }
        Err(TrySendError::Closed(_)) => {
            debug!("consensus engine channel closed, dropping message");
            false
        }
    };
    metrics.record_signal(delivered);
    delivered
}
