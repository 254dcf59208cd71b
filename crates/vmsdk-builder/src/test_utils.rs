//! In-memory [`BuilderVm`] double.
//!
//! Implements the same port the production VM does, with every input
//! settable from the test.

use crate::error::{BuilderError, Result};
use crate::ports::{BuilderVm, TipSnapshot};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::EngineMessage;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use vmsdk_window::Window;

/// Scriptable VM for builder tests
pub struct TestBuilderVm {
    engine_tx: mpsc::Sender<EngineMessage>,
    mempool_len: AtomicUsize,
    tip: Mutex<std::result::Result<TipSnapshot, String>>,
    tip_reads: AtomicU64,
    stop_tx: watch::Sender<bool>,
}

impl TestBuilderVm {
    /// Create a VM with an empty mempool and a genesis-like tip at `timestamp`.
    ///
    /// Returns the engine side of the signal channel alongside the VM.
    pub fn new(timestamp: i64) -> (Arc<Self>, mpsc::Receiver<EngineMessage>) {
        let (engine_tx, engine_rx) = mpsc::channel(1);
        let (stop_tx, _stop_rx) = watch::channel(false);
        let vm = Arc::new(Self {
            engine_tx,
            mempool_len: AtomicUsize::new(0),
            tip: Mutex::new(Ok(TipSnapshot {
                height: 0,
                timestamp,
                window: Window::zero(),
            })),
            tip_reads: AtomicU64::new(0),
            stop_tx,
        });
        (vm, engine_rx)
    }

    /// Set mempool depth
    pub fn set_mempool_len(&self, len: usize) {
        self.mempool_len.store(len, Ordering::SeqCst);
    }

    /// Replace the tip
    pub fn set_tip(&self, tip: TipSnapshot) {
        *self.tip.lock() = Ok(tip);
    }

    /// Make tip reads fail with `reason`
    pub fn fail_tip(&self, reason: &str) {
        *self.tip.lock() = Err(reason.to_string());
    }

    /// Number of tip reads so far
    pub fn tip_reads(&self) -> u64 {
        self.tip_reads.load(Ordering::SeqCst)
    }

    /// Fire the stop signal
    pub fn stop(&self) {
        self.stop_tx.send_replace(true);
    }
}

#[async_trait]
impl BuilderVm for TestBuilderVm {
    fn engine_sender(&self) -> &mpsc::Sender<EngineMessage> {
        &self.engine_tx
    }

    async fn mempool_len(&self) -> usize {
        self.mempool_len.load(Ordering::SeqCst)
    }

    async fn preferred_block(&self) -> Result<TipSnapshot> {
        self.tip_reads.fetch_add(1, Ordering::SeqCst);
        self.tip
            .lock()
            .clone()
            .map_err(BuilderError::TipUnavailable)
    }

    fn stop_signal(&self) -> watch::Receiver<bool> {
        self.stop_tx.subscribe()
    }
}
