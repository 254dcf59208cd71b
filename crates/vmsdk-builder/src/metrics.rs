//! Metrics collection for the builder

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for build scheduling
#[derive(Debug, Default)]
pub struct BuilderMetrics {
    /// Signals delivered to the engine
    pub signals_sent: AtomicU64,

    /// Signals dropped because the engine had one pending or was gone
    pub signals_dropped: AtomicU64,

    /// Cycles skipped because a build happened too recently
    pub skipped_recent_build: AtomicU64,

    /// Cycles skipped because the mempool was empty
    pub skipped_empty_mempool: AtomicU64,

    /// Cycles suppressed by the rate window
    pub rate_limited: AtomicU64,

    /// Rate checks that failed and were treated as permitted
    pub rate_check_failures: AtomicU64,
}

impl BuilderMetrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one engine signal
    pub fn record_signal(&self, delivered: bool) {
        if delivered {
            self.signals_sent.fetch_add(1, Ordering::Relaxed);
        } else {
            self.signals_dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get signals delivered
    pub fn get_signals_sent(&self) -> u64 {
        self.signals_sent.load(Ordering::Relaxed)
    }

    /// Get signals dropped
    pub fn get_signals_dropped(&self) -> u64 {
        self.signals_dropped.load(Ordering::Relaxed)
    }

    /// Get rate check failures
    pub fn get_rate_check_failures(&self) -> u64 {
        self.rate_check_failures.load(Ordering::Relaxed)
    }
}
