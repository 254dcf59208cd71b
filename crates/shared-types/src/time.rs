//! Wall-clock port.
//!
//! Production uses [`SystemTimeSource`]; tests pin time with
//! [`FixedTimeSource`] so rate and drift checks are deterministic.

use crate::Timestamp;
use std::sync::atomic::{AtomicI64, Ordering};

/// Source of unix time in seconds.
pub trait TimeSource: Send + Sync {
    /// Current unix time in seconds.
    fn now(&self) -> Timestamp;
}

/// Default time source using system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as Timestamp)
            .unwrap_or(0)
    }
}

/// Time source that only moves when told to.
#[derive(Debug, Default)]
pub struct FixedTimeSource {
    now: AtomicI64,
}

impl FixedTimeSource {
    /// Pin the clock at `now`.
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    /// Move the clock to `now`.
    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// Move the clock forward by `seconds`.
    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}
