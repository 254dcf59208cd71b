//! Configuration for the block lifecycle store

use crate::error::{ChainError, Result};
use serde::{Deserialize, Serialize};

/// Default number of accepted blocks kept in memory
pub const DEFAULT_ACCEPTED_CACHE_CAPACITY: usize = 128;

/// Default depth of the accepted-block queue
pub const DEFAULT_ACCEPTED_QUEUE_CAPACITY: usize = 1024;

/// Default tolerance for block timestamps ahead of local time (seconds)
pub const DEFAULT_MAX_FUTURE_DRIFT_SECS: i64 = 10;

/// Block store configuration
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChainConfig {
    /// Accepted blocks retained in the LRU cache
    pub accepted_cache_capacity: usize,

    /// Accepted blocks that may wait for the processor before `accept` fails
    pub accepted_queue_capacity: usize,

    /// Maximum seconds a block timestamp may lead local time
    pub max_future_drift_secs: i64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            accepted_cache_capacity: DEFAULT_ACCEPTED_CACHE_CAPACITY,
            accepted_queue_capacity: DEFAULT_ACCEPTED_QUEUE_CAPACITY,
            max_future_drift_secs: DEFAULT_MAX_FUTURE_DRIFT_SECS,
        }
    }
}

impl ChainConfig {
    /// Reject capacities the store cannot be built with
    pub fn validate(&self) -> Result<()> {
        if self.accepted_cache_capacity == 0 {
            return Err(ChainError::InvalidConfig(
                "accepted_cache_capacity must be > 0".into(),
            ));
        }
        if self.accepted_queue_capacity == 0 {
            return Err(ChainError::InvalidConfig(
                "accepted_queue_capacity must be > 0".into(),
            ));
        }
        if self.max_future_drift_secs < 0 {
            return Err(ChainError::InvalidConfig(
                "max_future_drift_secs must be >= 0".into(),
            ));
        }
        Ok(())
    }
}
