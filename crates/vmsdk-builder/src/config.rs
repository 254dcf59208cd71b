//! Configuration types for the builder

use crate::error::{BuilderError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default target block rate. Must match every other node on the network:
/// the window encoding in block headers assumes one shared target.
pub const DEFAULT_TARGET_BLOCKS_PER_SECOND: u64 = 2;

/// Default minimum spacing between build attempts (milliseconds)
pub const DEFAULT_BUILD_INTERVAL_MS: u64 = 200;

/// Default period of the autonomous build check (milliseconds)
pub const DEFAULT_CHECK_INTERVAL_MS: u64 = 200;

/// Which builder variant a VM runs
#[derive(Copy, Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BuilderMode {
    /// Only builds when [`crate::Builder::trigger_build`] is called
    Manual,
    /// Periodic policy driven by mempool depth, spacing and rate
    #[default]
    Time,
}

/// Runtime configuration for block building
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct BuilderConfig {
    /// Builder variant
    pub mode: BuilderMode,

    /// Maximum blocks per second, counted by the tip's rolling window.
    ///
    /// The candidate is counted in the same slot as the tip, so with a
    /// target of 1 the time builder waits until the tip is older than the
    /// whole window. Use at least 2 for steady production.
    pub target_blocks_per_second: u64,

    /// Minimum time between two build attempts (milliseconds)
    pub build_interval_ms: u64,

    /// Period of the autonomous check loop (milliseconds)
    pub check_interval_ms: u64,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            mode: BuilderMode::Time,
            target_blocks_per_second: DEFAULT_TARGET_BLOCKS_PER_SECOND,
            build_interval_ms: DEFAULT_BUILD_INTERVAL_MS,
            check_interval_ms: DEFAULT_CHECK_INTERVAL_MS,
        }
    }
}

impl BuilderConfig {
    /// Config for a manually triggered builder
    pub fn manual() -> Self {
        Self {
            mode: BuilderMode::Manual,
            ..Self::default()
        }
    }

    /// Minimum spacing as a [`Duration`]
    pub fn build_interval(&self) -> Duration {
        Duration::from_millis(self.build_interval_ms)
    }

    /// Check period as a [`Duration`]
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }

    /// Reject values the time policy cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.mode == BuilderMode::Manual {
            return Ok(());
        }
        if self.target_blocks_per_second == 0 {
            return Err(BuilderError::InvalidConfig(
                "target_blocks_per_second must be positive".into(),
            ));
        }
        if self.check_interval_ms == 0 {
            return Err(BuilderError::InvalidConfig(
                "check_interval_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}
