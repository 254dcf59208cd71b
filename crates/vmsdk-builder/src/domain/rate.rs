//! Rate predicate over the tip's rolling window.
//!
//! The decision depends only on the tip block and a clock reading, so every
//! node reaches the same answer without sharing limiter state.

use crate::ports::TipSnapshot;
use shared_types::Timestamp;

/// Decides whether one more block fits under the per-second target.
///
/// A projection within the window always counts the candidate in the newest
/// slot, so a target of 1 only permits building on a tip that has aged out
/// of the window entirely.
#[derive(Clone, Copy, Debug)]
pub struct RateLimiter {
    target_blocks_per_second: u64,
}

impl RateLimiter {
    /// Create a limiter for the given per-second target.
    pub fn new(target_blocks_per_second: u64) -> Self {
        Self {
            target_blocks_per_second,
        }
    }

    /// Per-second target.
    pub fn target(&self) -> u64 {
        self.target_blocks_per_second
    }

    /// True when no tip younger than the window can ever pass.
    pub fn stalls_busy_chain(&self) -> bool {
        self.target_blocks_per_second < 2
    }

    /// Roll the tip window to `now`, count the candidate, and compare the
    /// newest slot against the target.
    pub fn should_build(&self, tip: &TipSnapshot, now: Timestamp) -> bool {
        let elapsed = now.saturating_sub(tip.timestamp);
        tip.window
            .project(elapsed)
            .within_target(self.target_blocks_per_second)
    }
}
