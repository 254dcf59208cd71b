//! Verification rules for a candidate block against its parent.
//!
//! Pure: the caller supplies the parent and the current time.

use super::block::Block;
use crate::error::{ChainError, Result};
use shared_types::Timestamp;

/// Chain rules applied at verify time
#[derive(Clone, Copy, Debug)]
pub struct ChainRules {
    max_future_drift_secs: i64,
}

impl ChainRules {
    /// Rules allowing blocks up to `max_future_drift_secs` ahead of local time
    pub fn new(max_future_drift_secs: i64) -> Self {
        Self {
            max_future_drift_secs,
        }
    }

    /// Check `child` against `parent` at local time `now`.
    pub fn verify_child(&self, parent: &Block, child: &Block, now: Timestamp) -> Result<()> {
        let invalid = |reason: String| ChainError::InvalidBlock {
            id: child.id(),
            reason,
        };

        if child.parent() != parent.id() {
            return Err(invalid(format!(
                "parent mismatch: expected {}, got {}",
                parent.id(),
                child.parent()
            )));
        }
        if child.height() != parent.height() + 1 {
            return Err(invalid(format!(
                "height {} does not follow parent height {}",
                child.height(),
                parent.height()
            )));
        }
        if child.timestamp() < parent.timestamp() {
            return Err(invalid(format!(
                "timestamp {} precedes parent timestamp {}",
                child.timestamp(),
                parent.timestamp()
            )));
        }
        if child.timestamp() > now.saturating_add(self.max_future_drift_secs) {
            return Err(invalid(format!(
                "timestamp {} too far ahead of local time {}",
                child.timestamp(),
                now
            )));
        }

        let expected = parent
            .window()
            .next_for_child(parent.timestamp(), child.timestamp())
            .map_err(|e| invalid(e.to_string()))?;
        if &expected != child.window() {
            return Err(invalid(format!(
                "window mismatch: expected last slot {}, got {}",
                expected.last(),
                child.window().last()
            )));
        }
        Ok(())
    }
}
