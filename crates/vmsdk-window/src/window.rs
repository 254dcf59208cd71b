//! Rolling window arithmetic.
//!
//! Belongs in the domain layer: no I/O, no clock reads, no allocation.

use crate::error::{Result, WindowError};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::fmt;

/// Number of trailing seconds tracked by a window.
///
/// Network-wide constant: every block encodes exactly this many slots.
pub const WINDOW_SIZE: usize = 60;

/// Per-second block counts for the trailing [`WINDOW_SIZE`] seconds,
/// oldest first. The last slot is the second the window was computed for.
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    #[serde_as(as = "[_; WINDOW_SIZE]")]
    slots: [u64; WINDOW_SIZE],
}

impl Default for Window {
    fn default() -> Self {
        Self::zero()
    }
}

impl Window {
    /// An all-zero window.
    pub const fn zero() -> Self {
        Self {
            slots: [0; WINDOW_SIZE],
        }
    }

    /// Build a window from explicit slot values (oldest first).
    pub const fn from_slots(slots: [u64; WINDOW_SIZE]) -> Self {
        Self { slots }
    }

    /// Window with only the most recent slot set.
    pub fn with_last(count: u64) -> Self {
        let mut window = Self::zero();
        window.slots[WINDOW_SIZE - 1] = count;
        window
    }

    /// Slot values, oldest first.
    pub fn slots(&self) -> &[u64; WINDOW_SIZE] {
        &self.slots
    }

    /// Shift the window forward by `seconds`.
    ///
    /// The `seconds` oldest slots are dropped and the same number of zero
    /// slots is appended. Rolling by [`WINDOW_SIZE`] or more yields an
    /// all-zero window. Negative shifts are treated as zero: a tip stamped
    /// slightly in the future of the local clock belongs to "now".
    pub fn roll(&self, seconds: i64) -> Window {
        if seconds <= 0 {
            return *self;
        }
        let shift = seconds as u64;
        if shift >= WINDOW_SIZE as u64 {
            return Window::zero();
        }
        let shift = shift as usize;
        let mut rolled = Window::zero();
        rolled.slots[..WINDOW_SIZE - shift].copy_from_slice(&self.slots[shift..]);
        rolled
    }

    /// Add `delta` to the slot at `offset`, saturating at `u64::MAX`.
    pub fn update(&mut self, offset: usize, delta: u64) -> Result<()> {
        let slot = self
            .slots
            .get_mut(offset)
            .ok_or(WindowError::OffsetOutOfRange {
                offset,
                len: WINDOW_SIZE,
            })?;
        *slot = slot.saturating_add(delta);
        Ok(())
    }

    /// Count in the most recent slot.
    pub fn last(&self) -> u64 {
        self.slots[WINDOW_SIZE - 1]
    }

    /// Total count across the window.
    pub fn sum(&self) -> u64 {
        self.slots
            .iter()
            .fold(0u64, |acc, slot| acc.saturating_add(*slot))
    }

    /// True when every slot is zero.
    pub fn is_zero(&self) -> bool {
        self.slots.iter().all(|slot| *slot == 0)
    }

    /// Project this window `elapsed` seconds forward and count one more
    /// block in the newest slot.
    ///
    /// The increment only applies while `elapsed` is within the window span;
    /// past it the projection is all-zero. The newest slot of any projection
    /// within the span is therefore at least 1.
    pub fn project(&self, elapsed: i64) -> Window {
        let mut projected = self.roll(elapsed);
        if elapsed < WINDOW_SIZE as i64 {
            projected.slots[WINDOW_SIZE - 1] = projected.slots[WINDOW_SIZE - 1].saturating_add(1);
        }
        projected
    }

    /// Window a child block stamped `child_ts` must carry when its parent,
    /// stamped `parent_ts`, carries `self`.
    pub fn next_for_child(&self, parent_ts: i64, child_ts: i64) -> Result<Window> {
        if child_ts < parent_ts {
            return Err(WindowError::TimestampRegression {
                parent: parent_ts,
                child: child_ts,
            });
        }
        Ok(self.project(child_ts - parent_ts))
    }

    /// True when the newest slot is strictly below `target`.
    pub fn within_target(&self, target: u64) -> bool {
        self.last() < target
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only the populated tail is interesting in logs.
        let first = self
            .slots
            .iter()
            .position(|slot| *slot != 0)
            .unwrap_or(WINDOW_SIZE);
        f.debug_struct("Window")
            .field("sum", &self.sum())
            .field("tail", &&self.slots[first..])
            .finish()
    }
}
