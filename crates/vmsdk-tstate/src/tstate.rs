//! # Transactional State
//!
//! [`TState`] buffers writes over a [`Database`] so a block's transactions
//! can read their own writes, undo a failed transaction, and flush the
//! survivors in one pass.
//!
//! ```text
//! get_value ──► pending changes ──miss──► flushing ──miss──► backing database
//! insert/remove ──► pending changes (+ journal entry)
//! rollback(cp) ──► replay journal back to cp
//! commit ──► move pending changes to flushing, write in key order
//! ```
//!
//! Writes made while a commit is in flight land in a fresh pending set and
//! are left for the next commit.

use crate::error::{Result, StateError};
use crate::ports::Database;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// A buffered write
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Change {
    /// Set the key to this value
    Insert(Vec<u8>),
    /// Delete the key
    Remove,
}

/// Position in the change journal, returned by [`TState::checkpoint`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Checkpoint(usize);

#[derive(Default)]
struct Overlay {
    changes: BTreeMap<Vec<u8>, Change>,
    // (key, change it replaced)
    journal: Vec<(Vec<u8>, Option<Change>)>,
    // Taken by an in-flight commit, not yet known to be in the backing store
    flushing: Option<BTreeMap<Vec<u8>, Change>>,
}

impl Overlay {
    fn record(&mut self, key: &[u8], change: Change) {
        let previous = self.changes.insert(key.to_vec(), change);
        self.journal.push((key.to_vec(), previous));
    }
}

/// Read-your-writes overlay over a backing [`Database`]
pub struct TState {
    backing: Arc<dyn Database>,
    overlay: Mutex<Overlay>,
}

impl TState {
    /// Empty overlay over `backing`
    pub fn new(backing: Arc<dyn Database>) -> Self {
        Self {
            backing,
            overlay: Mutex::new(Overlay::default()),
        }
    }

    /// Mark the current position for a later [`TState::rollback`]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.overlay.lock().journal.len())
    }

    /// Undo every change made after `checkpoint`
    pub fn rollback(&self, checkpoint: Checkpoint) -> Result<()> {
        let mut overlay = self.overlay.lock();
        let len = overlay.journal.len();
        if checkpoint.0 > len {
            return Err(StateError::InvalidCheckpoint {
                checkpoint: checkpoint.0,
                len,
            });
        }
        while overlay.journal.len() > checkpoint.0 {
            let Some((key, previous)) = overlay.journal.pop() else {
                break;
            };
            match previous {
                Some(change) => overlay.changes.insert(key, change),
                None => overlay.changes.remove(&key),
            };
        }
        debug!(undone = len - checkpoint.0, "rolled back state changes");
        Ok(())
    }

    /// Number of keys with a pending change
    pub fn pending_changes(&self) -> usize {
        self.overlay.lock().changes.len()
    }

    /// Write all pending changes to the backing database in key order.
    ///
    /// The pending set and journal are taken atomically when the commit
    /// starts. On error, changes that were not written go back to the
    /// pending set unless a newer write to the same key happened meanwhile,
    /// and may be committed again.
    pub async fn commit(&self) -> Result<usize> {
        let changes = {
            let mut overlay = self.overlay.lock();
            if overlay.flushing.is_some() {
                return Err(StateError::CommitInProgress);
            }
            let changes = std::mem::take(&mut overlay.changes);
            overlay.journal.clear();
            overlay.flushing = Some(changes.clone());
            changes
        };

        let mut written = 0;
        let mut failure = None;
        for (key, change) in &changes {
            let result = match change {
                Change::Insert(value) => self.backing.insert(key, value).await,
                Change::Remove => self.backing.remove(key).await,
            };
            if let Err(e) = result {
                failure = Some(e);
                break;
            }
            written += 1;
        }
        if let Some(e) = failure {
            self.restore_unwritten(changes.into_iter().skip(written));
            warn!(written, error = %e, "state commit failed");
            return Err(e);
        }

        self.overlay.lock().flushing = None;
        debug!(written, "committed state changes");
        Ok(written)
    }

    fn restore_unwritten(&self, unwritten: impl Iterator<Item = (Vec<u8>, Change)>) {
        let mut overlay = self.overlay.lock();
        overlay.flushing = None;
        for (key, change) in unwritten {
            overlay.changes.entry(key).or_insert(change);
        }
    }
}

#[async_trait]
impl Database for TState {
    async fn get_value(&self, key: &[u8]) -> Result<Vec<u8>> {
        let pending = {
            let overlay = self.overlay.lock();
            overlay.changes.get(key).cloned().or_else(|| {
                overlay
                    .flushing
                    .as_ref()
                    .and_then(|flushing| flushing.get(key).cloned())
            })
        };
        match pending {
            Some(Change::Insert(value)) => Ok(value),
            Some(Change::Remove) => Err(StateError::not_found(key)),
            None => self.backing.get_value(key).await,
        }
    }

    async fn insert(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.overlay
            .lock()
            .record(key, Change::Insert(value.to_vec()));
        Ok(())
    }

    async fn remove(&self, key: &[u8]) -> Result<()> {
        self.overlay.lock().record(key, Change::Remove);
        Ok(())
    }
}
