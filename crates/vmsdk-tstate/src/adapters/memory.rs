//! In-memory [`Database`] for tests and ephemeral VMs.

use crate::error::{Result, StateError};
use crate::ports::Database;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// BTreeMap-backed key-value store
#[derive(Default)]
pub struct InMemoryDatabase {
    data: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl InMemoryDatabase {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// True if no key is stored
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

#[async_trait]
impl Database for InMemoryDatabase {
    async fn get_value(&self, key: &[u8]) -> Result<Vec<u8>> {
        self.data
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StateError::not_found(key))
    }

    async fn insert(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.data.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    async fn remove(&self, key: &[u8]) -> Result<()> {
        self.data.write().remove(key);
        Ok(())
    }
}
