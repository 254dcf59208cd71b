//! # Database Port
//!
//! The minimal key-value contract every state backend satisfies.

use crate::error::Result;
use async_trait::async_trait;

/// Async key-value store.
///
/// Every method is cancel-safe: dropping the future before completion leaves
/// the store either unchanged or fully updated.
#[async_trait]
pub trait Database: Send + Sync {
    /// Read `key`. Absence is [`crate::StateError::NotFound`], never an empty value.
    async fn get_value(&self, key: &[u8]) -> Result<Vec<u8>>;

    /// Write `value` under `key`, replacing any previous value.
    async fn insert(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Delete `key`. Removing an absent key succeeds.
    async fn remove(&self, key: &[u8]) -> Result<()>;
}
