//! # Block Lifecycle Store
//!
//! Tracks blocks through `Unknown → Verified → {Accepted | Rejected}` while
//! bounding memory:
//!
//! - verified blocks live in an unbounded map until the engine decides
//! - accepted blocks go to a fixed-size LRU cache and a bounded queue
//! - the [`AcceptedProcessor`] drains that queue into the [`BlockDatabase`]
//!
//! ## Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Service: BlockStore, AcceptedProcessor             │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Ports                                              │
//! │  - Inbound: BlockLifecycleApi                       │
//! │  - Outbound: BlockDatabase, AcceptedListener        │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain: Block, BlockHeader, BlockStatus, ChainRules│
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure semantics
//!
//! A full accepted queue is an operational alarm, not a drop: `accept`
//! returns [`ChainError::AcceptedQueueFull`] after logging at error level.
//! Accepting or rejecting a block that was never verified returns
//! [`ChainError::NotVerified`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

mod config;
mod error;
mod metrics;

pub use adapters::InMemoryBlockDatabase;
pub use config::{
    ChainConfig, DEFAULT_ACCEPTED_CACHE_CAPACITY, DEFAULT_ACCEPTED_QUEUE_CAPACITY,
    DEFAULT_MAX_FUTURE_DRIFT_SECS,
};
pub use domain::{Block, BlockHeader, BlockStatus, ChainRules};
pub use error::{ChainError, Result};
pub use metrics::ChainMetrics;
pub use ports::{AcceptedListener, BlockDatabase, BlockLifecycleApi};
pub use service::{AcceptedProcessor, AcceptedReceiver, BlockStore};
