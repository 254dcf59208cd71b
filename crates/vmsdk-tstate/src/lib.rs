//! # Transactional State
//!
//! A minimal async key-value contract ([`Database`]) and [`TState`], an
//! overlay that gives transaction execution read-your-writes semantics with
//! checkpoint and rollback before anything reaches the backing store.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod ports;

mod error;
mod tstate;

pub use adapters::InMemoryDatabase;
pub use error::{Result, StateError};
pub use ports::Database;
pub use tstate::{Change, Checkpoint, TState};
