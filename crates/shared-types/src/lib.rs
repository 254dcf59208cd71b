//! # Shared Types Crate
//!
//! Identifiers, engine messages and the wall-clock port used across the VM
//! SDK crates.
//!
//! ## Design Principles
//!
//! - **Content-derived identity**: a [`BlockId`] is the SHA-256 of the block's
//!   canonical encoding and is never assigned by hand outside tests.
//! - **Advisory engine messages**: [`EngineMessage`] values are hints to the
//!   consensus engine, never commands.

pub mod entities;
pub mod time;

pub use entities::*;
pub use time::{FixedTimeSource, SystemTimeSource, TimeSource};
