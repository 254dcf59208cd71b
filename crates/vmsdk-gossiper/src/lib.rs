//! # Gossip Boundary
//!
//! The contract between a VM and whatever propagates its transactions.
//! The VM hands a [`Gossiper`] an [`AppSender`] when it starts, calls
//! [`Gossiper::trigger_gossip`] when new transactions arrive locally, and
//! forwards peer messages to [`Gossiper::handle_app_gossip`].
//!
//! [`NoopGossiper`] is provided for VMs that rely on the engine alone.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ports;

mod error;
mod noop;

pub use error::{GossipError, Result};
pub use noop::NoopGossiper;
pub use ports::{AppSender, Gossiper};
