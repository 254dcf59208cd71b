//! # VM Glue
//!
//! Wires the block builder, the block lifecycle store, the accepted-block
//! processor and a gossiper into one [`Vm`] the consensus engine can drive.
//!
//! ```text
//!            ┌──────────── EngineMessage::PendingTxs ◄──── Builder loop
//!            ▼                                              ▲
//!   Engine ──build_block / verify / accept / reject──► Vm ──┤ BuilderVm
//!                                                      │    (tip, mempool, stop)
//!                                                      ▼
//!                                BlockStore ──accepted queue──► AcceptedProcessor ──► BlockDatabase
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod ports;

mod config;
mod error;
mod vm;

pub use adapters::CountingMempool;
pub use config::VmConfig;
pub use error::{Result, VmError};
pub use ports::Mempool;
pub use vm::Vm;
