//! VM errors

use thiserror::Error;
use vmsdk_builder::BuilderError;
use vmsdk_chain::ChainError;
use vmsdk_gossiper::GossipError;

/// Result type alias for VM operations
pub type Result<T> = std::result::Result<T, VmError>;

/// Errors surfaced by the VM to its host
#[derive(Debug, Error)]
pub enum VmError {
    /// Block lifecycle or storage failure
    #[error(transparent)]
    Chain(#[from] ChainError),

    /// Builder construction failure
    #[error(transparent)]
    Builder(#[from] BuilderError),

    /// Gossip failure
    #[error(transparent)]
    Gossip(#[from] GossipError),

    /// Configuration could not be parsed or is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// `start` called twice
    #[error("VM already started")]
    AlreadyStarted,

    /// Operation needs the background tasks `start` launches
    #[error("VM not started")]
    NotStarted,

    /// A background task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(String),
}

impl VmError {
    /// True if the underlying block lookup missed every tier
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Chain(e) if e.is_not_found())
    }
}
