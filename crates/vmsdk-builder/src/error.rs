//! Error types for the builder subsystem

use thiserror::Error;

/// Result type alias for builder operations
pub type Result<T> = std::result::Result<T, BuilderError>;

/// Errors that can occur while deciding whether to build
#[derive(Debug, Clone, Error)]
pub enum BuilderError {
    /// The preferred (tip) block could not be read
    #[error("Tip unavailable: {0}")]
    TipUnavailable(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BuilderError {
    /// Check if error is transient (the next cycle may succeed)
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TipUnavailable(_))
    }
}
