//! Error types for window arithmetic

use thiserror::Error;

/// Result type alias for window operations
pub type Result<T> = std::result::Result<T, WindowError>;

/// Errors that can occur while manipulating a [`crate::Window`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// Slot offset beyond the end of the window
    #[error("Slot offset {offset} out of range for window of length {len}")]
    OffsetOutOfRange {
        /// Requested offset
        offset: usize,
        /// Window length
        len: usize,
    },

    /// Child timestamp precedes its parent
    #[error("Timestamp regression: child {child} < parent {parent}")]
    TimestampRegression {
        /// Parent timestamp (seconds)
        parent: i64,
        /// Child timestamp (seconds)
        child: i64,
    },
}
