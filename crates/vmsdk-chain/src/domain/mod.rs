//! Domain layer - pure block lifecycle logic
//!
//! - [`Block`] / [`BlockHeader`]: immutable block entity
//! - [`BlockStatus`]: lifecycle position reported by the store
//! - [`ChainRules`]: parent/child verification including the window check

mod block;
mod rules;

pub use block::{Block, BlockHeader, BlockStatus};
pub use rules::ChainRules;
