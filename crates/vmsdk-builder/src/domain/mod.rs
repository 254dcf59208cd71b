//! Domain layer - scheduling decisions
//!
//! - [`RateLimiter`]: rolling-window rate predicate, pure
//! - [`Completion`]: one-shot "loop exited" signal shared by all waiters

pub mod completion;
pub mod rate;

pub use completion::{Completion, CompletionGuard};
pub use rate::RateLimiter;
