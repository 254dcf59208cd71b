//! # Rolling Rate Window
//!
//! A fixed-length trailing histogram of per-second block counts. Every block
//! carries the window as of its own timestamp, so any node can recompute the
//! production rate from the chain tip alone.
//!
//! ```text
//!  oldest                                              newest ("now")
//!  ┌────┬────┬────┬─────────────────────────────┬────┬────┐
//!  │ s0 │ s1 │ s2 │            ...              │s58 │s59 │
//!  └────┴────┴────┴─────────────────────────────┴────┴────┘
//!  roll(n): drop n slots on the left, append n zero slots on the right
//! ```
//!
//! This crate is pure: no clocks, no I/O. Callers pass timestamps in.

#![warn(missing_docs)]

mod error;
mod window;

pub use error::{Result, WindowError};
pub use window::{Window, WINDOW_SIZE};
