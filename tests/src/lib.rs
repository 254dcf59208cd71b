//! # VM SDK Test Suite
//!
//! Cross-crate flows that no single crate can test alone.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs    # Shared VM harness
//!     ├── lifecycle.rs   # verify → accept/reject through the VM
//!     ├── scheduling.rs  # time builder against real chain state
//!     ├── gossip.rs      # gossiper start/stop through the VM
//!     ├── state.rs       # per-block state overlay
//!     └── shutdown.rs    # stop ordering and idempotence
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p vmsdk-tests
//! cargo bench -p vmsdk-tests
//! ```
