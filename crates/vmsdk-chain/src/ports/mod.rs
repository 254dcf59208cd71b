//! Port traits (inbound API, outbound SPI)

pub mod inbound;
pub mod outbound;

pub use inbound::BlockLifecycleApi;
pub use outbound::{AcceptedListener, BlockDatabase};
