//! Hexagonal architecture ports for the builder

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
