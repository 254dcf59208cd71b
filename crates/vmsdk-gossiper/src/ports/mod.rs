//! Gossip contracts

mod inbound;
mod outbound;

pub use inbound::Gossiper;
pub use outbound::AppSender;
