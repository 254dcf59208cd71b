//! Service layer: the block store and its queue consumer

mod processor;
mod store;

pub use processor::AcceptedProcessor;
pub use store::{AcceptedReceiver, BlockStore};
