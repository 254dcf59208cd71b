//! Adapters for the VM's ports

mod mempool;

pub use mempool::CountingMempool;
