//! Database adapters

mod memory;

pub use memory::InMemoryDatabase;
