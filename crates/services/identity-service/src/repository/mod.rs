//! Repository layer - credential store implementations.

pub mod entities;
mod memory_store;
mod sql_store;

pub use memory_store::MemoryCredentialStore;
pub use sql_store::SqlCredentialStore;
