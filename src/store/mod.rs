//! Store adapters implementing the storage ports

pub mod memory;

pub use memory::{MemoryEntryStore, MemoryTenantStore};
