//! Adapters for the ledger's ports: balance stores and identity directories.

pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod slack;
