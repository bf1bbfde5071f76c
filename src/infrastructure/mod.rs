//! Adapters for the domain ports: payment stores and authorization processors.

pub mod in_memory;
pub mod processor;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
