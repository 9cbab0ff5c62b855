//! # Storage Adapters

pub mod rocksdb_adapter;

pub use rocksdb_adapter::RocksDbStore;
