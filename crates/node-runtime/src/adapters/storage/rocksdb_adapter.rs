//! # RocksDB Storage Adapter
//!
//! Durable implementation of the `BlockStateStore` port, using the same
//! `block:{index}` / `state:latest` key layout as the in-memory adapter so
//! either backend can replay the other's data.

use rocksdb::{Options, DB};
use shared_types::{Block, StateSnapshot};
use std::path::Path;

use sl_02_chain_state::{block_key, state_key, BlockStateStore, StoreError};

/// RocksDB-backed block/state store.
pub struct RocksDbStore {
    db: DB,
}

impl RocksDbStore {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let mut options = Options::default();
        options.create_if_missing(true);

        let db = DB::open(&options, path).map_err(|err| StoreError::Backend {
            message: err.to_string(),
        })?;

        Ok(Self { db })
    }

    fn put(&self, key: Vec<u8>, value: Vec<u8>) -> Result<(), StoreError> {
        self.db.put(key, value).map_err(|err| StoreError::Backend {
            message: err.to_string(),
        })
    }

    fn get(&self, key: Vec<u8>) -> Result<Option<Vec<u8>>, StoreError> {
        self.db.get(key).map_err(|err| StoreError::Backend {
            message: err.to_string(),
        })
    }
}

impl BlockStateStore for RocksDbStore {
    fn save_block(&self, block: &Block) -> Result<(), StoreError> {
        let payload = serde_json::to_vec(block)?;
        self.put(block_key(block.index), payload)
    }

    fn get_block(&self, index: u64) -> Result<Block, StoreError> {
        let payload = self.get(block_key(index))?.ok_or(StoreError::NotFound)?;
        Ok(serde_json::from_slice(&payload)?)
    }

    fn save_state(&self, state: &StateSnapshot) -> Result<(), StoreError> {
        let payload = serde_json::to_vec(state)?;
        self.put(state_key(), payload)
    }

    fn get_state(&self) -> Result<StateSnapshot, StoreError> {
        let payload = self.get(state_key())?.ok_or(StoreError::NotFound)?;
        Ok(serde_json::from_slice(&payload)?)
    }
}
