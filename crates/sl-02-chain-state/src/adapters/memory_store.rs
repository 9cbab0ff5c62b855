//! # In-Memory Block/State Store
//!
//! HashMap-backed `BlockStateStore` using the same byte-key layout as the
//! production backend, so key handling is exercised even in tests.

use parking_lot::RwLock;
use shared_types::{Block, StateSnapshot};
use std::collections::HashMap;

use crate::domain::errors::StoreError;
use crate::ports::outbound::{block_key, state_key, BlockStateStore};

/// In-memory key-value store for blocks and state.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records (blocks plus the state snapshot).
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl BlockStateStore for MemoryStore {
    fn save_block(&self, block: &Block) -> Result<(), StoreError> {
        let payload = serde_json::to_vec(block)?;
        self.entries.write().insert(block_key(block.index), payload);
        Ok(())
    }

    fn get_block(&self, index: u64) -> Result<Block, StoreError> {
        let entries = self.entries.read();
        let payload = entries.get(&block_key(index)).ok_or(StoreError::NotFound)?;
        Ok(serde_json::from_slice(payload)?)
    }

    fn save_state(&self, state: &StateSnapshot) -> Result<(), StoreError> {
        let payload = serde_json::to_vec(state)?;
        self.entries.write().insert(state_key(), payload);
        Ok(())
    }

    fn get_state(&self) -> Result<StateSnapshot, StoreError> {
        let entries = self.entries.read();
        let payload = entries.get(&state_key()).ok_or(StoreError::NotFound)?;
        Ok(serde_json::from_slice(payload)?)
    }
}
