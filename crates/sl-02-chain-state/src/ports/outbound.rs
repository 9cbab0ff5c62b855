//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the chain-state service: durable block/state
//! persistence, the content-addressed object store used while minting, and
//! the injected clock that replaces any process-global notion of "now".

use serde_json::Value;
use shared_types::{Block, StateSnapshot};

use crate::domain::errors::{ObjectStoreError, StoreError};

/// Abstract interface for the durable block/state backend.
///
/// Production: RocksDB adapter in `node-runtime`.
/// Testing: `MemoryStore` in this crate's adapters.
///
/// Readers treat [`StoreError::NotFound`] as the stop sentinel when scanning
/// blocks sequentially from index zero.
pub trait BlockStateStore: Send + Sync {
    /// Persist a block under its index key.
    fn save_block(&self, block: &Block) -> Result<(), StoreError>;

    /// Fetch the block at `index`, or `NotFound`.
    fn get_block(&self, index: u64) -> Result<Block, StoreError>;

    /// Persist the latest registries snapshot.
    fn save_state(&self, state: &StateSnapshot) -> Result<(), StoreError>;

    /// Fetch the latest registries snapshot, or `NotFound`.
    fn get_state(&self) -> Result<StateSnapshot, StoreError>;
}

/// Storage key for a block: `block:{index}`, decimal, no padding.
pub fn block_key(index: u64) -> Vec<u8> {
    format!("block:{index}").into_bytes()
}

/// Storage key for the latest state snapshot: `state:latest`.
pub fn state_key() -> Vec<u8> {
    b"state:latest".to_vec()
}

/// Abstract interface for the external content-addressed object store.
///
/// Only the NFT mint pipeline uses this; the returned content ids are opaque
/// references embedded in mint records.
pub trait ObjectStore: Send + Sync {
    /// Store raw bytes, returning their content id.
    fn upload_bytes(&self, data: &[u8]) -> Result<String, ObjectStoreError>;

    /// Serialize a value as JSON and store it.
    fn upload_json(&self, value: &Value) -> Result<String, ObjectStoreError>;

    /// Retrieve the bytes for a content id.
    fn fetch(&self, cid: &str) -> Result<Vec<u8>, ObjectStoreError>;
}

/// Abstract interface for time (for testability).
///
/// Every block and transaction construction path takes a clock; nothing in
/// the core reads system time directly.
pub trait Clock: Send + Sync {
    /// Current unix timestamp in seconds.
    fn now_unix(&self) -> i64;
}

/// Default clock backed by system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

/// Clock pinned to a fixed instant, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_unix(&self) -> i64 {
        self.0
    }
}
