//! # In-Memory Object Store
//!
//! Content-addressed map standing in for the external object store. Content
//! ids are truncated SHA-256 digests, deterministic for identical payloads.

use parking_lot::RwLock;
use serde_json::Value;
use shared_crypto::sha256_hex;
use std::collections::HashMap;

use crate::domain::errors::ObjectStoreError;
use crate::ports::outbound::ObjectStore;

/// In-memory content-addressed store.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    /// Whether the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

impl ObjectStore for MemoryObjectStore {
    fn upload_bytes(&self, data: &[u8]) -> Result<String, ObjectStoreError> {
        if data.is_empty() {
            return Err(ObjectStoreError::EmptyData);
        }

        let cid = sha256_hex(data)[..16].to_string();
        self.objects.write().insert(cid.clone(), data.to_vec());
        Ok(cid)
    }

    fn upload_json(&self, value: &Value) -> Result<String, ObjectStoreError> {
        let payload = serde_json::to_vec(value)?;
        self.upload_bytes(&payload)
    }

    fn fetch(&self, cid: &str) -> Result<Vec<u8>, ObjectStoreError> {
        self.objects
            .read()
            .get(cid)
            .cloned()
            .ok_or_else(|| ObjectStoreError::NotFound { cid: cid.into() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upload_fetch_round_trip() {
        let store = MemoryObjectStore::new();
        let cid = store.upload_bytes(b"payload").unwrap();
        assert_eq!(store.fetch(&cid).unwrap(), b"payload");
    }

    #[test]
    fn test_identical_content_same_cid() {
        let store = MemoryObjectStore::new();
        let a = store.upload_bytes(b"same").unwrap();
        let b = store.upload_bytes(b"same").unwrap();
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_empty_upload_rejected() {
        let store = MemoryObjectStore::new();
        assert!(matches!(
            store.upload_bytes(b""),
            Err(ObjectStoreError::EmptyData)
        ));
    }

    #[test]
    fn test_unknown_cid() {
        let store = MemoryObjectStore::new();
        assert!(matches!(
            store.fetch("nope"),
            Err(ObjectStoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_upload_json() {
        let store = MemoryObjectStore::new();
        let cid = store.upload_json(&json!({"k": "v"})).unwrap();
        let bytes = store.fetch(&cid).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["k"], "v");
    }
}
