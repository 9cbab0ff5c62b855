//! # Canonical JSON
//!
//! The deterministic JSON encoding used for every on-chain hash.
//!
//! Serializing through `serde_json::Value` collapses object-key order (the
//! map is sorted) and numeric representation to a single form, so a value
//! that has been persisted, reloaded, or rebuilt from a different field order
//! hashes identically. This is the same normalization the chain applies to
//! generic `Transaction.data` payloads before a block is hashed.

use serde::Serialize;

use crate::errors::CryptoError;
use crate::hashing::sha256_hex;

/// Encode a value as canonical JSON: sorted object keys, standard number
/// formatting, no insignificant whitespace.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, CryptoError> {
    let normalized = serde_json::to_value(value)?;
    Ok(normalized.to_string())
}

/// SHA-256 hex digest of a value's canonical JSON encoding.
///
/// This is the transaction-id function: `tx_id = hash_canonical(payload)`.
pub fn hash_canonical<T: Serialize>(value: &T) -> Result<String, CryptoError> {
    Ok(sha256_hex(canonical_json(value)?.as_bytes()))
}
