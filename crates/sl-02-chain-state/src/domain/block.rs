//! # Block Construction & Hashing
//!
//! Deterministic block hashing over the canonical JSON form.

use shared_crypto::{hash_canonical, CryptoError};
use shared_types::{Block, Transaction};
use std::collections::BTreeMap;

/// Build a block ready to append to the chain.
///
/// The hash is computed immediately; validator signatures start empty and the
/// nonce is zero (there is no proof-of-work in this protocol).
pub fn build_block(
    index: u64,
    prev_hash: impl Into<String>,
    transactions: Vec<Transaction>,
    timestamp: i64,
) -> Result<Block, CryptoError> {
    let mut block = Block {
        index,
        timestamp,
        transactions,
        prev_hash: prev_hash.into(),
        hash: String::new(),
        validator_signatures: BTreeMap::new(),
        nonce: 0,
    };
    block.hash = calculate_hash(&block)?;
    Ok(block)
}

/// Deterministically hash the block fields.
///
/// The block is hashed with its own `hash` field blanked. Canonical encoding
/// sorts object keys at every level, so generic `Transaction.data` payloads
/// are normalized by the same step and a block reloaded from storage hashes
/// identically to the block that was persisted.
pub fn calculate_hash(block: &Block) -> Result<String, CryptoError> {
    let mut clone = block.clone();
    clone.hash.clear();
    hash_canonical(&clone)
}
