//! # SHA-256 Hashing
//!
//! One-shot SHA-256 with the chain's standard rendering: 64 lowercase hex
//! characters. Block hashes, transaction ids, and pseudo content ids all use
//! this form.

use sha2::{Digest, Sha256};

/// Hash data with SHA-256 and render the digest as lowercase hex.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
