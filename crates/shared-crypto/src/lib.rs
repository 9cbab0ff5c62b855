//! # Shared Crypto - Hashing & Signature Primitives
//!
//! Cryptographic building blocks for the storytelling ledger:
//!
//! - SHA-256 digests rendered as lowercase hex (the chain's hash form)
//! - Canonical JSON encoding, the single mechanism behind every on-chain hash
//! - Ed25519 signing and verification with base64 key/signature transport
//!
//! ## Canonical JSON
//!
//! Any structured value that participates in a hash is first routed through
//! `serde_json::Value`, which stores object members in sorted order and
//! normalizes number representation. Encoding that value with no
//! insignificant whitespace yields one stable byte form regardless of how the
//! input was produced or how many persistence round trips it survived.

pub mod canonical;
pub mod errors;
pub mod hashing;
pub mod signatures;

pub use canonical::{canonical_json, hash_canonical};
pub use errors::CryptoError;
pub use hashing::sha256_hex;
pub use signatures::{sign, verify, Keypair};
