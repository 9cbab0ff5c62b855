//! # Crypto Errors
//!
//! Error types shared across the hashing and signature modules.

use thiserror::Error;

/// Errors from cryptographic operations.
///
/// A structurally invalid key or signature is an error; a well-formed
/// signature that simply does not verify is reported as `Ok(false)` by the
/// verification functions, not as an error.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Public key bytes failed base64 decoding or are not a valid point.
    #[error("invalid ed25519 public key")]
    InvalidPublicKey,

    /// Private key bytes failed base64 decoding or have the wrong length.
    #[error("invalid ed25519 private key")]
    InvalidPrivateKey,

    /// Signature bytes failed base64 decoding or have the wrong length.
    #[error("invalid ed25519 signature encoding")]
    InvalidSignature,

    /// A value could not be serialized for canonical hashing.
    #[error("canonical serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
