//! # Ed25519 Signatures
//!
//! Twisted Edwards curve signatures with deterministic nonces. Keys and
//! signatures travel base64-encoded, both in transit and at rest; raw bytes
//! never appear in wire or storage formats.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use zeroize::Zeroize;

use crate::errors::CryptoError;

/// An Ed25519 keypair with base64 accessors.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Restore a keypair from a base64-encoded private key.
    pub fn from_private_base64(private_key: &str) -> Result<Self, CryptoError> {
        let bytes = BASE64
            .decode(private_key)
            .map_err(|_| CryptoError::InvalidPrivateKey)?;
        let seed: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self {
            signing_key: SigningKey::from_bytes(&seed),
        })
    }

    /// The base64-encoded public key.
    pub fn public_key_base64(&self) -> String {
        BASE64.encode(self.signing_key.verifying_key().to_bytes())
    }

    /// The base64-encoded private key.
    pub fn private_key_base64(&self) -> String {
        BASE64.encode(self.signing_key.to_bytes())
    }

    /// Sign a message, returning the base64-encoded signature.
    pub fn sign(&self, message: &[u8]) -> String {
        BASE64.encode(self.signing_key.sign(message).to_bytes())
    }
}

impl Drop for Keypair {
    fn drop(&mut self) {
        // Scrub secret key material before the allocation is reused.
        let mut bytes = self.signing_key.to_bytes();
        bytes.zeroize();
    }
}

/// Sign a message with a base64-encoded private key.
pub fn sign(private_key: &str, message: &[u8]) -> Result<String, CryptoError> {
    let keypair = Keypair::from_private_base64(private_key)?;
    Ok(keypair.sign(message))
}

/// Verify a base64-encoded signature against a base64-encoded public key.
///
/// Malformed keys or signatures are errors; a well-formed signature that does
/// not match the message is `Ok(false)`.
pub fn verify(public_key: &str, message: &[u8], signature: &str) -> Result<bool, CryptoError> {
    let key_bytes = BASE64
        .decode(public_key)
        .map_err(|_| CryptoError::InvalidPublicKey)?;
    let key_array: [u8; 32] = key_bytes
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::InvalidPublicKey)?;
    let verifying_key =
        VerifyingKey::from_bytes(&key_array).map_err(|_| CryptoError::InvalidPublicKey)?;

    let sig_bytes = BASE64
        .decode(signature)
        .map_err(|_| CryptoError::InvalidSignature)?;
    let sig_array: [u8; 64] = sig_bytes
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::InvalidSignature)?;
    let signature = Signature::from_bytes(&sig_array);

    Ok(verifying_key.verify(message, &signature).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify() {
        let keypair = Keypair::generate();
        let signature = keypair.sign(b"hello, ledger");

        let ok = verify(&keypair.public_key_base64(), b"hello, ledger", &signature).unwrap();
        assert!(ok);
    }

    #[test]
    fn test_wrong_message_fails() {
        let keypair = Keypair::generate();
        let signature = keypair.sign(b"message1");

        let ok = verify(&keypair.public_key_base64(), b"message2", &signature).unwrap();
        assert!(!ok);
    }

    #[test]
    fn test_wrong_key_fails() {
        let signer = Keypair::generate();
        let other = Keypair::generate();
        let signature = signer.sign(b"test");

        let ok = verify(&other.public_key_base64(), b"test", &signature).unwrap();
        assert!(!ok);
    }

    #[test]
    fn test_free_function_sign_matches_keypair() {
        let keypair = Keypair::generate();
        let private = keypair.private_key_base64();

        // Ed25519 nonces are deterministic, so both paths agree byte for byte.
        let direct = keypair.sign(b"deterministic");
        let via_key = sign(&private, b"deterministic").unwrap();
        assert_eq!(direct, via_key);
    }

    #[test]
    fn test_round_trip_private_key() {
        let original = Keypair::generate();
        let restored = Keypair::from_private_base64(&original.private_key_base64()).unwrap();
        assert_eq!(original.public_key_base64(), restored.public_key_base64());
    }

    #[test]
    fn test_malformed_inputs_are_errors() {
        let keypair = Keypair::generate();
        let signature = keypair.sign(b"x");

        assert!(verify("!!!", b"x", &signature).is_err());
        assert!(verify(&keypair.public_key_base64(), b"x", "not-base64!!!").is_err());
        assert!(Keypair::from_private_base64("too-short").is_err());
    }
}
