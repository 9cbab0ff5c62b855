//! # Ed25519 Message Signer
//!
//! Signs consensus digests with a local keypair and verifies peers against a
//! registered public-key directory. A sender with no registered key fails
//! verification, which drops the message upstream.

use parking_lot::RwLock;
use shared_crypto::Keypair;
use std::collections::HashMap;

use crate::ports::MessageSigner;

/// Keypair-backed signer with a sender-id → public-key directory.
///
/// Each validator holds its own keypair; the directory maps every cluster
/// member to the key its messages verify under. A single-process development
/// cluster may share one signer by registering each node id against the
/// shared public key.
pub struct Ed25519Signer {
    keypair: Keypair,
    directory: RwLock<HashMap<String, String>>,
}

impl Ed25519Signer {
    /// Create a signer around a keypair, with an empty directory.
    pub fn new(keypair: Keypair) -> Self {
        Self {
            keypair,
            directory: RwLock::new(HashMap::new()),
        }
    }

    /// The signer's own base64 public key.
    pub fn public_key_base64(&self) -> String {
        self.keypair.public_key_base64()
    }

    /// Register the public key a sender's messages verify under.
    pub fn register(&self, sender_id: impl Into<String>, public_key: impl Into<String>) {
        self.directory
            .write()
            .insert(sender_id.into(), public_key.into());
    }
}

impl MessageSigner for Ed25519Signer {
    fn sign(&self, data: &[u8]) -> Result<String, String> {
        Ok(self.keypair.sign(data))
    }

    fn verify(&self, sender_id: &str, data: &[u8], signature: &str) -> bool {
        let Some(public_key) = self.directory.read().get(sender_id).cloned() else {
            return false;
        };
        shared_crypto::verify(&public_key, data, signature).unwrap_or(false)
    }
}
