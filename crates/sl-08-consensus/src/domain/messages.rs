//! # Protocol Messages
//!
//! The payload exchanged between validators during consensus. The signed
//! digest is the canonical JSON of the message with its `signature` field
//! cleared, so any two nodes derive identical bytes for the same message.

use serde::{Deserialize, Serialize};
use shared_crypto::CryptoError;
use shared_types::Block;
use std::fmt;

/// The stage of the PBFT protocol a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    #[serde(rename = "PRE_PREPARE")]
    PrePrepare,
    #[serde(rename = "PREPARE")]
    Prepare,
    #[serde(rename = "COMMIT")]
    Commit,
    /// Reserved for multi-view operation; currently ignored on receipt.
    #[serde(rename = "VIEW_CHANGE")]
    ViewChange,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageKind::PrePrepare => "PRE_PREPARE",
            MessageKind::Prepare => "PREPARE",
            MessageKind::Commit => "COMMIT",
            MessageKind::ViewChange => "VIEW_CHANGE",
        };
        f.write_str(name)
    }
}

/// A consensus message for one `(view, sequence)` slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub view: u64,
    pub sequence: u64,
    pub block: Block,
    pub sender_id: String,
    #[serde(default)]
    pub signature: String,
}

impl ConsensusMessage {
    /// The deterministic bytes a signer covers: canonical JSON with the
    /// signature field blanked.
    pub fn digest(&self) -> Result<Vec<u8>, CryptoError> {
        let mut clone = self.clone();
        clone.signature.clear();
        Ok(shared_crypto::canonical_json(&clone)?.into_bytes())
    }
}
