//! # Gossip Domain Types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A raw payload delivered between peers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerMessage {
    pub from: String,
    pub payload: Vec<u8>,
}

/// The topic-tagged envelope shared via the gossip protocol.
///
/// Handlers are registered per topic; a handler silently drops envelopes
/// whose topic it does not own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GossipEnvelope {
    pub topic: String,
    pub payload: Value,
}

impl GossipEnvelope {
    /// Wrap a serializable payload under a topic.
    pub fn new<T: Serialize>(
        topic: impl Into<String>,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            topic: topic.into(),
            payload: serde_json::to_value(payload)?,
        })
    }
}

/// Errors from the transport layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The target peer is not in this node's peer set.
    #[error("peer {peer} not connected")]
    PeerNotConnected { peer: String },

    /// The transport has no route to the recipient.
    #[error("recipient {peer} unknown to transport")]
    RecipientUnknown { peer: String },

    /// A payload could not be encoded for the wire.
    #[error("gossip encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// The underlying transport failed.
    #[error("transport error: {message}")]
    Backend { message: String },
}
