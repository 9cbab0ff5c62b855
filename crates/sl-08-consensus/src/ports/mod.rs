//! # Ports
//!
//! Dependencies a PBFT node requires: the message network, an optional
//! message signer, a block builder bound to the chain head, and the finalize
//! callback fired once a sequence commits.

use shared_types::{Block, Transaction};
use sl_05_gossip::TransportError;
use std::sync::Arc;

use crate::domain::{ConsensusError, ConsensusMessage};

/// The transport consensus messages ride on.
pub trait ConsensusNetwork: Send + Sync {
    /// Broadcast a message to every peer.
    fn broadcast(&self, sender: &str, message: &ConsensusMessage) -> Result<(), TransportError>;

    /// Deliver a message to a single peer.
    fn send(
        &self,
        sender: &str,
        recipient: &str,
        message: &ConsensusMessage,
    ) -> Result<(), TransportError>;
}

/// Signs and verifies consensus messages.
///
/// When no signer is configured the protocol runs unsigned (development
/// mode); when one is configured, a present-but-invalid signature causes the
/// message to be dropped.
pub trait MessageSigner: Send + Sync {
    /// Sign a message digest, returning the transport-encoded signature.
    fn sign(&self, data: &[u8]) -> Result<String, String>;

    /// Verify a digest signature attributed to `sender_id`.
    fn verify(&self, sender_id: &str, data: &[u8], signature: &str) -> bool;
}

/// Builds a candidate block from the provided transactions, linked to the
/// current chain head.
pub trait BlockBuilder: Send + Sync {
    fn build_block(&self, transactions: Vec<Transaction>) -> Result<Block, ConsensusError>;
}

/// Invoked exactly once per committed sequence, with the node's lock
/// released.
pub type Finalizer = Arc<dyn Fn(Block) + Send + Sync>;
