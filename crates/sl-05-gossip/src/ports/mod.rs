//! # Ports
//!
//! The transport a node sends through and the handler inbound envelopes are
//! dispatched to.

use crate::domain::{GossipEnvelope, TransportError};

/// Routes raw payloads between nodes.
pub trait Transport: Send + Sync {
    /// Deliver a payload from one node to another.
    fn send(&self, from: &str, to: &str, payload: Vec<u8>) -> Result<(), TransportError>;
}

/// Processes inbound gossip envelopes.
pub trait GossipHandler: Send + Sync {
    /// Handle one envelope. Implementations drop envelopes for topics they
    /// do not own.
    fn handle_gossip(&self, envelope: GossipEnvelope);
}
