//! # Envelope Broadcast & Dispatch
//!
//! Encoding happens once per broadcast; the first peer failure aborts the
//! send and bubbles to the caller, who may retry the whole proposal.

use tracing::debug;

use crate::domain::{GossipEnvelope, PeerMessage, TransportError};
use crate::node::Node;
use crate::ports::GossipHandler;

/// Send a gossip envelope to every connected peer.
///
/// Aborts on the first failing peer; partial delivery is acceptable because
/// the consensus layer re-broadcasts on its next round.
pub fn broadcast_to_network(node: &Node, envelope: &GossipEnvelope) -> Result<(), TransportError> {
    let payload = serde_json::to_vec(envelope)?;

    for peer in node.peers() {
        node.send_message(&peer, payload.clone())?;
    }

    Ok(())
}

/// Decode an inbound payload and hand the envelope to the handler.
///
/// Undecodable payloads are dropped with a debug log; a malformed peer must
/// not take the pump down.
pub fn handle_incoming(handler: &dyn GossipHandler, message: PeerMessage) {
    match serde_json::from_slice::<GossipEnvelope>(&message.payload) {
        Ok(envelope) => handler.handle_gossip(envelope),
        Err(err) => {
            debug!(from = %message.from, error = %err, "undecodable gossip payload dropped");
        }
    }
}
