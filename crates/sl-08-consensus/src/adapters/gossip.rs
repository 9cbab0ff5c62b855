//! # Gossip Bridge
//!
//! Adapts a gossip node to the consensus network port and feeds inbound
//! consensus envelopes into the PBFT handler. Envelopes for other topics and
//! undecodable payloads are silently dropped.

use std::sync::Arc;
use tracing::debug;

use sl_05_gossip::{broadcast_to_network, GossipEnvelope, GossipHandler, Node, TransportError};

use crate::domain::ConsensusMessage;
use crate::node::PbftNode;
use crate::ports::ConsensusNetwork;

/// The gossip topic consensus messages ride under.
pub const CONSENSUS_TOPIC: &str = "consensus/pbft";

/// A gossip node speaking the consensus network port.
pub struct GossipConsensusNetwork {
    node: Arc<Node>,
}

impl GossipConsensusNetwork {
    /// Wrap a gossip node for use by a PBFT node.
    pub fn new(node: Arc<Node>) -> Self {
        Self { node }
    }
}

impl ConsensusNetwork for GossipConsensusNetwork {
    fn broadcast(&self, _sender: &str, message: &ConsensusMessage) -> Result<(), TransportError> {
        let envelope = GossipEnvelope::new(CONSENSUS_TOPIC, message)?;
        broadcast_to_network(&self.node, &envelope)
    }

    fn send(
        &self,
        _sender: &str,
        recipient: &str,
        message: &ConsensusMessage,
    ) -> Result<(), TransportError> {
        let envelope = GossipEnvelope::new(CONSENSUS_TOPIC, message)?;
        self.node
            .send_message(recipient, serde_json::to_vec(&envelope)?)
    }
}

/// Forwards consensus gossip into a PBFT node.
pub struct PbftGossipHandler {
    node: Arc<PbftNode>,
}

impl PbftGossipHandler {
    /// Create a handler feeding messages to `node`.
    pub fn new(node: Arc<PbftNode>) -> Self {
        Self { node }
    }
}

impl GossipHandler for PbftGossipHandler {
    fn handle_gossip(&self, envelope: GossipEnvelope) {
        if envelope.topic != CONSENSUS_TOPIC {
            return;
        }

        match serde_json::from_value::<ConsensusMessage>(envelope.payload) {
            Ok(message) => self.node.handle_message(message),
            Err(err) => {
                debug!(node = %self.node.id(), error = %err, "undecodable consensus payload dropped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageKind;
    use crate::node::PbftConfig;
    use crate::ports::BlockBuilder;
    use crate::domain::ConsensusError;
    use serde_json::json;
    use shared_types::{Block, Transaction};
    use sl_05_gossip::InMemoryTransport;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubBuilder;

    impl BlockBuilder for StubBuilder {
        fn build_block(&self, transactions: Vec<Transaction>) -> Result<Block, ConsensusError> {
            Ok(sl_02_chain_state::build_block(1, "h", transactions, 1)?)
        }
    }

    fn handler_with_counter() -> (PbftGossipHandler, Arc<AtomicUsize>) {
        let transport = Arc::new(InMemoryTransport::new());
        let gossip_node = Arc::new(Node::new("n1", transport));
        let fired = Arc::new(AtomicUsize::new(0));
        let count = Arc::clone(&fired);

        let node = Arc::new(
            PbftNode::new(PbftConfig {
                id: "n1".into(),
                peers: vec!["n1".into()],
                fault_tolerance: 0,
                network: Arc::new(GossipConsensusNetwork::new(gossip_node)),
                signer: None,
                builder: Arc::new(StubBuilder),
                finalize: Arc::new(move |_| {
                    count.fetch_add(1, Ordering::SeqCst);
                }),
            })
            .unwrap(),
        );

        (PbftGossipHandler::new(node), fired)
    }

    fn pre_prepare_envelope() -> GossipEnvelope {
        let block = sl_02_chain_state::build_block(1, "h", Vec::new(), 1).unwrap();
        let message = ConsensusMessage {
            kind: MessageKind::PrePrepare,
            view: 0,
            sequence: 1,
            block,
            sender_id: "n2".into(),
            signature: String::new(),
        };
        GossipEnvelope::new(CONSENSUS_TOPIC, &message).unwrap()
    }

    #[tokio::test]
    async fn test_consensus_topic_dispatched() {
        let (handler, fired) = handler_with_counter();
        handler.handle_gossip(pre_prepare_envelope());
        // A single-node cluster completes the round from one pre-prepare.
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_foreign_topic_ignored() {
        let (handler, fired) = handler_with_counter();
        let mut envelope = pre_prepare_envelope();
        envelope.topic = "blocks/sync".into();

        handler.handle_gossip(envelope);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_undecodable_payload_ignored() {
        let (handler, fired) = handler_with_counter();
        let envelope = GossipEnvelope {
            topic: CONSENSUS_TOPIC.into(),
            payload: json!({"not": "a message"}),
        };

        handler.handle_gossip(envelope);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
