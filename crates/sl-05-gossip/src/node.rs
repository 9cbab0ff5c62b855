//! # Peer Node
//!
//! A peer in the validator network: an id, a connected-peer set, and a
//! bounded inbound queue. The queue is lossy by design; consensus retries on
//! the next proposal rather than applying backpressure to remote peers.

use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

use crate::domain::{PeerMessage, TransportError};
use crate::ports::Transport;
use crate::INBOUND_QUEUE_CAPACITY;

/// A peer in the P2P network.
pub struct Node {
    id: String,
    transport: Arc<dyn Transport>,
    peers: RwLock<BTreeSet<String>>,
    inbound_tx: mpsc::Sender<PeerMessage>,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<PeerMessage>>,
}

impl Node {
    /// Create a node with the provided id and transport.
    pub fn new(id: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_QUEUE_CAPACITY);
        Self {
            id: id.into(),
            transport,
            peers: RwLock::new(BTreeSet::new()),
            inbound_tx,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
        }
    }

    /// The node identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Register a peer with this node.
    pub fn connect_to_peer(&self, peer_id: impl Into<String>) {
        self.peers.write().insert(peer_id.into());
    }

    /// Add bootstrap nodes to the peer set, skipping self and blanks.
    pub fn discover_peers(&self, bootstrap: &[String]) {
        let mut peers = self.peers.write();
        for peer in bootstrap {
            if peer.is_empty() || *peer == self.id {
                continue;
            }
            peers.insert(peer.clone());
        }
    }

    /// The connected peer ids, in stable order.
    pub fn peers(&self) -> Vec<String> {
        self.peers.read().iter().cloned().collect()
    }

    /// Send a payload to a connected peer via the transport.
    pub fn send_message(&self, peer_id: &str, payload: Vec<u8>) -> Result<(), TransportError> {
        if !self.peers.read().contains(peer_id) {
            return Err(TransportError::PeerNotConnected {
                peer: peer_id.to_string(),
            });
        }

        self.transport.send(&self.id, peer_id, payload)
    }

    /// Receive the next inbound message; `None` once the node's mailbox is
    /// closed.
    pub async fn recv(&self) -> Option<PeerMessage> {
        self.inbound_rx.lock().await.recv().await
    }

    /// The sender half of this node's mailbox, for transport registration.
    pub(crate) fn mailbox(&self) -> mpsc::Sender<PeerMessage> {
        self.inbound_tx.clone()
    }

    /// Enqueue an inbound message, dropping on overflow.
    pub(crate) fn deliver(&self, from: &str, payload: Vec<u8>) {
        let message = PeerMessage {
            from: from.to_string(),
            payload,
        };
        if self.inbound_tx.try_send(message).is_err() {
            debug!(node = %self.id, from, "inbound queue full, message dropped");
        }
    }
}
