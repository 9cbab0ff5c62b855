//! # In-Process Transport
//!
//! A registry mapping node id to inbound mailbox, for tests and local
//! development clusters. A missing recipient is an error; a full inbound
//! queue silently drops.

use parking_lot::RwLock;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::debug;

use crate::domain::{PeerMessage, TransportError};
use crate::node::Node;
use crate::ports::Transport;

/// Simple transport routing messages between registered in-process nodes.
#[derive(Default)]
pub struct InMemoryTransport {
    mailboxes: RwLock<HashMap<String, mpsc::Sender<PeerMessage>>>,
}

impl InMemoryTransport {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node's mailbox with the transport.
    pub fn register(&self, node: &Node) {
        self.mailboxes
            .write()
            .insert(node.id().to_string(), node.mailbox());
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.mailboxes.read().len()
    }

    /// Whether no nodes are registered.
    pub fn is_empty(&self) -> bool {
        self.mailboxes.read().is_empty()
    }
}

impl Transport for InMemoryTransport {
    fn send(&self, from: &str, to: &str, payload: Vec<u8>) -> Result<(), TransportError> {
        let mailbox = {
            let mailboxes = self.mailboxes.read();
            mailboxes
                .get(to)
                .cloned()
                .ok_or_else(|| TransportError::RecipientUnknown {
                    peer: to.to_string(),
                })?
        };

        let message = PeerMessage {
            from: from.to_string(),
            payload,
        };

        // Inbound lossiness is acceptable; see the crate docs.
        if mailbox.try_send(message).is_err() {
            debug!(from, to, "recipient inbound queue full, message dropped");
        }

        Ok(())
    }
}
