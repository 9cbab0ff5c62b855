//! # SL-05 Gossip - Peer Messaging
//!
//! Minimal peer-to-peer layer for validator traffic: direct sends, full-peer
//! broadcast, and topic-tagged envelopes dispatched to registered handlers.
//!
//! ## Purpose
//!
//! Consensus messages ride on this layer. Delivery is intentionally modest:
//! an inbound queue overflow silently drops (the protocol will not progress
//! without quorum and retries on the next proposal), while an outbound send
//! to an unknown or failing peer is a hard error surfaced to the sender.
//!
//! ## Module Structure
//!
//! ```text
//! sl-05-gossip/
//! ├── domain/      # PeerMessage, GossipEnvelope
//! ├── ports/       # Transport + GossipHandler traits
//! ├── node.rs      # Peer node with bounded inbound queue
//! ├── gossip.rs    # Envelope broadcast and inbound dispatch
//! └── adapters/    # In-process transport registry
//! ```

pub mod adapters;
pub mod domain;
pub mod gossip;
pub mod node;
pub mod ports;

pub use adapters::InMemoryTransport;
pub use domain::{GossipEnvelope, PeerMessage, TransportError};
pub use gossip::{broadcast_to_network, handle_incoming};
pub use node::Node;
pub use ports::{GossipHandler, Transport};

/// Inbound queue depth per node; overflow drops silently.
pub const INBOUND_QUEUE_CAPACITY: usize = 32;
