//! # SL-08 Consensus - PBFT Agreement
//!
//! The three-phase Practical Byzantine Fault Tolerant protocol that orders
//! blocks across the validator cluster, and the service that binds it to
//! chain state.
//!
//! ## Purpose
//!
//! One PBFT node runs per validator. A proposal installs a per-sequence
//! instance and broadcasts PRE_PREPARE; peers answer with PREPARE, and once
//! `2f+1` prepares are seen (counting the local pre-prepare) each node
//! broadcasts COMMIT. At `2f+1` commits the node fires its finalize callback
//! exactly once, which re-validates the block, appends it to chain state,
//! clears the pending queue, and announces the commit on the event bus.
//!
//! ```text
//!                PRE_PREPARE(self)        2f+1 PREPAREs (incl. self)
//!   (none) ───────────────────────▶ PREPARED ─────────────────────▶ COMMITTED
//!              on valid PRE_PREPARE                                2f+1 COMMITs
//!              from peer                                           (fire finalize once)
//! ```
//!
//! ## Safety Notes
//!
//! - Quorum is `2f + 1` distinct senders; duplicates are ignored.
//! - Construction rejects `3f + 1 > n` so a correct quorum can exist.
//! - With a signer configured, a message whose signature fails verification
//!   is silently dropped; without one, signatures are not required
//!   (development mode).
//! - The finalize callback runs with the node's mutex released.
//! - VIEW_CHANGE is reserved for multi-view operation and currently ignored.
//!
//! ## Module Structure
//!
//! ```text
//! sl-08-consensus/
//! ├── domain/      # Messages, signing digest, errors
//! ├── ports/       # ConsensusNetwork, MessageSigner, BlockBuilder, Finalizer
//! ├── node.rs      # The PBFT state machine
//! ├── builder.rs   # Chain-backed block builder + finalizer
//! ├── adapters/    # Gossip bridge, Ed25519 message signer
//! ├── runtime.rs   # Per-node message pumps
//! └── service.rs   # Cluster lifecycle + propose entry point
//! ```

pub mod adapters;
pub mod builder;
pub mod domain;
pub mod node;
pub mod ports;
pub mod runtime;
pub mod service;

pub use adapters::{Ed25519Signer, GossipConsensusNetwork, PbftGossipHandler, CONSENSUS_TOPIC};
pub use builder::{chain_finalizer, ChainBlockBuilder};
pub use domain::{ConsensusError, ConsensusMessage, MessageKind};
pub use node::{PbftConfig, PbftNode};
pub use ports::{BlockBuilder, ConsensusNetwork, Finalizer, MessageSigner};
pub use runtime::{bootstrap_node, start_cluster, start_node, BootstrapOptions, NodeRuntime};
pub use service::{apply_blocks, ConsensusService};
