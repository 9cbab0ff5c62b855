//! # Adapters
//!
//! Bridges between the PBFT node and the gossip layer, plus the Ed25519
//! message signer.

pub mod gossip;
pub mod signer;

pub use gossip::{GossipConsensusNetwork, PbftGossipHandler, CONSENSUS_TOPIC};
pub use signer::Ed25519Signer;
