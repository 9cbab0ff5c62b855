//! # Consensus Errors
//!
//! Construction-time dependency problems are rejected eagerly with
//! descriptive variants; runtime protocol deviations (bad signatures, stale
//! sequences) are silent drops by design and never surface here.

use shared_crypto::CryptoError;
use sl_02_chain_state::ChainError;
use sl_05_gossip::TransportError;
use thiserror::Error;

/// Errors from consensus construction and proposal paths.
#[derive(Debug, Error)]
pub enum ConsensusError {
    /// A PBFT node needs a non-empty identifier.
    #[error("node id required")]
    MissingNodeId,

    /// The quorum `2f+1` cannot be formed by correct nodes in this cluster.
    #[error("fault tolerance {fault_tolerance} unsafe for cluster of {cluster_size}: requires 3f+1 <= n")]
    InvalidFaultTolerance {
        fault_tolerance: usize,
        cluster_size: usize,
    },

    /// The cluster needs at least one transport.
    #[error("transports required")]
    TransportsRequired,

    /// Every transport needs a matching finalizer.
    #[error("finalizer missing for node {id}")]
    FinalizerMissing { id: String },

    /// A proposal was routed to a node this service does not manage.
    #[error("node {id} not registered")]
    UnknownNode { id: String },

    /// Neither the caller nor the pending queue supplied transactions.
    #[error("no transactions to propose")]
    NoTransactions,

    /// A block cannot be built from an empty transaction list.
    #[error("transactions required to build block")]
    EmptyTransactions,

    /// The configured signer failed to produce a signature.
    #[error("message signing failed: {message}")]
    Signer { message: String },

    /// The transport rejected a send or broadcast.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Canonical encoding of a message or block failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The chain rejected a block while building against its head.
    #[error(transparent)]
    Chain(#[from] ChainError),
}
