//! # Consensus Proposer Adapter
//!
//! Bridges the consensus service to the sharded-proposer gateway, mapping
//! transport-level failures into the class the facade retries on.

use shared_types::Transaction;
use sl_08_consensus::{ConsensusError, ConsensusService};
use sl_14_sharding::{ProposeError, ProposerGateway};
use std::sync::Arc;

/// `ConsensusService` speaking the proposer-gateway port.
pub struct ServiceProposer {
    service: Arc<ConsensusService>,
}

impl ServiceProposer {
    /// Wrap a consensus service.
    pub fn new(service: Arc<ConsensusService>) -> Self {
        Self { service }
    }
}

impl ProposerGateway for ServiceProposer {
    fn propose(&self, node_id: &str, transactions: Vec<Transaction>) -> Result<(), ProposeError> {
        self.service
            .propose(node_id, transactions)
            .map_err(|err| match err {
                ConsensusError::Transport(inner) => ProposeError::Transport {
                    message: inner.to_string(),
                },
                other => ProposeError::Rejected {
                    message: other.to_string(),
                },
            })
    }
}
