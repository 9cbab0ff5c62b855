//! # Sharded Proposer Facade
//!
//! The wrapper request handlers submit through: selects a validator for the
//! request key, dispatches, and walks the remaining nodes when the selected
//! one is unreachable at the transport level.

use parking_lot::RwLock;
use shared_types::Transaction;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::algorithms::select_node;

/// Errors surfaced by a proposer gateway.
#[derive(Debug, Error)]
pub enum ProposeError {
    /// The proposal never reached the validator; another node may succeed.
    #[error("proposal transport failure: {message}")]
    Transport { message: String },

    /// The validator refused the proposal; retrying elsewhere cannot help.
    #[error("proposal rejected: {message}")]
    Rejected { message: String },

    /// No validators are configured.
    #[error("no consensus nodes configured")]
    NoNodes,
}

/// The capability a consensus service exposes to the facade.
pub trait ProposerGateway: Send + Sync {
    /// Submit transactions into consensus via the specified validator.
    fn propose(&self, node_id: &str, transactions: Vec<Transaction>) -> Result<(), ProposeError>;
}

/// Shard-aware proposer over an ordered validator list.
///
/// The first entry is the local node. The list may be reassigned at runtime;
/// selection always reads the current list.
pub struct ShardedProposer {
    nodes: RwLock<Vec<String>>,
    gateway: Arc<dyn ProposerGateway>,
}

impl ShardedProposer {
    /// Create a facade over the gateway with the initial node list.
    pub fn new(gateway: Arc<dyn ProposerGateway>, local_node: impl Into<String>, additional: Vec<String>) -> Self {
        let local = local_node.into();
        let mut nodes = Vec::with_capacity(additional.len() + 1);
        if !local.is_empty() {
            nodes.push(local);
        }
        nodes.extend(additional);

        Self {
            nodes: RwLock::new(nodes),
            gateway,
        }
    }

    /// Replace the validator list.
    pub fn set_nodes(&self, nodes: Vec<String>) {
        *self.nodes.write() = nodes;
    }

    /// The current validator list, local node first.
    pub fn nodes(&self) -> Vec<String> {
        self.nodes.read().clone()
    }

    /// The validator a request key maps to, if any are configured.
    pub fn node_for_key(&self, key: &str) -> Option<String> {
        let nodes = self.nodes.read();
        let selected = select_node(&nodes, key);
        if selected.is_empty() {
            None
        } else {
            Some(selected)
        }
    }

    /// Select a validator for the request key and dispatch.
    ///
    /// A transport-classified failure falls through to the remaining nodes
    /// in list order; a rejection surfaces immediately.
    pub fn propose(&self, key: &str, transactions: Vec<Transaction>) -> Result<(), ProposeError> {
        let nodes = self.nodes();
        if nodes.is_empty() {
            return Err(ProposeError::NoNodes);
        }

        let selected = select_node(&nodes, key);
        let mut last_error = match self.gateway.propose(&selected, transactions.clone()) {
            Ok(()) => return Ok(()),
            Err(err @ ProposeError::Transport { .. }) => {
                warn!(node = %selected, error = %err, "selected node unreachable, retrying others");
                err
            }
            Err(err) => return Err(err),
        };

        for node in nodes.iter().filter(|n| **n != selected) {
            match self.gateway.propose(node, transactions.clone()) {
                Ok(()) => {
                    debug!(node = %node, "fallback proposal accepted");
                    return Ok(());
                }
                Err(err @ ProposeError::Transport { .. }) => last_error = err,
                Err(err) => return Err(err),
            }
        }

        Err(last_error)
    }
}
