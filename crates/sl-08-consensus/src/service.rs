//! # Consensus Service
//!
//! Binds a cluster of PBFT nodes to shared chain state: one block builder
//! over the chain head, one finalizer per node, and a proposal entry point
//! the request layer calls through the sharded proposer.

use shared_bus::EventBus;
use shared_types::{Block, Transaction};
use sl_02_chain_state::ChainState;
use sl_05_gossip::Node;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::builder::{chain_finalizer, ChainBlockBuilder};
use crate::domain::ConsensusError;
use crate::ports::Finalizer;
use crate::runtime::{start_cluster, NodeRuntime};

/// A PBFT cluster wired to a chain and an event bus.
pub struct ConsensusService {
    chain: Arc<ChainState>,
    runtimes: HashMap<String, NodeRuntime>,
}

impl ConsensusService {
    /// Boot a PBFT cluster over the provided transports.
    ///
    /// `peers` lists every validator id in the cluster; each transport gets
    /// its own finalizer committing into the shared chain. Must be called
    /// within a tokio runtime.
    pub fn start(
        chain: Arc<ChainState>,
        bus: Option<Arc<EventBus>>,
        transports: HashMap<String, Arc<Node>>,
        peers: Vec<String>,
        signer: Option<Arc<dyn crate::ports::MessageSigner>>,
        fault_tolerance: usize,
    ) -> Result<Self, ConsensusError> {
        if transports.is_empty() {
            return Err(ConsensusError::TransportsRequired);
        }

        let builder = Arc::new(ChainBlockBuilder::new(Arc::clone(&chain), chain.clock()));

        let finalizers: HashMap<String, Finalizer> = transports
            .keys()
            .map(|id| {
                (
                    id.clone(),
                    chain_finalizer(Arc::clone(&chain), bus.clone()),
                )
            })
            .collect();

        let runtimes = start_cluster(
            transports,
            peers,
            builder,
            finalizers,
            signer,
            fault_tolerance,
        )?;

        info!(nodes = runtimes.len(), fault_tolerance, "consensus service started");

        Ok(Self { chain, runtimes })
    }

    /// Submit transactions into consensus via the specified validator.
    ///
    /// An empty list falls back to the chain's pending queue; if that is
    /// also empty the proposal fails fast.
    pub fn propose(
        &self,
        node_id: &str,
        transactions: Vec<Transaction>,
    ) -> Result<(), ConsensusError> {
        let runtime = self
            .runtimes
            .get(node_id)
            .ok_or_else(|| ConsensusError::UnknownNode {
                id: node_id.to_string(),
            })?;

        let transactions = if transactions.is_empty() {
            self.chain.pending_transactions()
        } else {
            transactions
        };

        if transactions.is_empty() {
            return Err(ConsensusError::NoTransactions);
        }

        runtime.node().propose_block(transactions)
    }

    /// The validator ids this service manages.
    pub fn node_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.runtimes.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// The runtime for a node id, if managed.
    pub fn runtime(&self, node_id: &str) -> Option<&NodeRuntime> {
        self.runtimes.get(node_id)
    }

    /// Cancel every message pump. Idempotent.
    pub fn stop(&self) {
        for runtime in self.runtimes.values() {
            runtime.stop();
        }
    }
}

/// Finalize a fetched chain by replaying each block through the callback,
/// e.g. after syncing from a peer.
pub fn apply_blocks(blocks: Vec<Block>, finalize: &Finalizer) {
    for block in blocks {
        finalize(block);
    }
}
