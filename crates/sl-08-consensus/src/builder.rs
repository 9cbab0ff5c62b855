//! # Chain Integration
//!
//! The block builder bound to the chain head and the finalizer that commits
//! quorumed blocks, clears the pending queue, and announces the result.

use shared_bus::{EventBus, LedgerEvent};
use shared_types::Transaction;
use sl_02_chain_state::{build_block, ChainState, Clock};
use std::sync::Arc;
use tracing::warn;

use crate::domain::ConsensusError;
use crate::ports::{BlockBuilder, Finalizer};

/// Builds candidate blocks from the current chain head.
pub struct ChainBlockBuilder {
    chain: Arc<ChainState>,
    clock: Arc<dyn Clock>,
}

impl ChainBlockBuilder {
    /// Create a builder over the shared chain, stamping blocks with the
    /// injected clock.
    pub fn new(chain: Arc<ChainState>, clock: Arc<dyn Clock>) -> Self {
        Self { chain, clock }
    }
}

impl BlockBuilder for ChainBlockBuilder {
    fn build_block(&self, transactions: Vec<Transaction>) -> Result<shared_types::Block, ConsensusError> {
        if transactions.is_empty() {
            return Err(ConsensusError::EmptyTransactions);
        }

        let prev = self.chain.latest();
        Ok(build_block(
            prev.index + 1,
            prev.hash,
            transactions,
            self.clock.now_unix(),
        )?)
    }
}

/// A finalizer that commits quorumed blocks to the chain and publishes
/// events.
///
/// On validation or persistence failure the block is dropped from this
/// node's view, an `error` event is published, and the node continues; other
/// nodes may or may not have accepted the same block.
pub fn chain_finalizer(chain: Arc<ChainState>, bus: Option<Arc<EventBus>>) -> Finalizer {
    Arc::new(move |block| {
        let latest = chain.latest();
        if block.index == latest.index && block.hash == latest.hash {
            // Already committed: in-process runtimes share one chain, so a
            // later node's quorum can arrive after the append happened.
            return;
        }

        if let Err(err) = chain.add_block(block.clone()) {
            warn!(index = block.index, error = %err, "finalize rejected block");
            if let Some(bus) = bus.as_ref() {
                bus.publish(LedgerEvent::error(err.to_string()));
            }
            return;
        }

        // The whole pending queue is dropped on commit, not just the
        // transactions this block included; concurrent enqueues are lost and
        // must be resubmitted.
        chain.clear_pending();

        if let Some(bus) = bus.as_ref() {
            bus.publish(LedgerEvent::block_committed(&block));
            for tx in &block.transactions {
                bus.publish(LedgerEvent::transaction_committed(tx));
            }
        }
    })
}
