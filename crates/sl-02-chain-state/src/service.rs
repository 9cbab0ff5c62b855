//! # Chain State Service
//!
//! The thread-safe container guarding the block log, the wallet and NFT
//! registries, and the pending-transaction queue. All mutating operations
//! take the write lock; all reads copy out under the read lock. Event
//! publication happens after the lock is released so the bus can never stall
//! a chain operation.

use parking_lot::RwLock;
use shared_bus::{EventBus, LedgerEvent};
use shared_types::{Block, Nft, StateSnapshot, Transaction, Wallet};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::block::{build_block, calculate_hash};
use crate::domain::errors::{ChainError, StoreError, ValidationError};
use crate::domain::validation::validate_block;
use crate::ports::{BlockStateStore, Clock};

pub(crate) struct ChainInner {
    pub(crate) blocks: Vec<Block>,
    pub(crate) wallets: BTreeMap<String, Wallet>,
    pub(crate) nfts: BTreeMap<String, Nft>,
    pub(crate) pending: Vec<Transaction>,
    pub(crate) store: Option<Arc<dyn BlockStateStore>>,
    pub(crate) bus: Option<Arc<EventBus>>,
}

/// The in-memory view of the ledger, seeded with a genesis block.
///
/// The container exclusively owns the log, the registries, and the pending
/// queue; every read hands out copies.
pub struct ChainState {
    inner: RwLock<ChainInner>,
    clock: Arc<dyn Clock>,
}

impl ChainState {
    /// Bootstrap a chain with a fresh genesis block.
    pub fn new(clock: Arc<dyn Clock>) -> Result<Self, ChainError> {
        let genesis = build_block(0, "", Vec::new(), clock.now_unix())?;
        Ok(Self::from_parts(
            vec![genesis],
            StateSnapshot::new(),
            None,
            clock,
        ))
    }

    pub(crate) fn from_parts(
        blocks: Vec<Block>,
        state: StateSnapshot,
        store: Option<Arc<dyn BlockStateStore>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: RwLock::new(ChainInner {
                blocks,
                wallets: state.wallet_registry,
                nfts: state.nft_registry,
                pending: Vec::new(),
                store,
                bus: None,
            }),
            clock,
        }
    }

    /// The clock this chain was constructed with.
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Attach the event bus used for queue/commit notifications.
    pub fn set_bus(&self, bus: Arc<EventBus>) {
        self.inner.write().bus = Some(bus);
    }

    /// Attach a persistence backend and synchronize the current log and
    /// state to it. On a write failure the backend is not attached.
    pub fn with_storage(&self, store: Arc<dyn BlockStateStore>) -> Result<(), ChainError> {
        let mut inner = self.inner.write();

        for block in &inner.blocks {
            store.save_block(block)?;
        }
        store.save_state(&snapshot_of(&inner))?;

        inner.store = Some(store);
        Ok(())
    }

    /// The most recent block.
    pub fn latest(&self) -> Block {
        // The log always holds at least the genesis block.
        self.inner.read().blocks.last().cloned().unwrap_or_default()
    }

    /// A copy of the full chain.
    pub fn blocks(&self) -> Vec<Block> {
        self.inner.read().blocks.clone()
    }

    /// A copy of the current registries.
    pub fn state(&self) -> StateSnapshot {
        snapshot_of(&self.inner.read())
    }

    /// Stage a transaction for inclusion in the next block and publish
    /// `transaction.queued`.
    pub fn enqueue_transaction(&self, tx: Transaction) {
        let bus = {
            let mut inner = self.inner.write();
            inner.pending.push(tx.clone());
            inner.bus.clone()
        };

        if let Some(bus) = bus {
            bus.publish(LedgerEvent::transaction_queued(&tx));
        }
    }

    /// A copy of the currently staged transactions, in FIFO order.
    pub fn pending_transactions(&self) -> Vec<Transaction> {
        self.inner.read().pending.clone()
    }

    /// Drop all staged transactions.
    pub fn clear_pending(&self) {
        self.inner.write().pending.clear();
    }

    /// Insert a freshly provisioned wallet into the registry ahead of
    /// consensus, so a contribution that follows immediately can be
    /// signature-checked against the speculative key.
    ///
    /// Only the initial provisioning path may use this: until the matching
    /// `create_wallet` block commits, this node's registry leads the
    /// committed log.
    pub fn register_wallet(&self, wallet: Wallet) {
        let mut inner = self.inner.write();
        inner.wallets.insert(wallet.user_id.clone(), wallet);
    }

    /// Look up the wallet registered for a user id.
    pub fn wallet_by_user(&self, user_id: &str) -> Option<Wallet> {
        self.inner.read().wallets.get(user_id).cloned()
    }

    /// Validate and append a block.
    ///
    /// Index zero takes the genesis-replacement path (hash recomputation
    /// only); any other block is validated against the head and the current
    /// registries. A persistence failure rolls back the in-memory changes
    /// and surfaces the storage error.
    pub fn add_block(&self, block: Block) -> Result<(), ChainError> {
        let mut inner = self.inner.write();

        if inner.blocks.is_empty() {
            return Err(ChainError::NotInitialized);
        }

        if block.index == 0 {
            if !block.prev_hash.is_empty() {
                return Err(ChainError::InvalidGenesisPrev);
            }
            if calculate_hash(&block)? != block.hash {
                return Err(ValidationError::HashMismatch.into());
            }

            let previous = std::mem::replace(&mut inner.blocks, vec![block.clone()]);
            if let Err(err) = persist_locked(&inner, &block) {
                inner.blocks = previous;
                return Err(err.into());
            }

            debug!(index = 0, hash = %block.hash, "genesis block replaced");
            return Ok(());
        }

        let prev = inner.blocks.last().cloned().unwrap_or_default();
        let updated = validate_block(&block, &prev, &snapshot_of(&inner))?;

        let prev_wallets = std::mem::replace(&mut inner.wallets, updated.wallet_registry);
        let prev_nfts = std::mem::replace(&mut inner.nfts, updated.nft_registry);
        inner.blocks.push(block.clone());

        if let Err(err) = persist_locked(&inner, &block) {
            warn!(index = block.index, error = %err, "persistence failed, rolling back append");
            inner.blocks.pop();
            inner.wallets = prev_wallets;
            inner.nfts = prev_nfts;
            return Err(err.into());
        }

        debug!(index = block.index, txs = block.transactions.len(), "block appended");
        Ok(())
    }

    /// Sweep the whole chain for internal consistency: sequential indices,
    /// prev-hash linkage, and canonical hashes.
    pub fn validate_chain(&self) -> bool {
        let inner = self.inner.read();

        if inner.blocks.is_empty() {
            return false;
        }

        for pair in inner.blocks.windows(2) {
            let (prev, curr) = (&pair[0], &pair[1]);

            if curr.index != prev.index + 1 {
                return false;
            }
            if curr.prev_hash != prev.hash {
                return false;
            }
            match calculate_hash(curr) {
                Ok(hash) if hash == curr.hash => {}
                _ => return false,
            }
        }

        true
    }
}

fn snapshot_of(inner: &ChainInner) -> StateSnapshot {
    StateSnapshot {
        wallet_registry: inner.wallets.clone(),
        nft_registry: inner.nfts.clone(),
    }
}

fn persist_locked(inner: &ChainInner, block: &Block) -> Result<(), StoreError> {
    let Some(store) = inner.store.as_ref() else {
        return Ok(());
    };

    store.save_block(block)?;
    store.save_state(&snapshot_of(inner))
}
