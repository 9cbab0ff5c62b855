//! # Chain Loader
//!
//! Boot-time recovery: rebuild the in-memory chain from the persistence
//! backend. The block log is the source of truth; the persisted state
//! snapshot is only a cache and is recomputed from scratch on every boot.

use shared_types::StateSnapshot;
use std::sync::Arc;
use tracing::info;

use crate::domain::block::{build_block, calculate_hash};
use crate::domain::errors::ChainError;
use crate::domain::validation::validate_block;
use crate::ports::{BlockStateStore, Clock};
use crate::service::ChainState;

/// Reconstruct a chain from storage.
///
/// Blocks are read from index zero upward until the first NotFound. An empty
/// store is seeded with a fresh genesis block. Otherwise the genesis
/// self-hash is checked and the registries are recomputed by folding the
/// validator over the log; the recomputed state is persisted before the
/// chain is returned.
pub fn load_chain(
    store: Arc<dyn BlockStateStore>,
    clock: Arc<dyn Clock>,
) -> Result<ChainState, ChainError> {
    let mut blocks = Vec::new();

    for index in 0u64.. {
        match store.get_block(index) {
            Ok(block) => blocks.push(block),
            Err(err) if err.is_not_found() => break,
            Err(err) => return Err(err.into()),
        }
    }

    if blocks.is_empty() {
        let genesis = build_block(0, "", Vec::new(), clock.now_unix())?;
        store.save_block(&genesis)?;
        store.save_state(&StateSnapshot::new())?;

        info!(hash = %genesis.hash, "storage empty, genesis created");
        return Ok(ChainState::from_parts(
            vec![genesis],
            StateSnapshot::new(),
            Some(store),
            clock,
        ));
    }

    let genesis = &blocks[0];
    if genesis.index != 0
        || !genesis.prev_hash.is_empty()
        || calculate_hash(genesis)? != genesis.hash
    {
        return Err(ChainError::InvalidGenesis);
    }

    let mut state = StateSnapshot::new();
    for i in 1..blocks.len() {
        state = validate_block(&blocks[i], &blocks[i - 1], &state)?;
    }

    store.save_state(&state)?;

    info!(
        blocks = blocks.len(),
        wallets = state.wallet_registry.len(),
        nfts = state.nft_registry.len(),
        "chain reconstructed from storage"
    );

    Ok(ChainState::from_parts(blocks, state, Some(store), clock))
}
