//! # SL-02 Chain State - Hash-Chained Log & Registries
//!
//! The ledger's source of truth: the append-only block log, the wallet and
//! NFT registries derived from it, the pending-transaction queue, and the
//! persistence layer that makes all of it durable.
//!
//! ## Purpose
//!
//! Every committed block flows through this crate exactly once. The pure
//! validator re-checks chain linkage, the canonical hash, and every
//! per-transaction rule before the store swaps registries and appends; a
//! failed persistence write rolls the in-memory changes back so the log on
//! disk never trails the log in memory.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Genesis has index 0 and empty prev hash | `service.rs` genesis path, `loader.rs` boot check |
//! | Sequential index / prev-hash linkage | `domain/validation.rs` steps 1-2 |
//! | Stored hash equals canonical recomputation | `domain/validation.rs` step 3 |
//! | Transaction ids are canonical digests | `domain/validation.rs` per-type rules |
//! | Registries equal the fold of the log | `loader.rs` recovery fold |
//!
//! ## Module Structure
//!
//! ```text
//! sl-02-chain-state/
//! ├── domain/      # Block construction, pure validation, mint pipeline
//! ├── ports/       # BlockStateStore, ObjectStore, Clock
//! ├── adapters/    # In-memory store + object store
//! ├── service.rs   # The locked chain container
//! ├── query.rs     # Read-only story/NFT/wallet views
//! └── loader.rs    # Boot-time recovery from storage
//! ```

pub mod adapters;
pub mod domain;
pub mod loader;
pub mod ports;
pub mod query;
pub mod service;

pub use adapters::{MemoryObjectStore, MemoryStore};
pub use domain::{
    aggregate_authors, build_block, calculate_hash, contribution_signing_bytes,
    contribution_transaction, contribution_tx_id, create_wallet_transaction, mint_nft_transaction,
    mint_story_nft, nft_tx_id, validate_block, wallet_tx_id, ChainError, NftError,
    ObjectStoreError, StoreError, ValidationError,
};
pub use loader::load_chain;
pub use ports::{block_key, state_key, BlockStateStore, Clock, FixedClock, ObjectStore, SystemClock};
pub use service::ChainState;
