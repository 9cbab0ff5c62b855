//! # Shared Types Crate
//!
//! This crate contains the domain entities shared by every StoryLedger
//! subsystem: the hash-chained block, the generic transaction and its typed
//! payload view, the wallet and NFT registry records, and the chain-state
//! snapshot.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem entity types are defined
//!   here with their wire (serde) names.
//! - **Hash Stability**: Entities serialize to the exact JSON layout that
//!   participates in block and transaction hashing; fields are never skipped
//!   or reordered conditionally.
//! - **Typed Payloads**: `Transaction.data` stays a generic value on the wire;
//!   the `TxRecord` sum type provides the typed view with an `Unknown` variant
//!   that preserves unrecognized payloads verbatim.

pub mod entities;
pub mod errors;

pub use entities::{
    Author, Block, Contribution, ContributionEnvelope, Nft, StateSnapshot, Story, Transaction,
    TxRecord, Wallet, TX_CONTRIBUTION, TX_CREATE_WALLET, TX_MINT_NFT,
};
pub use errors::PayloadError;
