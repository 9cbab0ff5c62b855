//! # Domain Entities
//!
//! Core entities for the collaborative storytelling ledger.
//!
//! Every type here derives `Serialize`/`Deserialize` with the exact wire
//! names used by storage, gossip, and hashing. Registries use `BTreeMap` so
//! snapshot serialization is deterministic.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::errors::PayloadError;

/// Transaction type tag for wallet registration records.
pub const TX_CREATE_WALLET: &str = "create_wallet";
/// Transaction type tag for signed story contributions.
pub const TX_CONTRIBUTION: &str = "contribution";
/// Transaction type tag for NFT mint records.
pub const TX_MINT_NFT: &str = "mint_nft";

/// A single block in the hash-chained ledger.
///
/// The genesis block has `index == 0` and an empty `prev_hash`. Every other
/// block satisfies `index == prev.index + 1` and `prev_hash == prev.hash`.
/// `hash` is the SHA-256 hex of the canonical JSON of the block with its own
/// `hash` field blanked. Blocks are immutable once appended.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: i64,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    pub prev_hash: String,
    pub hash: String,
    #[serde(default)]
    pub validator_signatures: BTreeMap<String, String>,
    #[serde(default)]
    pub nonce: u64,
}

impl Block {
    /// Whether this block occupies the genesis position.
    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }
}

/// An action recorded on-chain.
///
/// `data` is carried as a generic JSON value so unknown transaction types
/// survive hashing and persistence untouched; use [`Transaction::record`] for
/// the typed view. An empty `signature` means the transaction is unsigned,
/// matching the wire form (the field is always serialized so hash inputs stay
/// byte-stable).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub tx_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
    pub timestamp: i64,
    #[serde(default)]
    pub signature: String,
}

impl Transaction {
    /// Whether a content signature is attached.
    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }

    /// Decode the generic payload into its typed form.
    ///
    /// Unrecognized `type` tags yield [`TxRecord::Unknown`] carrying the raw
    /// value verbatim; decode failures for recognized tags are errors.
    pub fn record(&self) -> Result<TxRecord, PayloadError> {
        let decode_err = |source| PayloadError::Decode {
            kind: self.kind.clone(),
            source,
        };

        match self.kind.as_str() {
            TX_CREATE_WALLET => serde_json::from_value(self.data.clone())
                .map(TxRecord::CreateWallet)
                .map_err(decode_err),
            TX_CONTRIBUTION => serde_json::from_value(self.data.clone())
                .map(TxRecord::Contribution)
                .map_err(decode_err),
            TX_MINT_NFT => serde_json::from_value(self.data.clone())
                .map(TxRecord::MintNft)
                .map_err(decode_err),
            _ => Ok(TxRecord::Unknown(self.data.clone())),
        }
    }
}

/// Typed view of a transaction payload, dispatched on the `type` tag.
#[derive(Debug, Clone, PartialEq)]
pub enum TxRecord {
    /// A wallet registration record.
    CreateWallet(Wallet),
    /// A signed story contribution inside its hashing envelope.
    Contribution(ContributionEnvelope),
    /// An NFT mint record.
    MintNft(Nft),
    /// A forward-compatible payload the validator ignores.
    Unknown(Value),
}

/// The envelope hashed into a contribution transaction id.
///
/// The envelope timestamp must equal the transaction timestamp; the content
/// signature covers only the inner contribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContributionEnvelope {
    pub contribution: Contribution,
    pub timestamp: i64,
}

/// A single story contribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub contributor_id: String,
    pub wallet_address: String,
    pub story_id: String,
    pub story_line: String,
    pub timestamp: i64,
}

/// A user's on-chain wallet record.
///
/// The triple `(user_id, address, public_key)` is effectively unique: a
/// repeated registration must match the existing address and public key
/// exactly. `block_index` is the committed block that first introduced the
/// wallet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub address: String,
    pub user_id: String,
    pub public_key: String,
    pub private_key_encrypted: String,
    pub created_at: i64,
    #[serde(default)]
    pub block_index: u64,
}

/// Minted storytelling NFT metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nft {
    pub token_id: String,
    pub story_id: String,
    pub title: String,
    pub summary: String,
    pub main_author: Author,
    #[serde(default)]
    pub co_authors: Vec<Author>,
    pub image_ref: String,
    pub metadata_ref: String,
    pub minted_at: i64,
    #[serde(default)]
    pub block_index: u64,
}

/// A collaborative writer on a story, with their share of the work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub user_id: String,
    pub wallet_address: String,
    pub contribution_count: u64,
    pub ownership_percentage: f64,
    #[serde(default)]
    pub contributions: Vec<Contribution>,
}

/// Aggregate story context used when minting NFTs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub contributions: Vec<Contribution>,
}

/// The on-chain registries at a point in the log.
///
/// A snapshot is the pure fold of the block validator over the log from
/// genesis; the persisted copy is only a cache of that fold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub wallet_registry: BTreeMap<String, Wallet>,
    pub nft_registry: BTreeMap<String, Nft>,
}

impl StateSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }
}
