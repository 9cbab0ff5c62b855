//! # Chain Domain Errors
//!
//! One error enum per failure domain: block/transaction validation, the
//! chain container, persistence, the object store, and NFT minting. Each
//! variant corresponds to a specific rule violation or failure mode; nothing
//! in this crate panics.

use shared_crypto::CryptoError;
use shared_types::PayloadError;
use thiserror::Error;

/// A block or one of its transactions violated a validation rule.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The block does not extend the previous index by exactly one.
    #[error("expected block index {expected}, got {actual}")]
    IndexOutOfSequence { expected: u64, actual: u64 },

    /// The block's `prev_hash` does not match the predecessor's hash.
    #[error("previous hash mismatch")]
    PrevHashMismatch,

    /// The stored hash does not match the canonical recomputation.
    #[error("block hash mismatch")]
    HashMismatch,

    /// A non-genesis block must carry at least one transaction.
    #[error("block must contain transactions")]
    EmptyTransactions,

    /// A transaction inside the block failed; the whole block is rejected.
    #[error("transaction {tx_id} invalid: {source}")]
    Transaction {
        tx_id: String,
        #[source]
        source: Box<ValidationError>,
    },

    /// The transaction carries no type tag.
    #[error("transaction type required")]
    MissingType,

    /// The transaction timestamp must be positive.
    #[error("transaction timestamp required")]
    MissingTimestamp,

    /// The transaction id is empty.
    #[error("transaction id required")]
    MissingTxId,

    /// The transaction id does not equal the canonical payload digest.
    #[error("transaction id mismatch")]
    TxIdMismatch,

    /// A wallet record is missing its user id.
    #[error("wallet user id required")]
    MissingWalletId,

    /// A wallet record is missing its address.
    #[error("wallet address required")]
    MissingWalletAddress,

    /// A wallet record is missing its public or encrypted private key.
    #[error("wallet keys required")]
    MissingWalletKeys,

    /// A wallet already exists for this user with different details.
    #[error("wallet already exists with different details")]
    DuplicateWallet,

    /// A contribution must carry a content signature.
    #[error("signature required")]
    MissingSignature,

    /// The contributor has no registered wallet.
    #[error("wallet not registered for contributor {user_id}")]
    WalletNotRegistered { user_id: String },

    /// The contribution names a different wallet address than the registry.
    #[error("contribution wallet mismatch")]
    WalletAddressMismatch,

    /// The payload envelope timestamp disagrees with the transaction.
    #[error("contribution timestamp mismatch: envelope {envelope}, transaction {transaction}")]
    TimestampMismatch { envelope: i64, transaction: i64 },

    /// The Ed25519 content signature failed verification.
    #[error("signature verification failed")]
    SignatureInvalid,

    /// An NFT record is missing its token id.
    #[error("nft token id required")]
    MissingTokenId,

    /// The token id is already present in the registry.
    #[error("nft token {token_id} already exists")]
    DuplicateToken { token_id: String },

    /// A recognized payload failed to decode into its typed form.
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// A cryptographic primitive rejected its input.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Errors from the chain container and its persistence interplay.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The container holds no blocks; the genesis bootstrap never ran.
    #[error("blockchain not initialized")]
    NotInitialized,

    /// A replacement genesis block must carry an empty previous hash.
    #[error("invalid genesis previous hash")]
    InvalidGenesisPrev,

    /// The genesis block read back from storage is not self-consistent.
    #[error("invalid genesis block in storage")]
    InvalidGenesis,

    /// Block or transaction validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The persistence layer failed; any in-memory change was rolled back.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A cryptographic primitive rejected its input.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Errors from the block/state persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("record not found")]
    NotFound,

    /// The backend failed to read or write.
    #[error("storage backend error: {message}")]
    Backend { message: String },

    /// A record could not be encoded or decoded.
    #[error("storage serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Whether this error is the NotFound sentinel readers stop on.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}

/// Errors from the content-addressed object store.
#[derive(Debug, Error)]
pub enum ObjectStoreError {
    /// Uploading an empty payload is rejected.
    #[error("object data required")]
    EmptyData,

    /// No object exists for this content id.
    #[error("object {cid} not found")]
    NotFound { cid: String },

    /// The backend failed.
    #[error("object store error: {message}")]
    Backend { message: String },

    /// A value could not be encoded for upload.
    #[error("object serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from the NFT mint pipeline.
#[derive(Debug, Error)]
pub enum NftError {
    /// The story id is required to mint.
    #[error("story id required")]
    MissingStoryId,

    /// The story title is required to mint.
    #[error("story title required")]
    MissingTitle,

    /// Minting requires at least one contribution.
    #[error("contributions required")]
    NoContributions,

    /// Uploading image or metadata content failed.
    #[error(transparent)]
    ObjectStore(#[from] ObjectStoreError),
}
