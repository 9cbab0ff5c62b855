//! # Chain Domain
//!
//! Pure chain logic: block construction and hashing, the block/transaction
//! validator, signed-record builders, and the NFT mint pipeline. Nothing in
//! this module touches a lock, a socket, or a disk.

pub mod block;
pub mod errors;
pub mod nft;
pub mod records;
pub mod validation;

pub use block::{build_block, calculate_hash};
pub use errors::{ChainError, NftError, ObjectStoreError, StoreError, ValidationError};
pub use nft::{aggregate_authors, mint_story_nft};
pub use records::{contribution_transaction, create_wallet_transaction, mint_nft_transaction};
pub use validation::{
    contribution_signing_bytes, contribution_tx_id, nft_tx_id, validate_block, wallet_tx_id,
};
