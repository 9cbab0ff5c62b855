//! # Block Validation
//!
//! The pure validation function: `(block, prev, state) -> next state`.
//!
//! Validation is deterministic and side-effect free. The caller hands in a
//! snapshot of the registries and receives a mutated clone on success; it
//! commits or discards that clone atomically. The first failing transaction
//! rejects the whole block.

use serde::Serialize;
use shared_crypto::{hash_canonical, CryptoError};
use shared_types::{
    Block, Contribution, ContributionEnvelope, Nft, StateSnapshot, Transaction, TxRecord, Wallet,
};

use crate::domain::block::calculate_hash;
use crate::domain::errors::ValidationError;

#[derive(Serialize)]
struct WalletEnvelope<'a> {
    wallet: &'a Wallet,
    timestamp: i64,
}

/// Canonical transaction id for a wallet registration.
pub fn wallet_tx_id(wallet: &Wallet, timestamp: i64) -> Result<String, CryptoError> {
    hash_canonical(&WalletEnvelope { wallet, timestamp })
}

/// Canonical transaction id for a contribution envelope.
pub fn contribution_tx_id(envelope: &ContributionEnvelope) -> Result<String, CryptoError> {
    hash_canonical(envelope)
}

/// Canonical transaction id for an NFT mint.
pub fn nft_tx_id(nft: &Nft) -> Result<String, CryptoError> {
    hash_canonical(nft)
}

/// The bytes a contributor signs: the canonical digest of the contribution
/// object itself, not the transaction envelope.
pub fn contribution_signing_bytes(contribution: &Contribution) -> Result<Vec<u8>, CryptoError> {
    Ok(hash_canonical(contribution)?.into_bytes())
}

/// Validate a block against its predecessor and the current registries,
/// returning the registries after applying every transaction in order.
pub fn validate_block(
    block: &Block,
    prev: &Block,
    state: &StateSnapshot,
) -> Result<StateSnapshot, ValidationError> {
    if block.index != prev.index + 1 {
        return Err(ValidationError::IndexOutOfSequence {
            expected: prev.index + 1,
            actual: block.index,
        });
    }

    if block.prev_hash != prev.hash {
        return Err(ValidationError::PrevHashMismatch);
    }

    if calculate_hash(block)? != block.hash {
        return Err(ValidationError::HashMismatch);
    }

    if block.transactions.is_empty() {
        return Err(ValidationError::EmptyTransactions);
    }

    let mut next = state.clone();

    for tx in &block.transactions {
        apply_transaction(&mut next, tx, block.index).map_err(|source| {
            ValidationError::Transaction {
                tx_id: tx.tx_id.clone(),
                source: Box::new(source),
            }
        })?;
    }

    Ok(next)
}

fn apply_transaction(
    state: &mut StateSnapshot,
    tx: &Transaction,
    block_index: u64,
) -> Result<(), ValidationError> {
    if tx.kind.is_empty() {
        return Err(ValidationError::MissingType);
    }

    match tx.record()? {
        TxRecord::CreateWallet(wallet) => apply_create_wallet(state, tx, wallet, block_index),
        TxRecord::Contribution(envelope) => apply_contribution(state, tx, envelope),
        TxRecord::MintNft(nft) => apply_mint_nft(state, tx, nft, block_index),
        // Unknown transaction types are accepted without state changes.
        TxRecord::Unknown(_) => Ok(()),
    }
}

fn apply_create_wallet(
    state: &mut StateSnapshot,
    tx: &Transaction,
    mut wallet: Wallet,
    block_index: u64,
) -> Result<(), ValidationError> {
    if tx.timestamp <= 0 {
        return Err(ValidationError::MissingTimestamp);
    }

    if wallet.user_id.is_empty() {
        return Err(ValidationError::MissingWalletId);
    }
    if wallet.address.is_empty() {
        return Err(ValidationError::MissingWalletAddress);
    }
    if wallet.public_key.is_empty() || wallet.private_key_encrypted.is_empty() {
        return Err(ValidationError::MissingWalletKeys);
    }

    verify_tx_id(&tx.tx_id, wallet_tx_id(&wallet, tx.timestamp)?)?;

    if let Some(existing) = state.wallet_registry.get(&wallet.user_id) {
        // Idempotent re-registration is allowed; anything else is a clash.
        if existing.address != wallet.address || existing.public_key != wallet.public_key {
            return Err(ValidationError::DuplicateWallet);
        }
    }

    wallet.block_index = block_index;
    state.wallet_registry.insert(wallet.user_id.clone(), wallet);
    Ok(())
}

fn apply_contribution(
    state: &mut StateSnapshot,
    tx: &Transaction,
    envelope: ContributionEnvelope,
) -> Result<(), ValidationError> {
    if !tx.is_signed() {
        return Err(ValidationError::MissingSignature);
    }

    if tx.timestamp <= 0 {
        return Err(ValidationError::MissingTimestamp);
    }

    let contribution = &envelope.contribution;
    if contribution.contributor_id.is_empty() {
        return Err(ValidationError::MissingWalletId);
    }

    let wallet = state
        .wallet_registry
        .get(&contribution.contributor_id)
        .ok_or_else(|| ValidationError::WalletNotRegistered {
            user_id: contribution.contributor_id.clone(),
        })?;

    if !wallet.address.is_empty() && wallet.address != contribution.wallet_address {
        return Err(ValidationError::WalletAddressMismatch);
    }

    if envelope.timestamp != tx.timestamp {
        return Err(ValidationError::TimestampMismatch {
            envelope: envelope.timestamp,
            transaction: tx.timestamp,
        });
    }

    verify_tx_id(&tx.tx_id, contribution_tx_id(&envelope)?)?;

    // The content signature covers the contribution object, not the envelope.
    let message = contribution_signing_bytes(contribution)?;
    let verified = shared_crypto::verify(&wallet.public_key, &message, &tx.signature)?;
    if !verified {
        return Err(ValidationError::SignatureInvalid);
    }

    Ok(())
}

fn apply_mint_nft(
    state: &mut StateSnapshot,
    tx: &Transaction,
    mut nft: Nft,
    block_index: u64,
) -> Result<(), ValidationError> {
    if tx.timestamp <= 0 {
        return Err(ValidationError::MissingTimestamp);
    }

    if nft.token_id.is_empty() {
        return Err(ValidationError::MissingTokenId);
    }

    verify_tx_id(&tx.tx_id, nft_tx_id(&nft)?)?;

    if state.nft_registry.contains_key(&nft.token_id) {
        return Err(ValidationError::DuplicateToken {
            token_id: nft.token_id,
        });
    }

    nft.block_index = block_index;
    state.nft_registry.insert(nft.token_id.clone(), nft);
    Ok(())
}

fn verify_tx_id(tx_id: &str, expected: String) -> Result<(), ValidationError> {
    if tx_id.is_empty() {
        return Err(ValidationError::MissingTxId);
    }
    if tx_id != expected {
        return Err(ValidationError::TxIdMismatch);
    }
    Ok(())
}
