//! # Signed Record Builders
//!
//! Constructors for the three on-chain record types. These are the write-side
//! counterparts of the validator rules: the transaction id and signature they
//! produce are exactly what validation recomputes.

use shared_types::{
    Contribution, ContributionEnvelope, Nft, Transaction, Wallet, TX_CONTRIBUTION,
    TX_CREATE_WALLET, TX_MINT_NFT,
};

use crate::domain::errors::ChainError;
use crate::domain::validation::{
    contribution_signing_bytes, contribution_tx_id, nft_tx_id, wallet_tx_id,
};
use crate::ports::Clock;

/// Build a `create_wallet` transaction for a freshly provisioned wallet.
pub fn create_wallet_transaction(
    wallet: &Wallet,
    clock: &dyn Clock,
) -> Result<Transaction, ChainError> {
    let timestamp = clock.now_unix();
    Ok(Transaction {
        tx_id: wallet_tx_id(wallet, timestamp)?,
        kind: TX_CREATE_WALLET.into(),
        data: serde_json::to_value(wallet).map_err(shared_crypto::CryptoError::from)?,
        timestamp,
        signature: String::new(),
    })
}

/// Build a signed `contribution` transaction.
///
/// `private_key` is the contributor's base64 Ed25519 key; the signature
/// covers the contribution object per the content-signing discipline.
pub fn contribution_transaction(
    contribution: &Contribution,
    private_key: &str,
    clock: &dyn Clock,
) -> Result<Transaction, ChainError> {
    let timestamp = clock.now_unix();
    let envelope = ContributionEnvelope {
        contribution: contribution.clone(),
        timestamp,
    };

    let message = contribution_signing_bytes(contribution)?;
    let signature = shared_crypto::sign(private_key, &message)?;

    Ok(Transaction {
        tx_id: contribution_tx_id(&envelope)?,
        kind: TX_CONTRIBUTION.into(),
        data: serde_json::to_value(&envelope).map_err(shared_crypto::CryptoError::from)?,
        timestamp,
        signature,
    })
}

/// Build a `mint_nft` transaction for a minted NFT.
pub fn mint_nft_transaction(nft: &Nft, clock: &dyn Clock) -> Result<Transaction, ChainError> {
    let timestamp = clock.now_unix();
    Ok(Transaction {
        tx_id: nft_tx_id(nft)?,
        kind: TX_MINT_NFT.into(),
        data: serde_json::to_value(nft).map_err(shared_crypto::CryptoError::from)?,
        timestamp,
        signature: String::new(),
    })
}
