//! # Integration Tests Crate
//!
//! Cross-subsystem scenarios exercising the whole write path: proposer
//! facade → shard selection → PBFT quorum → validation → chain state →
//! persistence → event fan-out.
//!
//! ## Structure
//!
//! ```text
//! integration-tests/
//! └── src/
//!     ├── lib.rs        # This file
//!     ├── end_to_end.rs # Single-node ledger scenarios
//!     └── cluster.rs    # Multi-node agreement, fan-out, persistence
//! ```

#[cfg(test)]
mod cluster;
#[cfg(test)]
mod end_to_end;

#[cfg(test)]
pub(crate) mod support {
    use shared_crypto::Keypair;
    use shared_types::{Contribution, Transaction, Wallet};
    use sl_02_chain_state::{
        contribution_transaction, create_wallet_transaction, FixedClock,
    };

    /// A provisioned wallet whose contributions verify under `keypair`.
    pub fn provisioned_wallet(user_id: &str, keypair: &Keypair) -> Wallet {
        Wallet {
            address: format!("0x{user_id}"),
            user_id: user_id.into(),
            public_key: keypair.public_key_base64(),
            private_key_encrypted: "encrypted-at-rest".into(),
            created_at: 5000,
            block_index: 0,
        }
    }

    pub fn wallet_tx(wallet: &Wallet, at: i64) -> Transaction {
        create_wallet_transaction(wallet, &FixedClock(at)).expect("wallet tx")
    }

    pub fn contribution_tx(
        user_id: &str,
        wallet_address: &str,
        keypair: &Keypair,
        at: i64,
    ) -> Transaction {
        let contribution = Contribution {
            contributor_id: user_id.into(),
            wallet_address: wallet_address.into(),
            story_id: "story-1".into(),
            story_line: "The lighthouse went dark.".into(),
            timestamp: at,
        };
        contribution_transaction(&contribution, &keypair.private_key_base64(), &FixedClock(at))
            .expect("contribution tx")
    }
}
