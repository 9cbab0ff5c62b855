//! # Read-Only Query Views
//!
//! Story, NFT, and wallet lookups over committed chain state. These are the
//! views the host's request layer exposes; none of them mutate anything.

use shared_types::{Contribution, Nft, TxRecord};

use crate::service::ChainState;

impl ChainState {
    /// All committed contributions for a story, in chain order.
    ///
    /// Transactions whose payloads fail to decode are skipped; a malformed
    /// historic payload must not break reads.
    pub fn story_contributions(&self, story_id: &str) -> Vec<Contribution> {
        if story_id.is_empty() {
            return Vec::new();
        }

        let mut results = Vec::new();

        for block in self.blocks() {
            for tx in &block.transactions {
                let Ok(TxRecord::Contribution(envelope)) = tx.record() else {
                    continue;
                };
                if envelope.contribution.story_id == story_id {
                    results.push(envelope.contribution);
                }
            }
        }

        results
    }

    /// The NFT for a token id, if minted.
    pub fn nft(&self, token_id: &str) -> Option<Nft> {
        if token_id.is_empty() {
            return None;
        }
        self.state().nft_registry.get(token_id).cloned()
    }

    /// All NFTs minted for a story.
    pub fn nfts_by_story(&self, story_id: &str) -> Vec<Nft> {
        if story_id.is_empty() {
            return Vec::new();
        }

        self.state()
            .nft_registry
            .values()
            .filter(|nft| nft.story_id == story_id)
            .cloned()
            .collect()
    }
}
