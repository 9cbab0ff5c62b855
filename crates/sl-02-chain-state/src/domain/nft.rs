//! # NFT Mint Pipeline
//!
//! Aggregates a story's contributions into author shares, uploads the image
//! and metadata payloads to the content-addressed object store, and produces
//! the NFT record that a `mint_nft` transaction carries.

use serde_json::json;
use shared_crypto::sha256_hex;
use shared_types::{Author, Contribution, Nft, Story};

use crate::domain::errors::NftError;
use crate::ports::{Clock, ObjectStore};

/// Mint an NFT for a story: aggregate authors, upload image and metadata,
/// and derive the token id from the metadata content id.
///
/// `block_index` stays zero until the mint transaction commits; the validator
/// stamps the real value.
pub fn mint_story_nft(
    story: &Story,
    object_store: &dyn ObjectStore,
    clock: &dyn Clock,
) -> Result<Nft, NftError> {
    if story.id.is_empty() {
        return Err(NftError::MissingStoryId);
    }
    if story.title.is_empty() {
        return Err(NftError::MissingTitle);
    }
    if story.contributions.is_empty() {
        return Err(NftError::NoContributions);
    }

    let mut authors = aggregate_authors(&story.contributions);
    if authors.is_empty() {
        return Err(NftError::NoContributions);
    }

    let image_ref = upload_image(story, &authors, object_store)?;
    let metadata_ref = upload_metadata(story, &authors, &image_ref, object_store, clock)?;

    let token_id = format!(
        "nft_{}_{}",
        story.id,
        &sha256_hex(metadata_ref.as_bytes())[..12]
    );

    let main_author = authors.remove(0);

    Ok(Nft {
        token_id,
        story_id: story.id.clone(),
        title: story.title.clone(),
        summary: story.summary.clone(),
        main_author,
        co_authors: authors,
        image_ref,
        metadata_ref,
        minted_at: clock.now_unix(),
        block_index: 0,
    })
}

/// Fold contributions into per-author shares.
///
/// Authors are ordered by contribution count, ties broken by user id, so the
/// main author is always the first entry.
pub fn aggregate_authors(contributions: &[Contribution]) -> Vec<Author> {
    if contributions.is_empty() {
        return Vec::new();
    }

    let total = contributions.len() as f64;
    let mut authors: Vec<Author> = Vec::new();

    for contribution in contributions {
        match authors
            .iter_mut()
            .find(|a| a.user_id == contribution.contributor_id)
        {
            Some(author) => {
                author.contribution_count += 1;
                author.contributions.push(contribution.clone());
            }
            None => authors.push(Author {
                user_id: contribution.contributor_id.clone(),
                wallet_address: contribution.wallet_address.clone(),
                contribution_count: 1,
                ownership_percentage: 0.0,
                contributions: vec![contribution.clone()],
            }),
        }
    }

    for author in &mut authors {
        author.ownership_percentage = author.contribution_count as f64 / total * 100.0;
    }

    authors.sort_by(|a, b| {
        b.contribution_count
            .cmp(&a.contribution_count)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });

    authors
}

fn upload_image(
    story: &Story,
    authors: &[Author],
    object_store: &dyn ObjectStore,
) -> Result<String, NftError> {
    let payload = json!({
        "story_id": story.id,
        "title": story.title,
        "summary": story.summary,
        "authors": authors,
        "lines": story.contributions,
    });

    Ok(object_store.upload_json(&payload)?)
}

fn upload_metadata(
    story: &Story,
    authors: &[Author],
    image_ref: &str,
    object_store: &dyn ObjectStore,
    clock: &dyn Clock,
) -> Result<String, NftError> {
    let metadata = json!({
        "story_id": story.id,
        "title": story.title,
        "summary": story.summary,
        "image_ref": image_ref,
        "authors": authors,
        "contributions": story.contributions,
        "minted_at": clock.now_unix(),
        "token_hint": &sha256_hex(format!("{}{}", story.id, story.title).as_bytes())[..16],
    });

    Ok(object_store.upload_json(&metadata)?)
}
