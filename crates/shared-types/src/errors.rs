//! # Shared Type Errors
//!
//! Errors produced while decoding generic payloads into typed records.

use thiserror::Error;

/// Failure to decode a transaction payload into its typed form.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// A recognized `type` tag carried a payload that does not match its
    /// schema.
    #[error("payload for transaction type {kind:?} failed to decode: {source}")]
    Decode {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}
