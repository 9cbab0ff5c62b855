//! # Ledger Events
//!
//! The typed events that flow through the bus, with their wire names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{Block, Transaction};
use std::fmt;

/// Notification kinds emitted by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A block reached quorum and was appended to the chain.
    #[serde(rename = "block.committed")]
    BlockCommitted,
    /// A transaction entered the pending queue.
    #[serde(rename = "transaction.queued")]
    TransactionQueued,
    /// A transaction was included in a committed block.
    #[serde(rename = "transaction.committed")]
    TransactionCommitted,
    /// A failure surfaced on an asynchronous path (e.g. finalize).
    #[serde(rename = "error")]
    Error,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::BlockCommitted => "block.committed",
            EventKind::TransactionQueued => "transaction.queued",
            EventKind::TransactionCommitted => "transaction.committed",
            EventKind::Error => "error",
        };
        f.write_str(name)
    }
}

/// An event broadcast to subscribers.
///
/// `timestamp` serializes as ISO-8601; `data` carries the event payload as a
/// generic value so the streaming layer can forward it untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
    pub data: Value,
}

impl LedgerEvent {
    fn now(kind: EventKind, data: Value) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
            data,
        }
    }

    /// A block reached quorum and was appended.
    pub fn block_committed(block: &Block) -> Self {
        Self::now(
            EventKind::BlockCommitted,
            serde_json::to_value(block).unwrap_or(Value::Null),
        )
    }

    /// A transaction entered the pending queue.
    pub fn transaction_queued(tx: &Transaction) -> Self {
        Self::now(
            EventKind::TransactionQueued,
            serde_json::to_value(tx).unwrap_or(Value::Null),
        )
    }

    /// A transaction was included in a committed block.
    pub fn transaction_committed(tx: &Transaction) -> Self {
        Self::now(
            EventKind::TransactionCommitted,
            serde_json::to_value(tx).unwrap_or(Value::Null),
        )
    }

    /// A failure surfaced on an asynchronous path.
    pub fn error(message: impl Into<String>) -> Self {
        Self::now(
            EventKind::Error,
            serde_json::json!({ "message": message.into() }),
        )
    }
}
