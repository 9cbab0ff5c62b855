//! # Shared Bus - Commit Event Fan-Out
//!
//! Multi-producer, multi-subscriber event bus with **best-effort, lossy**
//! delivery. The consensus path publishes here and must never block on a slow
//! observer, so each subscriber owns a bounded queue and a full queue drops
//! the event for that subscriber only.
//!
//! ```text
//! ┌──────────────┐                     ┌──────────────┐
//! │  Chain state │   publish()         │  Streaming   │
//! │  Finalizer   │ ──────┐             │  endpoint    │
//! └──────────────┘       │             └──────────────┘
//!                        ▼                     ↑ recv()
//!                  ┌──────────────┐            │
//!                  │  Event Bus   │ ───────────┘
//!                  │ (per-sub     │  subscribe(buffer)
//!                  │  queues)     │
//!                  └──────────────┘
//! ```
//!
//! ## Delivery Contract
//!
//! - A publish-time snapshot is attempted for every then-registered
//!   subscriber; enqueueing never blocks.
//! - Per-subscriber FIFO is whatever the bounded channel offers; there is no
//!   cross-publisher ordering guarantee beyond that.
//! - `close()` closes every subscriber handle and turns further publishes
//!   into no-ops; the streaming layer treats a closed handle as "disconnect".

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{EventKind, LedgerEvent};
pub use publisher::EventBus;
pub use subscriber::{EventReceiver, ReceiveError, SubscriberId};

/// Default per-subscriber queue capacity when `subscribe(0)` is requested.
pub const DEFAULT_SUBSCRIBER_CAPACITY: usize = 16;
