//! # Event Publisher
//!
//! The bus itself: subscriber registry, fan-out, and lifecycle.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::debug;

use crate::events::LedgerEvent;
use crate::subscriber::{EventReceiver, SubscriberId};
use crate::DEFAULT_SUBSCRIBER_CAPACITY;

struct BusInner {
    subscribers: HashMap<u64, mpsc::Sender<LedgerEvent>>,
    closed: bool,
}

/// Fan-out bus with one bounded queue per subscriber.
///
/// Publishing snapshots the subscriber list under a read lock, then attempts
/// a non-blocking enqueue on each queue without holding any lock. A full
/// queue drops the event for that subscriber only.
pub struct EventBus {
    inner: RwLock<BusInner>,
    next_id: AtomicU64,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BusInner {
                subscribers: HashMap::new(),
                closed: false,
            }),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register a subscriber with the given queue capacity.
    ///
    /// A capacity of `0` selects [`DEFAULT_SUBSCRIBER_CAPACITY`]. Subscribing
    /// to a closed bus returns a handle that immediately reports closed.
    pub fn subscribe(&self, buffer: usize) -> (SubscriberId, EventReceiver) {
        let capacity = if buffer == 0 {
            DEFAULT_SUBSCRIBER_CAPACITY
        } else {
            buffer
        };

        let (tx, rx) = mpsc::channel(capacity);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;

        {
            let mut inner = self.inner.write();
            if !inner.closed {
                inner.subscribers.insert(id, tx);
            }
            // A closed bus drops the sender here, closing the receiver.
        }

        debug!(subscriber = id, capacity, "subscriber registered");
        (SubscriberId(id), EventReceiver::new(rx))
    }

    /// Remove a subscriber and close its handle.
    pub fn unsubscribe(&self, id: SubscriberId) {
        let removed = self.inner.write().subscribers.remove(&id.0).is_some();
        if removed {
            debug!(subscriber = id.0, "subscriber removed");
        }
    }

    /// Fan an event out to every registered subscriber, best effort.
    ///
    /// Returns the number of subscribers whose queue accepted the event.
    pub fn publish(&self, event: LedgerEvent) -> usize {
        let targets: Vec<(u64, mpsc::Sender<LedgerEvent>)> = {
            let inner = self.inner.read();
            if inner.closed {
                return 0;
            }
            inner
                .subscribers
                .iter()
                .map(|(id, tx)| (*id, tx.clone()))
                .collect()
        };

        let mut delivered = 0;
        for (id, tx) in targets {
            match tx.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    debug!(subscriber = id, kind = %event.kind, "queue full, event dropped");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {}
            }
        }
        delivered
    }

    /// Close the bus: every subscriber handle closes and further publishes
    /// become no-ops. Idempotent.
    pub fn close(&self) {
        let mut inner = self.inner.write();
        if inner.closed {
            return;
        }
        inner.closed = true;
        inner.subscribers.clear();
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.read().subscribers.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
