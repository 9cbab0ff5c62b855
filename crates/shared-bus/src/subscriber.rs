//! # Event Subscriber
//!
//! The receiving half of a bus subscription.

use thiserror::Error;
use tokio::sync::mpsc;

use crate::events::LedgerEvent;

/// Opaque subscriber identity, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub(crate) u64);

/// Errors from non-blocking receives.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveError {
    /// The subscription was closed (unsubscribed, or the bus shut down).
    #[error("event bus subscription closed")]
    Closed,
}

/// A subscription handle delivering events in arrival order.
///
/// The handle closes when the subscriber is removed or the bus shuts down;
/// `recv` then returns `None`.
pub struct EventReceiver {
    rx: mpsc::Receiver<LedgerEvent>,
}

impl EventReceiver {
    pub(crate) fn new(rx: mpsc::Receiver<LedgerEvent>) -> Self {
        Self { rx }
    }

    /// Receive the next event, or `None` once the handle is closed and
    /// drained.
    pub async fn recv(&mut self) -> Option<LedgerEvent> {
        self.rx.recv().await
    }

    /// Non-blocking receive: `Ok(None)` when no event is queued.
    pub fn try_recv(&mut self) -> Result<Option<LedgerEvent>, ReceiveError> {
        match self.rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => Err(ReceiveError::Closed),
        }
    }
}
