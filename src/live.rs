//! Change notification hub for subscription push.
//!
//! Writers call [`ChangeHub::notify`] after a successful mutation; each
//! subscriber re-runs its read when a notice for its collection arrives.
//! Notices carry no payload — a subscriber that lags simply re-queries once,
//! so a full channel degrades to one extra refresh, never an error.

use tokio::sync::broadcast;

/// The four collections a write can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Activity,
    Tasks,
    Memories,
    Documents,
}

/// Broadcast fan-out of collection-change notices.
#[derive(Debug, Clone)]
pub struct ChangeHub {
    tx: broadcast::Sender<Collection>,
}

impl ChangeHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    /// Announce that `collection` changed. A hub with no subscribers is fine.
    pub fn notify(&self, collection: Collection) {
        let _ = self.tx.send(collection);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Collection> {
        self.tx.subscribe()
    }
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Block until `collection` changes. Returns `false` once the hub is gone.
///
/// A lagged receiver counts as changed — the missed notices all mean
/// "re-run the read", which one refresh covers.
pub async fn wait_for(rx: &mut broadcast::Receiver<Collection>, collection: Collection) -> bool {
    loop {
        match rx.recv().await {
            Ok(c) if c == collection => return true,
            Ok(_) => continue,
            Err(broadcast::error::RecvError::Lagged(_)) => return true,
            Err(broadcast::error::RecvError::Closed) => return false,
        }
    }
}
