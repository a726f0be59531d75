//! Subscriber registry implementation
//!
//! The central set of live streaming subscribers. Thread-safe via `RwLock`;
//! broadcasts read a snapshot while accepts and removals continue
//! concurrently. No lock is ever held across a socket write — the registry
//! hands out channel senders, and channel sends do not block.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use tokio::sync::{mpsc, RwLock};

use super::entry::{SubscriberEntry, SubscriberId};

/// Registry of active streaming subscribers
pub struct SubscriberRegistry {
    /// Map of subscriber id to entry; `BTreeMap` keeps snapshot iteration
    /// in insertion (id) order, which makes fan-out deterministic in tests
    subscribers: RwLock<BTreeMap<SubscriberId, SubscriberEntry>>,

    /// Next id to allocate
    next_id: AtomicU64,
}

impl SubscriberRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a new subscriber connection
    ///
    /// Always succeeds; returns the handle used for later removal.
    pub async fn add(&self, sender: mpsc::UnboundedSender<Bytes>) -> SubscriberId {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));

        let mut subscribers = self.subscribers.write().await;
        subscribers.insert(id, SubscriberEntry::new(sender));

        tracing::info!(
            subscriber = %id,
            total = subscribers.len(),
            "Subscriber registered"
        );

        id
    }

    /// Remove a subscriber
    ///
    /// Idempotent: removing an unknown or already-removed id is a no-op.
    /// Returns whether an entry was actually removed.
    pub async fn remove(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.subscribers.write().await;

        if subscribers.remove(&id).is_some() {
            tracing::info!(
                subscriber = %id,
                total = subscribers.len(),
                "Subscriber removed"
            );
            true
        } else {
            false
        }
    }

    /// Point-in-time copy of all live subscribers, in insertion order
    ///
    /// Safe to iterate while adds and removes continue on the registry
    /// proper; the senders are clones of the per-connection channels.
    pub async fn snapshot(&self) -> Vec<(SubscriberId, mpsc::UnboundedSender<Bytes>)> {
        let subscribers = self.subscribers.read().await;
        subscribers
            .iter()
            .map(|(id, entry)| (*id, entry.sender.clone()))
            .collect()
    }

    /// Number of registered subscribers
    pub async fn count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Whether the registry has no subscribers
    pub async fn is_empty(&self) -> bool {
        self.subscribers.read().await.is_empty()
    }

    /// Drop every registered subscriber, closing their frame channels
    ///
    /// Each connection task observes its channel closing and shuts down its
    /// socket. Returns the number of subscribers closed. Used by the
    /// lifecycle coordinator during shutdown.
    pub async fn close_all(&self) -> usize {
        let mut subscribers = self.subscribers.write().await;
        let closed = subscribers.len();
        subscribers.clear();

        if closed > 0 {
            tracing::info!(closed = closed, "All subscriber connections closed");
        }

        closed
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}
