//! Broadcast hub
//!
//! Fans an encoded wire frame out to every registered subscriber. One
//! failing subscriber never aborts delivery to the rest and never surfaces
//! an error to the ingestion caller; its entry is simply evicted from the
//! registry. Delivery goes through each connection's own channel, so a slow
//! peer delays only its own send loop.
//!
//! There is no liveness check for subscribers: a peer that stops reading
//! without closing its transport is only evicted once the transport reports
//! an error, and its channel buffers without bound until then.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::Notify;

use crate::registry::SubscriberRegistry;

/// Hub that delivers encoded frames to all current subscribers
pub struct BroadcastHub {
    registry: Arc<SubscriberRegistry>,

    /// Set at shutdown; ingestion checks it to reject new work
    closed: AtomicBool,

    /// Number of `publish` calls currently iterating a snapshot
    in_flight: AtomicUsize,

    /// Fired when `in_flight` drops to zero
    drained: Notify,
}

impl BroadcastHub {
    /// Create a hub over the given registry
    pub fn new(registry: Arc<SubscriberRegistry>) -> Self {
        Self {
            registry,
            closed: AtomicBool::new(false),
            in_flight: AtomicUsize::new(0),
            drained: Notify::new(),
        }
    }

    /// The registry this hub fans out to
    pub fn registry(&self) -> &Arc<SubscriberRegistry> {
        &self.registry
    }

    /// Deliver an encoded wire frame to every registered subscriber
    ///
    /// Subscribers whose channel has closed are evicted from the registry;
    /// their failure is not propagated. An empty registry is a no-op, not
    /// an error. Returns the number of subscribers the frame was handed to.
    pub async fn publish(&self, frame: Bytes) -> usize {
        let _guard = InFlightGuard::enter(self);

        let snapshot = self.registry.snapshot().await;
        if snapshot.is_empty() {
            tracing::debug!(bytes = frame.len(), "No subscribers, frame dropped");
            return 0;
        }

        let mut delivered = 0;
        for (id, sender) in snapshot {
            // Bytes clone is a refcount bump, not a copy.
            if sender.send(frame.clone()).is_ok() {
                delivered += 1;
            } else {
                tracing::warn!(subscriber = %id, "Send failed, evicting subscriber");
                self.registry.remove(id).await;
            }
        }

        tracing::debug!(bytes = frame.len(), delivered = delivered, "Frame broadcast");
        delivered
    }

    /// Stop accepting new ingestion work
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    /// Whether the hub has been closed for shutdown
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Wait, bounded by `limit`, for in-flight publishes to finish
    ///
    /// Returns `true` if the hub drained within the bound.
    pub async fn drain(&self, limit: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + limit;

        loop {
            // Register interest before checking, so a publish finishing
            // between the check and the wait cannot be missed.
            let notified = self.drained.notified();

            if self.in_flight.load(Ordering::Acquire) == 0 {
                return true;
            }

            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.in_flight.load(Ordering::Acquire) == 0;
            }
        }
    }
}

/// RAII guard tracking one in-flight publish
struct InFlightGuard<'a> {
    hub: &'a BroadcastHub,
}

impl<'a> InFlightGuard<'a> {
    fn enter(hub: &'a BroadcastHub) -> Self {
        hub.in_flight.fetch_add(1, Ordering::AcqRel);
        Self { hub }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.hub.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.hub.drained.notify_waiters();
        }
    }
}
