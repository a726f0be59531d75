//! Subscriber entry types

use std::time::Instant;

use bytes::Bytes;
use tokio::sync::mpsc;

/// Opaque handle for a registered subscriber
///
/// Ids are allocated monotonically, so ascending id order equals insertion
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(pub(crate) u64);

impl SubscriberId {
    /// Raw id value, for logging
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "subscriber-{}", self.0)
    }
}

/// Registry-side state for one live subscriber
///
/// The registry owns the sending half of the connection's frame channel;
/// the connection task owns the receiving half and pumps frames onto the
/// socket. Dropping the sender is the close signal for the task.
#[derive(Debug)]
pub struct SubscriberEntry {
    /// Channel into the connection's send loop
    pub sender: mpsc::UnboundedSender<Bytes>,

    /// When the subscriber was registered
    pub connected_at: Instant,
}

impl SubscriberEntry {
    /// Create an entry wrapping a connection's frame channel
    pub fn new(sender: mpsc::UnboundedSender<Bytes>) -> Self {
        Self {
            sender,
            connected_at: Instant::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_ordering_matches_allocation() {
        let a = SubscriberId(1);
        let b = SubscriberId(2);

        assert!(a < b);
        assert_eq!(a.value(), 1);
        assert_eq!(a.to_string(), "subscriber-1");
    }

    #[test]
    fn test_entry_holds_open_channel() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let entry = SubscriberEntry::new(tx);

        entry.sender.send(Bytes::from_static(b"frame")).unwrap();
        assert_eq!(rx.try_recv().unwrap(), Bytes::from_static(b"frame"));
    }
}
