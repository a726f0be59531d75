//! Subscriber registry
//!
//! Thread-safe set of live streaming subscribers. The streaming acceptor
//! adds and removes entries as connections open and close; the broadcast
//! hub reads point-in-time snapshots for fan-out.
//!
//! ```text
//!                  Arc<SubscriberRegistry>
//!              ┌────────────────────────────┐
//!              │ RwLock<BTreeMap<           │
//!              │   SubscriberId,            │
//!              │   SubscriberEntry {        │
//!              │     sender: mpsc::Sender,  │
//!              │   }                        │
//!              │ >>                         │
//!              └──────────────┬─────────────┘
//!                 snapshot()  │
//!         ┌───────────────────┼───────────────────┐
//!         ▼                   ▼                   ▼
//!   [connection task]   [connection task]   [connection task]
//!   rx.recv() ──► ws    rx.recv() ──► ws    rx.recv() ──► ws
//! ```
//!
//! # Zero-Copy Design
//!
//! Frames travel as `bytes::Bytes`, so the per-subscriber clone performed
//! during fan-out only bumps a reference count; all connection tasks share
//! the same allocation.

pub mod entry;
pub mod store;

pub use entry::{SubscriberEntry, SubscriberId};
pub use store::SubscriberRegistry;
