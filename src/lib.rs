//! # splat-relay
//!
//! Relay bridge between a one-shot sender of 3D model snapshots and any
//! number of live viewers. Blobs (point-cloud `.ply` files and their JSON
//! label sidecars) arrive over a plain HTTP POST, are wrapped in a small
//! binary frame, and are fanned out unmodified to every connected
//! WebSocket subscriber.
//!
//! # Architecture
//!
//! ```text
//!   HTTP caller ──► Ingestor ──► protocol::encode ──► BroadcastHub
//!                                                         │ snapshot()
//!                                        ┌────────────────┼────────────────┐
//!                                        ▼                ▼                ▼
//!                                  [ws connection]  [ws connection]  [ws connection]
//!                                        │                │                │
//!                                        ▼                ▼                ▼
//!                                     viewer           viewer           viewer
//! ```
//!
//! Ingestion and delivery are decoupled: an ingest call returns once the
//! frame has been handed to each subscriber's channel, so a slow or absent
//! viewer never blocks the sender. A failing subscriber is evicted and
//! never aborts delivery to the rest.
//!
//! # Example
//!
//! ```no_run
//! use splat_relay::{RelayConfig, RelayServer};
//!
//! #[tokio::main]
//! async fn main() -> splat_relay::Result<()> {
//!     let server = RelayServer::bind(RelayConfig::default()).await?;
//!     server.run().await
//! }
//! ```

pub mod error;
pub mod hub;
pub mod protocol;
pub mod registry;
pub mod server;

pub use error::{Error, Result};
pub use hub::BroadcastHub;
pub use protocol::{Frame, FrameError, FrameKind};
pub use registry::{SubscriberId, SubscriberRegistry};
pub use server::{Ingestor, RelayConfig, RelayServer};
