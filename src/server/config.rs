//! Relay server configuration

use std::net::SocketAddr;
use std::time::Duration;

/// Relay server configuration options
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Address for the one-shot HTTP ingestion surface
    pub ingest_addr: SocketAddr,

    /// Address for the persistent WebSocket streaming surface
    pub stream_addr: SocketAddr,

    /// Bound on waiting for in-flight broadcasts during shutdown
    pub drain_timeout: Duration,

    /// Maximum accepted blob size in bytes
    pub max_blob_size: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            // Port split inherited from the original deployment: viewers
            // stream from 3001, senders post to 3002.
            ingest_addr: "0.0.0.0:3002".parse().unwrap(),
            stream_addr: "0.0.0.0:3001".parse().unwrap(),
            drain_timeout: Duration::from_secs(5),
            max_blob_size: 256 * 1024 * 1024, // 256MB, model snapshots are large
        }
    }
}

impl RelayConfig {
    /// Set the ingestion bind address
    pub fn ingest_addr(mut self, addr: SocketAddr) -> Self {
        self.ingest_addr = addr;
        self
    }

    /// Set the streaming bind address
    pub fn stream_addr(mut self, addr: SocketAddr) -> Self {
        self.stream_addr = addr;
        self
    }

    /// Set the shutdown drain bound
    pub fn drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    /// Set the maximum accepted blob size
    pub fn max_blob_size(mut self, bytes: usize) -> Self {
        self.max_blob_size = bytes;
        self
    }
}
