//! Streaming acceptor
//!
//! WebSocket surface for persistent subscribers. Each accepted connection
//! is registered with the subscriber registry and receives every broadcast
//! frame as one binary message until it disconnects or the relay shuts
//! down. The channel is send-mostly: inbound client messages are legal but
//! ignored. There is no reconnection logic; each physical connection is a
//! single, independent lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::connect_info::ConnectInfo;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::any;
use axum::Router;
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::registry::SubscriberRegistry;

/// Lifecycle of one streaming connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    /// Upgrade accepted, not yet registered
    Connecting,
    /// Registered and eligible for broadcast frames
    Open,
    /// Unregistered; the socket is gone or about to be
    Closed,
}

impl std::fmt::Display for ConnectionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let phase = match self {
            ConnectionPhase::Connecting => "connecting",
            ConnectionPhase::Open => "open",
            ConnectionPhase::Closed => "closed",
        };
        f.write_str(phase)
    }
}

/// Build the streaming router
///
/// Viewers connect to the root path, matching the original deployment
/// where the streaming port serves nothing else.
pub fn router(registry: Arc<SubscriberRegistry>) -> Router {
    Router::new().route("/", any(ws_handler)).with_state(registry)
}

async fn ws_handler(
    State(registry): State<Arc<SubscriberRegistry>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, registry, peer))
}

/// Run one streaming connection to completion
///
/// Forwards frames from the registry channel to the socket and drains
/// inbound messages. Exits on send failure, read error, end-of-stream,
/// client close, or registry-side channel closure (shutdown), always
/// unregistering on the way out.
async fn handle_connection(
    socket: WebSocket,
    registry: Arc<SubscriberRegistry>,
    peer: SocketAddr,
) {
    let mut phase = ConnectionPhase::Connecting;
    tracing::debug!(peer = %peer, phase = %phase, "Streaming connection upgraded");

    let (mut ws_tx, mut ws_rx) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Bytes>();

    let id = registry.add(tx).await;
    phase = ConnectionPhase::Open;
    tracing::info!(subscriber = %id, peer = %peer, phase = %phase, "Streaming connection open");

    loop {
        tokio::select! {
            frame = rx.recv() => match frame {
                Some(bytes) => {
                    if let Err(e) = ws_tx.send(Message::Binary(bytes)).await {
                        tracing::debug!(subscriber = %id, error = %e, "Frame send failed");
                        break;
                    }
                }
                None => {
                    // Registry dropped this subscriber (shutdown); close
                    // the socket politely before exiting.
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                }
            },
            inbound = ws_rx.next() => match inbound {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    tracing::debug!(subscriber = %id, error = %e, "Read error");
                    break;
                }
                // Send-mostly channel: inbound content has no effect.
                Some(Ok(_)) => {}
            },
        }
    }

    registry.remove(id).await;
    phase = ConnectionPhase::Closed;
    tracing::info!(subscriber = %id, peer = %peer, phase = %phase, "Streaming connection closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(ConnectionPhase::Connecting.to_string(), "connecting");
        assert_eq!(ConnectionPhase::Open.to_string(), "open");
        assert_eq!(ConnectionPhase::Closed.to_string(), "closed");
    }
}
