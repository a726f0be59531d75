//! Relay server
//!
//! Binds and coordinates the two surfaces of the relay: the one-shot HTTP
//! ingestion endpoint and the persistent WebSocket streaming endpoint.
//! The surfaces start and stop independently; a single shutdown signal
//! stops both, closes every subscriber connection, and drains in-flight
//! broadcasts within a bounded timeout.

pub mod config;
pub mod ingest;
pub mod stream;

pub use config::RelayConfig;
pub use ingest::Ingestor;
pub use stream::ConnectionPhase;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::hub::BroadcastHub;
use crate::registry::SubscriberRegistry;

/// The relay server: both surfaces plus their shared hub and registry
pub struct RelayServer {
    config: RelayConfig,
    registry: Arc<SubscriberRegistry>,
    hub: Arc<BroadcastHub>,
    ingestor: Arc<Ingestor>,
    ingest_listener: TcpListener,
    stream_listener: TcpListener,
    ingest_addr: SocketAddr,
    stream_addr: SocketAddr,
}

impl RelayServer {
    /// Bind both listeners and wire up registry, hub, and ingestor
    ///
    /// Binding up front makes the actual addresses available before the
    /// server runs, which matters when the config asks for port 0.
    pub async fn bind(config: RelayConfig) -> Result<Self> {
        let ingest_listener = TcpListener::bind(config.ingest_addr).await?;
        let stream_listener = TcpListener::bind(config.stream_addr).await?;
        let ingest_addr = ingest_listener.local_addr()?;
        let stream_addr = stream_listener.local_addr()?;

        let registry = Arc::new(SubscriberRegistry::new());
        let hub = Arc::new(BroadcastHub::new(Arc::clone(&registry)));
        let ingestor = Arc::new(Ingestor::new(Arc::clone(&hub)));

        Ok(Self {
            config,
            registry,
            hub,
            ingestor,
            ingest_listener,
            stream_listener,
            ingest_addr,
            stream_addr,
        })
    }

    /// Actual address of the ingestion surface
    pub fn ingest_addr(&self) -> SocketAddr {
        self.ingest_addr
    }

    /// Actual address of the streaming surface
    pub fn stream_addr(&self) -> SocketAddr {
        self.stream_addr
    }

    /// The shared subscriber registry
    pub fn registry(&self) -> &Arc<SubscriberRegistry> {
        &self.registry
    }

    /// The shared broadcast hub
    pub fn hub(&self) -> &Arc<BroadcastHub> {
        &self.hub
    }

    /// The ingestor, for in-process blob submission
    pub fn ingestor(&self) -> &Arc<Ingestor> {
        &self.ingestor
    }

    /// Run both surfaces until Ctrl-C
    pub async fn run(self) -> Result<()> {
        let ctrl_c = async {
            let _ = tokio::signal::ctrl_c().await;
        };
        self.run_until(ctrl_c).await
    }

    /// Run both surfaces until the shutdown future resolves
    ///
    /// Shutdown sequence: stop accepting on both surfaces and reject new
    /// ingestion, close every subscriber connection, wait (bounded by the
    /// configured drain timeout) for in-flight broadcasts and the serve
    /// tasks to finish, then report.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let token = CancellationToken::new();

        let ingest_app = ingest::router(Arc::clone(&self.ingestor), self.config.max_blob_size);
        let ingest_serve = axum::serve(self.ingest_listener, ingest_app)
            .with_graceful_shutdown(token.clone().cancelled_owned());
        let mut ingest_task: JoinHandle<std::io::Result<()>> =
            tokio::spawn(async move { ingest_serve.await });

        let stream_app = stream::router(Arc::clone(&self.registry));
        let stream_serve = axum::serve(
            self.stream_listener,
            stream_app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(token.clone().cancelled_owned());
        let mut stream_task: JoinHandle<std::io::Result<()>> =
            tokio::spawn(async move { stream_serve.await });

        tracing::info!(
            ingest = %self.ingest_addr,
            stream = %self.stream_addr,
            "Relay serving"
        );

        tokio::select! {
            _ = shutdown => {
                tracing::info!("Shutdown signal received");
            }
            res = &mut ingest_task => {
                tracing::error!("Ingestion surface exited unexpectedly");
                token.cancel();
                self.hub.close();
                self.registry.close_all().await;
                return flatten(res);
            }
            res = &mut stream_task => {
                tracing::error!("Streaming surface exited unexpectedly");
                token.cancel();
                self.hub.close();
                self.registry.close_all().await;
                return flatten(res);
            }
        }

        // Stop accepting new connections and reject new ingestion.
        self.hub.close();
        token.cancel();

        // Close every registered subscriber; their connection tasks see
        // the channel close and shut their sockets.
        self.registry.close_all().await;

        // Bounded wait for any publish still iterating its snapshot.
        if !self.hub.drain(self.config.drain_timeout).await {
            tracing::warn!("Drain timed out with broadcasts still in flight");
        }

        let joined = tokio::time::timeout(self.config.drain_timeout, async {
            let ingest_res = flatten(ingest_task.await);
            let stream_res = flatten(stream_task.await);
            ingest_res.and(stream_res)
        })
        .await;

        match joined {
            Ok(result) => {
                result?;
                tracing::info!("Relay shut down cleanly");
                Ok(())
            }
            Err(_) => {
                tracing::warn!("Timed out waiting for server tasks to stop");
                Ok(())
            }
        }
    }
}

fn flatten(res: std::result::Result<std::io::Result<()>, tokio::task::JoinError>) -> Result<()> {
    match res {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e.into()),
        Err(e) => Err(std::io::Error::other(e).into()),
    }
}
