//! Relay server binary
//!
//! Bind addresses come from `RELAY_INGEST_ADDR` and `RELAY_STREAM_ADDR`
//! (defaults 0.0.0.0:3002 and 0.0.0.0:3001); log filtering from
//! `RUST_LOG`. Runs until Ctrl-C.

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use splat_relay::{RelayConfig, RelayServer};

fn addr_from_env(var: &str) -> Option<SocketAddr> {
    let value = std::env::var(var).ok()?;
    match value.parse() {
        Ok(addr) => Some(addr),
        Err(e) => {
            eprintln!("Invalid {}: {:?} ({})", var, value, e);
            std::process::exit(2);
        }
    }
}

#[tokio::main]
async fn main() -> splat_relay::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = RelayConfig::default();
    if let Some(addr) = addr_from_env("RELAY_INGEST_ADDR") {
        config = config.ingest_addr(addr);
    }
    if let Some(addr) = addr_from_env("RELAY_STREAM_ADDR") {
        config = config.stream_addr(addr);
    }

    let server = RelayServer::bind(config).await?;
    server.run().await
}
