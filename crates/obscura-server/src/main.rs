#![allow(clippy::doc_markdown)]
//! Obscura Server — a privacy-preserving batch-oblivious access proxy.

use std::sync::Arc;

use clap::Parser;
use obscura_core::backend::InMemoryBackend;
use obscura_core::{Engine, Error, ObscuraConfig};
use obscura_server::{router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Obscura Server command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "obscura-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, default_value = "obscura.toml", env = "OBSCURA_CONFIG")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = ObscuraConfig::load_from_path(&args.config).unwrap_or_else(|err| {
        tracing::warn!(%err, path = %args.config, "falling back to default configuration");
        ObscuraConfig::default()
    });
    config.validate().map_err(Error::from).inspect_err(|err| {
        tracing::error!(code = err.code(), %err, "invalid configuration");
    })?;

    tracing::info!("Starting Obscura server...");

    // Backed by the in-process store until a real KV backend is wired
    // in — see `obscura_core::backend::Backend` for the seam.
    let engine = Engine::new(&config, Arc::new(InMemoryBackend::new()));
    let state = Arc::new(AppState { engine });

    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Obscura server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
