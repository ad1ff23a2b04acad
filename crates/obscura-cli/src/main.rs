#![allow(clippy::doc_markdown)]
//! Obscura CLI — command-line driver for the batch-oblivious access
//! proxy.
//!
//! Usage:
//!   `obscura serve --config obscura.toml`
//!   `obscura bench --batches 20`

use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};
use obscura_core::backend::InMemoryBackend;
use obscura_core::{Engine, Error, ObscuraConfig};
use obscura_server::{router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "obscura")]
#[command(author, version, about = "Obscura - a privacy-preserving batch-oblivious access proxy")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server.
    Serve {
        /// Path to a TOML configuration file.
        #[arg(short, long, default_value = "obscura.toml", env = "OBSCURA_CONFIG")]
        config: String,
    },
    /// Drive synthetic batches against an in-process engine and report
    /// cache/decoy statistics.
    Bench {
        /// Number of batches to run.
        #[arg(short, long, default_value_t = 20)]
        batches: usize,
        /// Synthetic read requests submitted per batch.
        #[arg(short, long, default_value_t = 5)]
        reads_per_batch: usize,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(&config).await,
        Commands::Bench { batches, reads_per_batch } => bench(batches, reads_per_batch).await,
    }
}

async fn serve(config_path: &str) -> anyhow::Result<()> {
    let config = ObscuraConfig::load_from_path(config_path).unwrap_or_else(|err| {
        tracing::warn!(%err, path = %config_path, "falling back to default configuration");
        ObscuraConfig::default()
    });
    config.validate().map_err(Error::from).inspect_err(|err| {
        tracing::error!(code = err.code(), %err, "invalid configuration");
    })?;

    let host = config.server.host.clone();
    let port = config.server.port;

    let engine = Engine::new(&config, Arc::new(InMemoryBackend::new()));
    let state = Arc::new(AppState { engine });
    let app = router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Obscura server listening on http://{addr}");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn bench(batches: usize, reads_per_batch: usize) -> anyhow::Result<()> {
    use obscura_core::request::{ClientRequest, Op};

    let config = ObscuraConfig::default();
    let engine = Engine::new(&config, Arc::new(InMemoryBackend::new()));

    let started = Instant::now();
    for batch in 0..batches {
        let requests = (0..reads_per_batch)
            .map(|i| ClientRequest {
                rid: format!("bench-{batch}-{i}"),
                op: Op::Read,
                key: format!("bench_key_{i}"),
                val: None,
            })
            .collect();
        engine.run_batch(requests).await;
    }
    let elapsed = started.elapsed();

    let cache = engine.cache_stats();
    let stats = engine.stats();

    println!("Obscura bench summary");
    println!("----------------------------------------");
    println!("{:<24} {}", "batches run", stats.batches_run);
    println!("{:<24} {:.2?}", "elapsed", elapsed);
    println!("{:<24} {}", "cache hits", cache.hits);
    println!("{:<24} {}", "cache misses", cache.misses);
    println!("{:<24} {}", "cache evictions", cache.evictions);
    println!("{:<24} {:.3}", "cache hit rate", cache.hit_rate());
    println!("{:<24} {}", "dummy reads issued", stats.dummy_reads_issued);
    println!("{:<24} {}", "backend errors", stats.backend_errors);

    Ok(())
}
