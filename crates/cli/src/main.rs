//! # Parcel
//!
//! Property resolution service: cache, record store and external provider
//! behind one HTTP API.

mod bootstrap;
mod di;
mod jobs;
mod server;

use bootstrap::cache::CacheBackend;
use clap::Parser;
use parcel_domain::CliOverrides;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "parcel")]
#[command(version)]
#[command(about = "Property resolution service with a write-through cache")]
struct Cli {
    /// Path to configuration file (default: ./parcel.toml when present)
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// Web server port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// SQLite database path
    #[arg(short = 'd', long)]
    database: Option<String>,

    /// Redis URL; the in-process cache is used when absent
    #[arg(long)]
    cache_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        bind_address: cli.bind,
        web_port: cli.port,
        database_path: cli.database,
        cache_url: cli.cache_url,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), overrides)?;
    bootstrap::init_logging(&config);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Parcel");

    let pool = bootstrap::init_database(&config.database).await?;
    let cache = bootstrap::init_cache(&config.cache).await?;
    let state = di::build_app_state(&config, pool.clone(), cache.port())?;

    let shutdown = CancellationToken::new();

    if let CacheBackend::Memory(memory) = &cache {
        Arc::new(jobs::CacheEvictionJob::new(memory.clone()).with_cancellation(shutdown.clone()))
            .start()
            .await;
    }

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
        }
        signal_token.cancel();
    });

    let result = server::start_web_server(&config.server, state, shutdown.clone()).await;

    shutdown.cancel();
    pool.close().await;
    info!("Parcel stopped");

    result
}
