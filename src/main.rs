//! Multicall Reader — Entry Point
//!
//! Reads the configured balances and view calls through a multicall
//! aggregator, one batch per poll. Runs until SIGINT, or exits after a
//! single poll when `poll_interval_seconds = 0`.
//!
//! Wiring sequence:
//! 1. Load config.toml (path from argv[1]) + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Connect the RPC node client (validates chain id if configured)
//! 4. Build the aggregator registry (defaults + config overrides)
//! 5. Spawn the metrics server (/metrics, /live, /ready) on the configured address
//! 6. Resolve the aggregator and build the provider
//! 7. Spawn the watcher loop
//! 8. Wait for SIGINT or watcher completion → graceful shutdown

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

use multicall_reader::adapters::chain::RpcNodeClient;
use multicall_reader::adapters::metrics::MulticallMetrics;
use multicall_reader::config;
use multicall_reader::domain::MulticallRegistry;
use multicall_reader::ports::NodeClient;
use multicall_reader::usecases::{MulticallProvider, Watcher};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = config::loader::load_config(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.app.log_level)
                }),
        )
        .json()
        .init();

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        accounts = config.watch.accounts.len(),
        calls = config.watch.calls.len(),
        "Starting multicall reader"
    );

    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);

    // ── 3. Connect to the node ──────────────────────────────
    let node = Arc::new(
        RpcNodeClient::connect(&config.node)
            .await
            .context("Failed to connect to RPC node")?,
    );

    // ── 4. Aggregator registry ──────────────────────────────
    let mut registry = MulticallRegistry::with_defaults();
    for entry in &config.multicall.addresses {
        if let Some(previous) = registry.register(entry.chain_id, entry.address) {
            info!(
                chain_id = entry.chain_id,
                previous = %previous,
                address = %entry.address,
                "Overriding built-in aggregator address"
            );
        }
    }

    // ── 5. Metrics server ───────────────────────────────────
    let metrics = Arc::new(MulticallMetrics::new().context("Failed to create metrics")?);
    let metrics_handle = if config.metrics.enabled {
        let server = Arc::clone(&metrics);
        let health_node: Arc<dyn NodeClient> = node.clone();
        let bind_address = config.metrics.bind_address.clone();
        let shutdown = shutdown_tx.subscribe();
        Some(tokio::spawn(async move {
            if let Err(e) = server.serve(bind_address, health_node, shutdown).await {
                error!(error = %e, "Metrics server failed");
            }
        }))
    } else {
        None
    };

    // ── 6. Resolve the aggregator ───────────────────────────
    let provider = MulticallProvider::connect(node, config.node.chain_id, &registry)
        .await
        .context("Failed to resolve multicall aggregator")?
        .with_metrics(Arc::clone(&metrics));

    info!(
        chain_id = ?provider.chain_id(),
        aggregator = ?provider.multicall_address(),
        "Multicall provider ready"
    );

    // ── 7. Spawn the watcher ────────────────────────────────
    let watcher = Watcher::from_config(Arc::new(provider), &config.watch)?;
    let watcher_shutdown = shutdown_tx.subscribe();
    let mut watcher_handle = tokio::spawn(async move {
        if let Err(e) = watcher.run(watcher_shutdown).await {
            error!(error = %e, "Watcher failed");
        }
    });

    // ── 8. Wait for SIGINT or a one-shot watcher to finish ──
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("SIGINT received, initiating graceful shutdown");
            let _ = shutdown_tx.send(());
            let _ = tokio::time::timeout(
                std::time::Duration::from_secs(5),
                &mut watcher_handle,
            )
            .await;
        }
        _ = &mut watcher_handle => {
            info!("Watcher finished");
            let _ = shutdown_tx.send(());
        }
    }

    if let Some(handle) = metrics_handle {
        let _ = tokio::time::timeout(std::time::Duration::from_secs(5), handle).await;
    }

    info!("Shutdown complete");
    Ok(())
}
