//! Prometheus Metrics Registry - Multicall Observability
//!
//! Counts batches and sub-calls per chain and records round-trip
//! latency. Exposed on `/metrics` by the bundled binary, next to the
//! `/live` and `/ready` probes.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};

use crate::ports::node_client::NodeClient;

/// Outcome label values for `multicall_batches_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcomeLabel {
    Success,
    Failure,
}

impl BatchOutcomeLabel {
    fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

/// Centralized Prometheus metrics for multicall batches.
///
/// All metrics follow the naming convention `multicall_*` and carry a
/// `chain_id` label.
pub struct MulticallMetrics {
    /// Prometheus registry.
    registry: Registry,
    /// Batches executed, by outcome.
    pub batches: IntCounterVec,
    /// Sub-calls carried inside batches.
    pub calls: IntCounterVec,
    /// Round-trip latency per batch (milliseconds).
    pub batch_latency_ms: HistogramVec,
}

impl MulticallMetrics {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let batches = IntCounterVec::new(
            Opts::new("multicall_batches_total", "Multicall batches executed"),
            &["chain_id", "outcome"],
        )?;

        let calls = IntCounterVec::new(
            Opts::new(
                "multicall_calls_total",
                "Contract calls submitted inside multicall batches",
            ),
            &["chain_id"],
        )?;

        let batch_latency_ms = HistogramVec::new(
            HistogramOpts::new(
                "multicall_batch_latency_ms",
                "Multicall round-trip latency in milliseconds",
            )
            .buckets(vec![5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 5000.0]),
            &["chain_id"],
        )?;

        registry.register(Box::new(batches.clone()))?;
        registry.register(Box::new(calls.clone()))?;
        registry.register(Box::new(batch_latency_ms.clone()))?;

        Ok(Self {
            registry,
            batches,
            calls,
            batch_latency_ms,
        })
    }

    /// Record one executed batch.
    pub fn record_batch(
        &self,
        chain_id: u64,
        size: usize,
        outcome: BatchOutcomeLabel,
        elapsed: Duration,
    ) {
        let chain = chain_id.to_string();
        self.batches
            .with_label_values(&[chain.as_str(), outcome.as_str()])
            .inc();
        self.calls
            .with_label_values(&[chain.as_str()])
            .inc_by(size as u64);
        self.batch_latency_ms
            .with_label_values(&[chain.as_str()])
            .observe(elapsed.as_secs_f64() * 1000.0);
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if encoder.encode(&metric_families, &mut buffer).is_err() {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }

    /// Serve `/metrics`, `/live` and `/ready` on the configured bind address.
    ///
    /// `/ready` reports the node connection's health.
    #[instrument(skip(self, node, shutdown_rx))]
    pub async fn serve(
        self: Arc<Self>,
        bind_address: String,
        node: Arc<dyn NodeClient>,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> anyhow::Result<()> {
        let metrics_self = Arc::clone(&self);

        let app = Router::new()
            .route(
                "/metrics",
                get(move || {
                    let metrics = Arc::clone(&metrics_self);
                    async move { metrics.render() }
                }),
            )
            .route("/live", get(|| async { "ok" }))
            .route(
                "/ready",
                get(move || {
                    let node = Arc::clone(&node);
                    async move { readiness(node.as_ref()).await }
                }),
            );

        let listener = tokio::net::TcpListener::bind(&bind_address).await?;
        info!(address = %bind_address, "Prometheus metrics server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }
}

/// Readiness probe: 200 when the node answers, 503 otherwise.
pub async fn readiness(node: &dyn NodeClient) -> StatusCode {
    if node.is_healthy().await {
        StatusCode::OK
    } else {
        warn!("Readiness check failed: node unreachable");
        StatusCode::SERVICE_UNAVAILABLE
    }
}
