//! Metrics Adapters
//!
//! Prometheus counters and latency histograms for multicall batches,
//! served on `/metrics` (plus `/live` and `/ready` probes) via axum 0.7.

pub mod prometheus;

pub use prometheus::{readiness, BatchOutcomeLabel, MulticallMetrics};
