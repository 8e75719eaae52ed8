//! Configuration Module - TOML-based Reader Configuration
//!
//! Loads and validates configuration from `config.toml`.
//! The node endpoint, aggregator overrides and the watched accounts
//! and calls are all externalized here.

pub mod loader;

use std::str::FromStr;

use alloy::eips::{BlockId, BlockNumberOrTag};
use alloy::primitives::Address;
use serde::Deserialize;

/// Top-level configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated
/// before the first batch is sent.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Identity and logging.
  pub app: AppSection,
  /// Node endpoint.
  pub node: NodeConfig,
  /// Aggregator address overrides.
  #[serde(default)]
  pub multicall: MulticallConfig,
  /// What to read on every poll.
  pub watch: WatchConfig,
  /// Metrics and monitoring.
  #[serde(default)]
  pub metrics: MetricsConfig,
}

/// Identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
  /// Human-readable instance name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

/// Node endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
  /// HTTP JSON-RPC endpoint.
  pub rpc_url: String,
  /// Expected chain id. When absent the node is asked for it.
  #[serde(default)]
  pub chain_id: Option<u64>,
}

/// Aggregator registry overrides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MulticallConfig {
  /// Entries registered on top of the built-in table.
  #[serde(default)]
  pub addresses: Vec<AggregatorOverride>,
}

/// A single chain id → aggregator address entry.
#[derive(Debug, Clone, Deserialize)]
pub struct AggregatorOverride {
  pub chain_id: u64,
  pub address: Address,
}

/// Accounts and calls read on every poll.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
  /// Accounts whose native balance is read.
  #[serde(default)]
  pub accounts: Vec<Address>,
  /// Arbitrary view calls.
  #[serde(default)]
  pub calls: Vec<CallConfig>,
  /// Block tag or decimal number to read at.
  #[serde(default = "default_block")]
  pub block: String,
  /// Seconds between polls; 0 reads once and exits.
  #[serde(default = "default_poll_interval")]
  pub poll_interval_seconds: u64,
}

impl WatchConfig {
  /// Parse `block` into a block id.
  ///
  /// Accepts `latest`, `pending`, `safe`, `finalized`, `earliest`,
  /// a decimal number or a `0x`-prefixed hex number.
  pub fn block_id(&self) -> anyhow::Result<BlockId> {
    let raw = self.block.trim();
    if let Ok(number) = raw.parse::<u64>() {
      return Ok(BlockId::number(number));
    }
    let tag = BlockNumberOrTag::from_str(raw)
      .map_err(|e| anyhow::anyhow!("Invalid block `{raw}`: {e}"))?;
    Ok(BlockId::Number(tag))
  }
}

/// A view call declared in config.
#[derive(Debug, Clone, Deserialize)]
pub struct CallConfig {
  /// Name used in logs.
  pub label: String,
  /// Contract to call.
  pub target: Address,
  /// Human-readable signature, e.g. `balanceOf(address)(uint256)`.
  pub signature: String,
  /// Arguments as strings, coerced to the signature's input types.
  #[serde(default)]
  pub args: Vec<String>,
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
  /// Enable Prometheus metrics export.
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// Metrics server bind address.
  #[serde(default = "default_metrics_addr")]
  pub bind_address: String,
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self {
      enabled: default_true(),
      bind_address: default_metrics_addr(),
    }
  }
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

fn default_true() -> bool {
  true
}

fn default_block() -> String {
  "latest".to_string()
}

fn default_poll_interval() -> u64 {
  30
}

fn default_metrics_addr() -> String {
  "0.0.0.0:9090".to_string()
}
