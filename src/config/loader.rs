//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::domain::call::CallDescriptor;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    accounts = config.watch.accounts.len(),
    calls = config.watch.calls.len(),
    chain_id = ?config.node.chain_id,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig =
    toml::from_str(content).with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - A non-empty RPC URL
/// - At least one account or call to watch
/// - Parseable block selector
/// - Call signatures and arguments that encode
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.node.rpc_url.trim().is_empty(),
    "node.rpc_url must not be empty"
  );

  anyhow::ensure!(
    !config.watch.accounts.is_empty() || !config.watch.calls.is_empty(),
    "At least one account or call must be watched"
  );

  config.watch.block_id()?;

  for (i, call) in config.watch.calls.iter().enumerate() {
    anyhow::ensure!(
      !call.label.is_empty(),
      "Call {} ({}) has empty label",
      i,
      call.signature
    );
    let descriptor = CallDescriptor::from_strings(call.target, &call.signature, &call.args)
      .with_context(|| format!("Call {} ({}) is invalid", i, call.label))?;
    descriptor
      .calldata()
      .with_context(|| format!("Call {} ({}) cannot be encoded", i, call.label))?;
  }

  for entry in &config.multicall.addresses {
    anyhow::ensure!(
      !entry.address.is_zero(),
      "Aggregator override for chain {} is the zero address",
      entry.chain_id
    );
  }

  if config.metrics.enabled {
    anyhow::ensure!(
      !config.metrics.bind_address.is_empty(),
      "metrics.bind_address must not be empty when metrics are enabled"
    );
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use alloy::eips::{BlockId, BlockNumberOrTag};

  use super::*;

  const VALID: &str = r#"
    [app]
    name = "reader"

    [node]
    rpc_url = "http://localhost:8545"
    chain_id = 137

    [[multicall.addresses]]
    chain_id = 31337
    address = "0xcA11bde05977b3631167028862bE2a173976CA11"

    [watch]
    accounts = ["0xd8da6bf26964af9d7eed9e03e53415d37aa96045"]
    block = "finalized"

    [[watch.calls]]
    label = "usdc-balance"
    target = "0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359"
    signature = "balanceOf(address)(uint256)"
    args = ["0xd8da6bf26964af9d7eed9e03e53415d37aa96045"]
  "#;

  #[test]
  fn test_load_nonexistent_file() {
    let result = load_config("nonexistent.toml");
    assert!(result.is_err());
  }

  #[test]
  fn test_parse_valid_config_with_defaults() {
    let config = parse_config(VALID).unwrap();
    assert_eq!(config.app.log_level, "info");
    assert_eq!(config.node.chain_id, Some(137));
    assert_eq!(config.multicall.addresses.len(), 1);
    assert_eq!(config.watch.poll_interval_seconds, 30);
    assert_eq!(config.watch.calls[0].args.len(), 1);
    assert!(config.metrics.enabled);
    assert_eq!(
      config.watch.block_id().unwrap(),
      BlockId::Number(BlockNumberOrTag::Finalized)
    );
  }

  #[test]
  fn test_rejects_empty_watch_list() {
    let content = r#"
      [app]
      name = "reader"
      [node]
      rpc_url = "http://localhost:8545"
      [watch]
    "#;
    assert!(parse_config(content).is_err());
  }

  #[test]
  fn test_rejects_bad_call_signature() {
    let content = VALID.replace("balanceOf(address)(uint256)", "balanceOf(address");
    assert!(parse_config(&content).is_err());
  }

  #[test]
  fn test_block_selector_forms() {
    let mut config = parse_config(VALID).unwrap();
    config.watch.block = "19000000".to_string();
    assert_eq!(config.watch.block_id().unwrap(), BlockId::number(19_000_000));

    config.watch.block = "0x10".to_string();
    assert_eq!(config.watch.block_id().unwrap(), BlockId::number(16));

    config.watch.block = "yesterday".to_string();
    assert!(config.watch.block_id().is_err());
  }
}
