//! Node Client Port - Read-only RPC Interface
//!
//! Defines what the multicall layer needs from a blockchain node:
//! the connected chain id and the ability to execute an `eth_call`
//! with caller overrides. Transport, framing and connection handling
//! live entirely in the adapter.

use alloy::eips::BlockId;
use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;

/// A read-only contract call to submit to the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadCall {
  /// Contract to call.
  pub to: Address,
  /// Full calldata (selector + encoded arguments).
  pub input: Bytes,
}

/// Per-call overrides forwarded to the node unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOverrides {
  /// Block to execute against (defaults to the node's `latest`).
  pub block: Option<BlockId>,
  /// Caller address seen by the contracts.
  pub from: Option<Address>,
  /// Gas limit for the call.
  pub gas_limit: Option<u64>,
}

impl CallOverrides {
  /// Overrides pinned to `block`.
  pub fn at_block(block: impl Into<BlockId>) -> Self {
    Self {
      block: Some(block.into()),
      ..Self::default()
    }
  }

  #[must_use]
  pub fn with_from(mut self, from: Address) -> Self {
    self.from = Some(from);
    self
  }

  #[must_use]
  pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
    self.gas_limit = Some(gas_limit);
    self
  }
}

/// Trait for read-only node access.
///
/// Implemented over alloy-rs by `RpcNodeClient`; mocked in tests.
#[async_trait]
pub trait NodeClient: Send + Sync + 'static {
  /// Chain id reported by the connected node.
  async fn chain_id(&self) -> anyhow::Result<u64>;

  /// Execute `eth_call` and return the raw result bytes.
  async fn call(&self, request: &ReadCall, overrides: &CallOverrides) -> anyhow::Result<Bytes>;

  /// Check if the node connection is healthy.
  async fn is_healthy(&self) -> bool;
}
