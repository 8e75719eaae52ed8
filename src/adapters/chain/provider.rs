//! RPC Node Client - alloy-rs 0.9 Connection Management
//!
//! Manages the HTTP connection to an EVM node via alloy-rs and
//! implements the `NodeClient` port on top of it. Validates the chain
//! id at startup when one is configured.
//!
//! In alloy 0.9, `ProviderBuilder::new().on_http()` returns a provider
//! over the concrete HTTP transport. It is boxed onto `BoxTransport` and
//! stored as a type-erased `dyn Provider`.

use std::sync::Arc;

use alloy::primitives::Bytes;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::config::NodeConfig;
use crate::ports::node_client::{CallOverrides, NodeClient, ReadCall};

/// Read-only node client backed by an alloy HTTP provider.
///
/// Holds the provider as `dyn Provider` (over `BoxTransport`) so the
/// transport type does not leak out of the adapter.
pub struct RpcNodeClient {
    /// The alloy HTTP provider (type-erased).
    provider: Arc<dyn Provider + Send + Sync>,
}

impl RpcNodeClient {
    /// Connect to the configured RPC endpoint.
    ///
    /// If `config.chain_id` is set, the node must report the same id.
    #[instrument(skip_all)]
    pub async fn connect(config: &NodeConfig) -> Result<Self> {
        let client = Self::http(&config.rpc_url)?;

        let chain_id = client
            .provider
            .get_chain_id()
            .await
            .context("Failed to query chain ID")?;

        if let Some(expected) = config.chain_id {
            anyhow::ensure!(
                chain_id == expected,
                "Expected chain_id={expected}, node reports {chain_id}"
            );
        }

        info!(chain_id, "Connected to RPC node");
        Ok(client)
    }

    /// Build an HTTP client without contacting the node.
    pub fn http(rpc_url: &str) -> Result<Self> {
        // alloy 0.9: on_http() is synchronous; boxed() erases the transport
        // so the provider fits `dyn Provider` (BoxTransport).
        let provider = ProviderBuilder::new()
            .on_http(rpc_url.parse().context("Invalid RPC URL")?)
            .boxed();

        Ok(Self::from_provider(Arc::new(provider)))
    }

    /// Wrap an already-built alloy provider.
    pub fn from_provider(provider: Arc<dyn Provider + Send + Sync>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl NodeClient for RpcNodeClient {
    #[instrument(skip(self))]
    async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .context("Failed to query chain ID")
    }

    #[instrument(skip_all, fields(to = %request.to, input_len = request.input.len()))]
    async fn call(&self, request: &ReadCall, overrides: &CallOverrides) -> Result<Bytes> {
        let mut tx = TransactionRequest::default()
            .to(request.to)
            .input(request.input.clone().into());

        if let Some(from) = overrides.from {
            tx = tx.from(from);
        }
        if let Some(gas_limit) = overrides.gas_limit {
            tx = tx.gas_limit(gas_limit);
        }

        let call = self.provider.call(&tx);
        let call = match overrides.block {
            Some(block) => call.block(block),
            None => call,
        };

        let output = call.await.context("eth_call failed")?;
        debug!(output_len = output.len(), "eth_call returned");
        Ok(output)
    }

    async fn is_healthy(&self) -> bool {
        self.provider.get_block_number().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_builds_without_network() {
        assert!(RpcNodeClient::http("http://localhost:8545").is_ok());
    }

    #[test]
    fn test_http_client_rejects_invalid_url() {
        assert!(RpcNodeClient::http("not a url").is_err());
    }
}
