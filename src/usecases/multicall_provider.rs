//! Multicall Provider Use Case - Public Batching Client
//!
//! Owns a node client and the resolved aggregator address for its chain.
//! Two ways to build one:
//! - `connect`: async factory, returns a ready provider or a resolution error
//! - `new` + `init`: lazy path; `new` never touches the network and `init`
//!   asks the node for its chain id
//!
//! Until an address is resolved, `all` and `eth_balance` fail with
//! `NotInitialized` without any network call. A chain id given to `new`
//! that has no registry entry is reported as `AddressNotFound` on first use.

use std::sync::Arc;
use std::time::Instant;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::Address;
use tracing::{info, instrument, warn};

use crate::adapters::metrics::{BatchOutcomeLabel, MulticallMetrics};
use crate::domain::aggregator::eth_balance_call;
use crate::domain::call::CallDescriptor;
use crate::domain::registry::MulticallRegistry;
use crate::error::{MulticallError, Result};
use crate::ports::node_client::{CallOverrides, NodeClient};

use super::batch_executor::{execute_batch, BatchOutcome};

/// Resolution state of the aggregator address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Aggregator {
  /// No chain id known yet; `init` has not run.
  Unresolved,
  /// Chain id known but absent from the registry.
  Missing { chain_id: u64 },
  /// Ready to use.
  Resolved { chain_id: u64, address: Address },
}

/// Query the node for its chain id and look it up in `registry`.
///
/// Node failures propagate as `MulticallError::Node`.
pub async fn resolve_from_node<N: NodeClient + ?Sized>(
  registry: &MulticallRegistry,
  node: &N,
) -> Result<(u64, Address)> {
  let chain_id = node.chain_id().await.map_err(MulticallError::Node)?;
  let address = registry.resolve(chain_id)?;
  Ok((chain_id, address))
}

/// Batching client over a single node connection.
pub struct MulticallProvider<N: NodeClient> {
  node: Arc<N>,
  /// Snapshot of the registry taken at construction.
  registry: MulticallRegistry,
  aggregator: Aggregator,
  metrics: Option<Arc<MulticallMetrics>>,
}

impl<N: NodeClient> MulticallProvider<N> {
  /// Create a provider without any network access.
  ///
  /// With `chain_id`, the registry lookup happens immediately.
  pub fn new(node: Arc<N>, chain_id: Option<u64>, registry: &MulticallRegistry) -> Self {
    let aggregator = match chain_id {
      None => Aggregator::Unresolved,
      Some(chain_id) => match registry.resolve(chain_id) {
        Ok(address) => Aggregator::Resolved { chain_id, address },
        Err(_) => Aggregator::Missing { chain_id },
      },
    };

    Self {
      node,
      registry: registry.clone(),
      aggregator,
      metrics: None,
    }
  }

  /// Create a fully initialized provider.
  ///
  /// Queries the node only when `chain_id` is `None`.
  #[instrument(skip(node, registry))]
  pub async fn connect(
    node: Arc<N>,
    chain_id: Option<u64>,
    registry: &MulticallRegistry,
  ) -> Result<Self> {
    let mut provider = Self::new(node, chain_id, registry);
    match provider.aggregator {
      Aggregator::Resolved { .. } => {}
      Aggregator::Missing { chain_id } => {
        return Err(MulticallError::AddressNotFound { chain_id });
      }
      Aggregator::Unresolved => provider.init().await?,
    }
    Ok(provider)
  }

  /// Attach Prometheus metrics recorded for every batch.
  #[must_use]
  pub fn with_metrics(mut self, metrics: Arc<MulticallMetrics>) -> Self {
    self.metrics = Some(metrics);
    self
  }

  /// Resolve the aggregator from the node's chain id.
  ///
  /// Only required if no chain id was passed to `new`.
  #[instrument(skip(self))]
  pub async fn init(&mut self) -> Result<()> {
    match resolve_from_node(&self.registry, self.node.as_ref()).await {
      Ok((chain_id, address)) => {
        self.aggregator = Aggregator::Resolved { chain_id, address };
        info!(chain_id, aggregator = %address, "Multicall aggregator resolved");
        Ok(())
      }
      Err(MulticallError::AddressNotFound { chain_id }) => {
        self.aggregator = Aggregator::Missing { chain_id };
        warn!(chain_id, "No multicall aggregator registered for chain");
        Err(MulticallError::AddressNotFound { chain_id })
      }
      Err(e) => Err(e),
    }
  }

  /// Chain id, once known.
  pub fn chain_id(&self) -> Option<u64> {
    match self.aggregator {
      Aggregator::Unresolved => None,
      Aggregator::Missing { chain_id } | Aggregator::Resolved { chain_id, .. } => Some(chain_id),
    }
  }

  /// Resolved aggregator address, if any.
  pub fn multicall_address(&self) -> Option<Address> {
    match self.aggregator {
      Aggregator::Resolved { address, .. } => Some(address),
      _ => None,
    }
  }

  pub fn node(&self) -> &Arc<N> {
    &self.node
  }

  fn resolved(&self) -> Result<(u64, Address)> {
    match self.aggregator {
      Aggregator::Resolved { chain_id, address } => Ok((chain_id, address)),
      Aggregator::Missing { chain_id } => Err(MulticallError::AddressNotFound { chain_id }),
      Aggregator::Unresolved => Err(MulticallError::NotInitialized),
    }
  }

  /// Descriptor for the aggregator's native-balance getter.
  pub fn eth_balance(&self, account: Address) -> Result<CallDescriptor> {
    let (_, aggregator) = self.resolved()?;
    Ok(eth_balance_call(aggregator, account))
  }

  /// Execute `calls` in one round trip and return one value per call.
  pub async fn all(
    &self,
    calls: &[CallDescriptor],
    overrides: &CallOverrides,
  ) -> Result<Vec<DynSolValue>> {
    Ok(self.all_with_block(calls, overrides).await?.values)
  }

  /// Like [`all`](Self::all), also returning the block number the
  /// aggregator executed at.
  pub async fn all_with_block(
    &self,
    calls: &[CallDescriptor],
    overrides: &CallOverrides,
  ) -> Result<BatchOutcome> {
    let (chain_id, aggregator) = self.resolved()?;

    let started = Instant::now();
    let result = execute_batch(calls, aggregator, self.node.as_ref(), overrides).await;

    if let Some(metrics) = &self.metrics {
      let outcome = if result.is_ok() {
        BatchOutcomeLabel::Success
      } else {
        BatchOutcomeLabel::Failure
      };
      metrics.record_batch(chain_id, calls.len(), outcome, started.elapsed());
    }

    result
  }
}

#[cfg(test)]
mod tests {
  use alloy::primitives::{address, Bytes};
  use async_trait::async_trait;

  use super::*;
  use crate::ports::node_client::ReadCall;

  /// Node stub that fails the test if it is ever called.
  struct UnreachableNode;

  #[async_trait]
  impl NodeClient for UnreachableNode {
    async fn chain_id(&self) -> anyhow::Result<u64> {
      panic!("chain_id must not be queried");
    }

    async fn call(&self, _request: &ReadCall, _overrides: &CallOverrides) -> anyhow::Result<Bytes> {
      panic!("call must not be issued");
    }

    async fn is_healthy(&self) -> bool {
      true
    }
  }

  const ACCOUNT: Address = address!("0000000000000000000000000000000000000abc");

  #[test]
  fn test_new_with_known_chain_resolves_without_network() {
    let registry = MulticallRegistry::with_defaults();
    let provider = MulticallProvider::new(Arc::new(UnreachableNode), Some(1), &registry);

    assert_eq!(provider.chain_id(), Some(1));
    assert_eq!(
      provider.multicall_address(),
      Some(address!("eefba1e63905ef1d7acba5a8513c70307c1ce441"))
    );

    let call = provider.eth_balance(ACCOUNT).unwrap();
    assert_eq!(call.function().signature(), "getEthBalance(address)");
    assert_eq!(call.args(), &[DynSolValue::Address(ACCOUNT)]);
  }

  #[test]
  fn test_unresolved_provider_rejects_use() {
    let registry = MulticallRegistry::with_defaults();
    let provider = MulticallProvider::new(Arc::new(UnreachableNode), None, &registry);

    assert!(matches!(
      provider.eth_balance(ACCOUNT),
      Err(MulticallError::NotInitialized)
    ));

    let result = tokio_test::block_on(provider.all(&[], &CallOverrides::default()));
    assert!(matches!(result, Err(MulticallError::NotInitialized)));
  }

  #[test]
  fn test_unknown_chain_fails_on_first_use() {
    let registry = MulticallRegistry::with_defaults();
    let provider = MulticallProvider::new(Arc::new(UnreachableNode), Some(424_242), &registry);

    assert_eq!(provider.multicall_address(), None);
    assert!(matches!(
      provider.eth_balance(ACCOUNT),
      Err(MulticallError::AddressNotFound { chain_id: 424_242 })
    ));
  }

  #[tokio::test]
  async fn test_connect_with_unknown_chain_fails_without_network() {
    let registry = MulticallRegistry::empty();
    let result = MulticallProvider::connect(Arc::new(UnreachableNode), Some(1), &registry).await;
    assert!(matches!(
      result,
      Err(MulticallError::AddressNotFound { chain_id: 1 })
    ));
  }

  #[tokio::test]
  async fn test_empty_batch_skips_network() {
    let registry = MulticallRegistry::with_defaults();
    let provider = MulticallProvider::new(Arc::new(UnreachableNode), Some(137), &registry);
    let values = provider.all(&[], &CallOverrides::default()).await.unwrap();
    assert!(values.is_empty());
  }
}
