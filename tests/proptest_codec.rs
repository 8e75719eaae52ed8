//! Property-Based Tests — Batch Codec and Registry Invariants
//!
//! Uses `proptest` to verify that batch results always line up with the
//! submitted calls, and that the registry resolves what was registered.

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{address, Address, Bytes, U256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use proptest::prelude::*;

use multicall_reader::domain::aggregator::{eth_balance_call, Multicall};
use multicall_reader::domain::{CallDescriptor, MulticallRegistry};
use multicall_reader::ports::node_client::{CallOverrides, NodeClient, ReadCall};
use multicall_reader::usecases::{decode_batch, encode_batch, execute_batch};
use multicall_reader::MulticallError;

const AGGREGATOR: Address = address!("1111111111111111111111111111111111111111");

fn balance_calls(accounts: &[[u8; 20]]) -> Vec<CallDescriptor> {
    accounts
        .iter()
        .map(|raw| eth_balance_call(AGGREGATOR, Address::from(*raw)))
        .collect()
}

fn aggregate_response(block: u64, values: &[u64]) -> Vec<u8> {
    DynSolValue::Tuple(vec![
        DynSolValue::Uint(U256::from(block), 256),
        DynSolValue::Array(
            values
                .iter()
                .map(|v| DynSolValue::Bytes(DynSolValue::Uint(U256::from(*v), 256).abi_encode()))
                .collect(),
        ),
    ])
    .abi_encode_params()
}

/// Node stub that answers each `getEthBalance(addr)` with the account's
/// last byte, so every result identifies the call it belongs to.
struct EchoNode;

#[async_trait]
impl NodeClient for EchoNode {
    async fn chain_id(&self) -> anyhow::Result<u64> {
        Ok(1)
    }

    async fn call(&self, request: &ReadCall, _overrides: &CallOverrides) -> anyhow::Result<Bytes> {
        let batch = Multicall::aggregateCall::abi_decode(&request.input, true)?;
        let values = batch
            .calls
            .iter()
            .map(|call| {
                let inner = Multicall::getEthBalanceCall::abi_decode(&call.callData, true)?;
                Ok(u64::from(inner.addr.0[19]))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(aggregate_response(1, &values).into())
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}

// ── Batch Codec Properties ──────────────────────────────────

proptest! {
    /// Encoding keeps one inner call per descriptor, in order.
    #[test]
    fn encode_preserves_count_and_order(
        accounts in prop::collection::vec(any::<[u8; 20]>(), 1..16),
    ) {
        let calls = balance_calls(&accounts);
        let data = encode_batch(&calls).unwrap();
        let batch = Multicall::aggregateCall::abi_decode(&data, true).unwrap();

        prop_assert_eq!(batch.calls.len(), calls.len());
        for (inner, descriptor) in batch.calls.iter().zip(&calls) {
            prop_assert_eq!(inner.target, descriptor.target());
            prop_assert_eq!(&inner.callData, &descriptor.calldata().unwrap());
        }
    }

    /// Decoded values line up with the returned buffers by index.
    #[test]
    fn decode_maps_values_by_index(
        values in prop::collection::vec(any::<u64>(), 1..16),
        block in any::<u64>(),
    ) {
        let accounts = vec![[0u8; 20]; values.len()];
        let calls = balance_calls(&accounts);
        let outcome = decode_batch(&calls, &aggregate_response(block, &values)).unwrap();

        prop_assert_eq!(outcome.block_number, block);
        prop_assert_eq!(outcome.values.len(), values.len());
        for (decoded, expected) in outcome.values.iter().zip(&values) {
            prop_assert_eq!(decoded, &DynSolValue::Uint(U256::from(*expected), 256));
        }
    }

    /// Any difference between calls sent and results returned fails the batch.
    #[test]
    fn decode_rejects_count_mismatch(
        sent in 1usize..10,
        returned in 0usize..10,
    ) {
        prop_assume!(sent != returned);
        let calls = balance_calls(&vec![[0u8; 20]; sent]);
        let response = aggregate_response(1, &vec![0u64; returned]);

        let is_mismatch = matches!(
            decode_batch(&calls, &response),
            Err(MulticallError::ResultCountMismatch { expected, actual })
                if expected == sent && actual == returned
        );
        prop_assert!(is_mismatch);
    }

    /// A full round trip through a node returns each call's own result.
    #[test]
    fn execute_results_follow_call_order(
        accounts in prop::collection::vec(any::<[u8; 20]>(), 0..12),
    ) {
        let calls = balance_calls(&accounts);
        let outcome = tokio_test::block_on(execute_batch(
            &calls,
            AGGREGATOR,
            &EchoNode,
            &CallOverrides::default(),
        ))
        .unwrap();

        prop_assert_eq!(outcome.values.len(), accounts.len());
        for (value, account) in outcome.values.iter().zip(&accounts) {
            prop_assert_eq!(value, &DynSolValue::Uint(U256::from(account[19]), 256));
        }
    }
}

// ── Registry Properties ─────────────────────────────────────

proptest! {
    /// The last address registered for a chain is the one resolved.
    #[test]
    fn register_then_resolve(
        chain_id in any::<u64>(),
        first in any::<[u8; 20]>(),
        second in any::<[u8; 20]>(),
    ) {
        let mut registry = MulticallRegistry::with_defaults();
        registry.register(chain_id, Address::from(first));
        prop_assert_eq!(registry.resolve(chain_id).unwrap(), Address::from(first));

        let previous = registry.register(chain_id, Address::from(second));
        prop_assert_eq!(previous, Some(Address::from(first)));
        prop_assert_eq!(registry.resolve(chain_id).unwrap(), Address::from(second));
    }

    /// Unregistered chains never resolve.
    #[test]
    fn empty_registry_never_resolves(chain_id in any::<u64>()) {
        let registry = MulticallRegistry::empty();
        let is_not_found = matches!(
            registry.resolve(chain_id),
            Err(MulticallError::AddressNotFound { chain_id: c }) if c == chain_id
        );
        prop_assert!(is_not_found);
    }
}
