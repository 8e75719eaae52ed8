//! Batch Executor - One `aggregate` Round Trip per Batch
//!
//! Encodes every descriptor, wraps them in a single call to the
//! aggregator's `aggregate((address,bytes)[])`, and decodes each returned
//! buffer against its descriptor's outputs. Position is the only link
//! between a descriptor and its result. Any failure fails the batch.

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolCall;
use tracing::{debug, instrument};

use crate::domain::aggregator::{Call, Multicall};
use crate::domain::call::CallDescriptor;
use crate::error::{MulticallError, Result};
use crate::ports::node_client::{CallOverrides, NodeClient, ReadCall};

/// Decoded values of a batch plus the block it was executed at.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
  /// Block number reported by the aggregator.
  pub block_number: u64,
  /// One decoded value per descriptor, in order.
  pub values: Vec<DynSolValue>,
}

/// Encode the `aggregate` calldata for `descriptors`.
pub fn encode_batch(descriptors: &[CallDescriptor]) -> Result<Bytes> {
  let calls = descriptors
    .iter()
    .enumerate()
    .map(|(index, descriptor)| {
      let call_data = descriptor
        .calldata()
        .map_err(|source| MulticallError::Encode {
          index,
          function: descriptor.function().signature(),
          source,
        })?;
      Ok(Call {
        target: descriptor.target(),
        callData: call_data,
      })
    })
    .collect::<Result<Vec<_>>>()?;

  Ok(Multicall::aggregateCall { calls }.abi_encode().into())
}

/// Decode a raw `aggregate` response against `descriptors`.
pub fn decode_batch(descriptors: &[CallDescriptor], response: &[u8]) -> Result<BatchOutcome> {
  let decoded = Multicall::aggregateCall::abi_decode_returns(response, true)
    .map_err(|e| MulticallError::AggregateResponse(e.to_string()))?;

  if decoded.returnData.len() != descriptors.len() {
    return Err(MulticallError::ResultCountMismatch {
      expected: descriptors.len(),
      actual: decoded.returnData.len(),
    });
  }

  let values = descriptors
    .iter()
    .zip(&decoded.returnData)
    .enumerate()
    .map(|(index, (descriptor, raw))| {
      descriptor
        .decode_output(raw)
        .map_err(|source| MulticallError::Decode {
          index,
          function: descriptor.function().signature(),
          source,
        })
    })
    .collect::<Result<Vec<_>>>()?;

  let block_number = u64::try_from(decoded.blockNumber).map_err(|_| {
    MulticallError::AggregateResponse(format!(
      "block number {} does not fit in u64",
      decoded.blockNumber
    ))
  })?;

  Ok(BatchOutcome {
    block_number,
    values,
  })
}

/// Execute `descriptors` through the aggregator at `aggregator`.
///
/// Issues exactly one node call for a non-empty batch and none for an
/// empty one. Node errors are returned as `MulticallError::Node`.
#[instrument(skip_all, fields(batch_size = descriptors.len(), aggregator = %aggregator))]
pub async fn execute_batch<N: NodeClient + ?Sized>(
  descriptors: &[CallDescriptor],
  aggregator: Address,
  node: &N,
  overrides: &CallOverrides,
) -> Result<BatchOutcome> {
  if descriptors.is_empty() {
    return Ok(BatchOutcome {
      block_number: 0,
      values: Vec::new(),
    });
  }

  let request = ReadCall {
    to: aggregator,
    input: encode_batch(descriptors)?,
  };

  let response = node
    .call(&request, overrides)
    .await
    .map_err(MulticallError::Node)?;

  let outcome = decode_batch(descriptors, &response)?;
  debug!(block_number = outcome.block_number, "Batch decoded");
  Ok(outcome)
}
