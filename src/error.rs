//! Error Types - Resolution, Codec and Batch Failures
//!
//! `MulticallError` is what the public provider surface returns.
//! `CodecError` describes a single call's encode/decode problem and is
//! wrapped with the call's batch position by the executor.
//! `SchemaError` covers parsing of signatures, type tags and JSON ABIs.

use thiserror::Error;

/// Failure of a multicall operation. Every variant fails the whole batch.
#[derive(Debug, Error)]
pub enum MulticallError {
  /// The provider has no aggregator address yet (`init` not called).
  #[error("multicall provider used before the aggregator address was resolved")]
  NotInitialized,

  /// No aggregator is registered for the chain.
  #[error("no multicall contract registered for chain {chain_id}")]
  AddressNotFound {
    /// Chain id that was looked up.
    chain_id: u64,
  },

  /// A descriptor's arguments do not fit its function schema.
  #[error("call #{index} ({function}): failed to encode arguments")]
  Encode {
    /// Position of the call in the batch.
    index: usize,
    /// Canonical signature of the call.
    function: String,
    #[source]
    source: CodecError,
  },

  /// A returned buffer does not match the declared outputs.
  #[error("call #{index} ({function}): failed to decode return data")]
  Decode {
    /// Position of the call in the batch.
    index: usize,
    /// Canonical signature of the call.
    function: String,
    #[source]
    source: CodecError,
  },

  /// The aggregator's own return value could not be decoded.
  #[error("malformed aggregate response: {0}")]
  AggregateResponse(String),

  /// The aggregator returned a different number of results than calls sent.
  #[error("aggregator returned {actual} results for {expected} calls")]
  ResultCountMismatch {
    /// Number of descriptors in the batch.
    expected: usize,
    /// Number of buffers returned.
    actual: usize,
  },

  /// Error from the node client, propagated unchanged.
  #[error("node request failed")]
  Node(#[source] anyhow::Error),
}

/// Encode/decode failure for a single call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
  #[error("expected {expected} arguments, got {actual}")]
  ArgumentCount { expected: usize, actual: usize },

  #[error("argument {position} should be `{expected}`, got `{actual}`")]
  ArgumentType {
    position: usize,
    expected: String,
    actual: String,
  },

  #[error("return data does not match `{expected}`: {reason}")]
  ReturnData { expected: String, reason: String },
}

/// Failure to build a function schema or descriptor from text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
  #[error("invalid ABI type `{ty}`: {reason}")]
  InvalidType { ty: String, reason: String },

  #[error("invalid function signature `{signature}`: {reason}")]
  InvalidSignature { signature: String, reason: String },

  #[error("invalid argument {position} for `{signature}`: {reason}")]
  InvalidArgument {
    signature: String,
    position: usize,
    reason: String,
  },

  #[error("invalid JSON ABI: {0}")]
  InvalidAbi(String),

  #[error("function `{name}` with {arity} arguments not found in ABI")]
  UnknownFunction { name: String, arity: usize },
}

/// Convenience alias used across the crate.
pub type Result<T, E = MulticallError> = std::result::Result<T, E>;
