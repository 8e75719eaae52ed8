//! Use Cases Layer - Application Logic
//!
//! Orchestrates domain encode/decode logic with the node port to
//! implement the crate's workflows.
//!
//! Use cases:
//! - `BatchExecutor`: one `aggregate` round trip per batch
//! - `MulticallProvider`: public client owning the resolved aggregator
//! - `Watcher`: periodic batched reads driven by config

pub mod batch_executor;
pub mod multicall_provider;
pub mod watcher;

pub use batch_executor::{decode_batch, encode_batch, execute_batch, BatchOutcome};
pub use multicall_provider::{resolve_from_node, MulticallProvider};
pub use watcher::Watcher;
