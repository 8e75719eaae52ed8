//! Chain Adapters - EVM Node Interaction Layer
//!
//! Provides on-chain read access via alloy-rs 0.9:
//! - HTTP RPC provider implementing the `NodeClient` port

pub mod provider;

pub use provider::RpcNodeClient;
