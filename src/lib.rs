//! Multicall Reader — Library Root
//!
//! Batches read-only contract calls through an on-chain multicall
//! aggregator and decodes each result against its call's return types.
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use std::sync::Arc;
//!
//! use multicall_reader::adapters::chain::RpcNodeClient;
//! use multicall_reader::config::NodeConfig;
//! use multicall_reader::domain::{CallDescriptor, MulticallRegistry};
//! use multicall_reader::ports::CallOverrides;
//! use multicall_reader::usecases::MulticallProvider;
//!
//! let node = RpcNodeClient::connect(&NodeConfig {
//!     rpc_url: "http://localhost:8545".to_string(),
//!     chain_id: None,
//! })
//! .await?;
//! let registry = MulticallRegistry::with_defaults();
//! let provider = MulticallProvider::connect(Arc::new(node), None, &registry).await?;
//!
//! let holder = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".parse()?;
//! let usdc = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".parse()?;
//! let calls = vec![
//!     provider.eth_balance(holder)?,
//!     CallDescriptor::from_strings(usdc, "balanceOf(address)(uint256)", &[holder.to_string()])?,
//! ];
//! let values = provider.all(&calls, &CallOverrides::default()).await?;
//! assert_eq!(values.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod usecases;

pub use error::{CodecError, MulticallError, SchemaError};
