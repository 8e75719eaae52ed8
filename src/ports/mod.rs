//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `NodeClient`: read-only blockchain node access (`eth_call`, chain id)

pub mod node_client;

pub use node_client::{CallOverrides, NodeClient, ReadCall};
