//! Domain layer - call descriptors, ABI schemas and the aggregator table.
//!
//! Pure encode/decode logic for multicall batches. Nothing here touches
//! the network; the only external crate is alloy's ABI machinery.

pub mod aggregator;
pub mod call;
pub mod contract;
pub mod registry;
pub mod schema;

// Re-export core types for convenience
pub use aggregator::eth_balance_call;
pub use call::CallDescriptor;
pub use contract::ContractInterface;
pub use registry::MulticallRegistry;
pub use schema::{AbiType, FunctionSchema};
