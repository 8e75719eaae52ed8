//! Multicall aggregator contract interface.
//!
//! The aggregator exposes `aggregate((address,bytes)[])`, which executes
//! every sub-call with `STATICCALL` semantics and reverts if any of them
//! reverts, plus a handful of block/account getters. The getters are exposed
//! here as ready-made `CallDescriptor`s targeting the aggregator itself.

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, U256};
use alloy::sol;

use super::call::CallDescriptor;
use super::schema::{AbiType, FunctionSchema};

sol! {
    /// One `(target, calldata)` pair inside an `aggregate` batch.
    #[derive(Debug, PartialEq, Eq)]
    struct Call {
        address target;
        bytes callData;
    }

    interface Multicall {
        function aggregate(Call[] calls) external view returns (uint256 blockNumber, bytes[] returnData);
        function getEthBalance(address addr) external view returns (uint256 balance);
        function getBlockHash(uint256 blockNumber) external view returns (bytes32 blockHash);
        function getLastBlockHash() external view returns (bytes32 blockHash);
        function getCurrentBlockTimestamp() external view returns (uint256 timestamp);
        function getCurrentBlockDifficulty() external view returns (uint256 difficulty);
        function getCurrentBlockGasLimit() external view returns (uint256 gaslimit);
        function getCurrentBlockCoinbase() external view returns (address coinbase);
    }
}

fn getter(
    aggregator: Address,
    name: &str,
    inputs: Vec<AbiType>,
    output: AbiType,
    args: Vec<DynSolValue>,
) -> CallDescriptor {
    CallDescriptor::new(aggregator, FunctionSchema::new(name, inputs, vec![output]), args)
}

/// `getEthBalance(address)`: native balance of `account` in wei.
pub fn eth_balance_call(aggregator: Address, account: Address) -> CallDescriptor {
    getter(
        aggregator,
        "getEthBalance",
        vec![AbiType::Address],
        AbiType::Uint(256),
        vec![DynSolValue::Address(account)],
    )
}

/// `getBlockHash(uint256)`: hash of a recent block.
pub fn block_hash_call(aggregator: Address, block_number: u64) -> CallDescriptor {
    getter(
        aggregator,
        "getBlockHash",
        vec![AbiType::Uint(256)],
        AbiType::FixedBytes(32),
        vec![DynSolValue::Uint(U256::from(block_number), 256)],
    )
}

pub fn last_block_hash_call(aggregator: Address) -> CallDescriptor {
    getter(aggregator, "getLastBlockHash", vec![], AbiType::FixedBytes(32), vec![])
}

pub fn current_block_timestamp_call(aggregator: Address) -> CallDescriptor {
    getter(aggregator, "getCurrentBlockTimestamp", vec![], AbiType::Uint(256), vec![])
}

pub fn current_block_difficulty_call(aggregator: Address) -> CallDescriptor {
    getter(aggregator, "getCurrentBlockDifficulty", vec![], AbiType::Uint(256), vec![])
}

pub fn current_block_gas_limit_call(aggregator: Address) -> CallDescriptor {
    getter(aggregator, "getCurrentBlockGasLimit", vec![], AbiType::Uint(256), vec![])
}

pub fn current_block_coinbase_call(aggregator: Address) -> CallDescriptor {
    getter(aggregator, "getCurrentBlockCoinbase", vec![], AbiType::Address, vec![])
}
