//! Aggregator address registry - chain id to multicall contract.
//!
//! The registry is an owned value: whoever builds providers creates one
//! (usually with `with_defaults`), applies overrides, and hands it to each
//! provider at construction time. Later registrations do not affect
//! providers that were already built.

use std::collections::BTreeMap;

use alloy::primitives::{address, Address};

use crate::error::MulticallError;

/// Known aggregator deployments.
const DEFAULT_MULTICALL_ADDRESSES: &[(u64, Address)] = &[
    // Ethereum mainnet
    (1, address!("eefba1e63905ef1d7acba5a8513c70307c1ce441")),
    // Ropsten
    (3, address!("F24b01476a55d635118ca848fbc7Dab69d403be3")),
    // Rinkeby
    (4, address!("42ad527de7d4e9d9d011ac45b31d8551f8fe9821")),
    // Goerli
    (5, address!("77dca2c955b15e9de4dbbcf1246b4b85b651e50e")),
    // Optimism
    (10, address!("5F2080542ab6ae7e0b06778F0B2d263006297840")),
    // Kovan
    (42, address!("2cc8688c5f75e365aaeeb4ea8d6a480405a48d2a")),
    // BNB Smart Chain
    (56, address!("1Ee38d535d541c55C9dae27B12edf090C608E6Fb")),
    // Gnosis
    (100, address!("b5b692a88bdfc81ca69dcb1d924f59f0413a602a")),
    // Polygon
    (137, address!("c4f1501f337079077842343Ce02665D8960150B0")),
    // Moonbeam
    (1284, address!("1E46B649d6651b3892217Dd1EFd2a3e78f4D904B")),
    // Moonriver
    (1285, address!("88abAF5961aEfFb40818E9357271b6B819a0BD8B")),
    // Local dev chain
    (1337, address!("77dca2c955b15e9de4dbbcf1246b4b85b651e50e")),
    // Avalanche Fuji
    (43113, address!("88abAF5961aEfFb40818E9357271b6B819a0BD8B")),
    // Avalanche C-Chain
    (43114, address!("88abAF5961aEfFb40818E9357271b6B819a0BD8B")),
    // Polygon Mumbai
    (80001, address!("5a0439824F4c0275faa88F2a7C5037F9833E29f1")),
];

/// Chain id → aggregator address table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MulticallRegistry {
    addresses: BTreeMap<u64, Address>,
}

impl MulticallRegistry {
    /// Registry without any entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the known deployments.
    pub fn with_defaults() -> Self {
        Self {
            addresses: DEFAULT_MULTICALL_ADDRESSES.iter().copied().collect(),
        }
    }

    /// Register or override the aggregator for `chain_id`.
    ///
    /// Returns the address previously registered for that chain, if any.
    pub fn register(&mut self, chain_id: u64, address: Address) -> Option<Address> {
        self.addresses.insert(chain_id, address)
    }

    /// Builder-style variant of [`register`](Self::register).
    #[must_use]
    pub fn with_address(mut self, chain_id: u64, address: Address) -> Self {
        self.register(chain_id, address);
        self
    }

    /// Look up the aggregator for `chain_id`.
    pub fn resolve(&self, chain_id: u64) -> Result<Address, MulticallError> {
        self.addresses
            .get(&chain_id)
            .copied()
            .ok_or(MulticallError::AddressNotFound { chain_id })
    }

    pub fn contains(&self, chain_id: u64) -> bool {
        self.addresses.contains_key(&chain_id)
    }

    /// Registered chain ids, ascending.
    pub fn chain_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.addresses.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}
