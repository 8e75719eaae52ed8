//! Contract interface - build call descriptors from a JSON ABI.

use std::collections::HashMap;

use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::JsonAbi;
use alloy::primitives::Address;

use crate::error::SchemaError;

use super::call::CallDescriptor;
use super::schema::FunctionSchema;

/// A deployed contract plus the schemas of its functions, keyed by name.
///
/// Overloads are kept side by side and picked by argument count.
#[derive(Debug, Clone)]
pub struct ContractInterface {
    address: Address,
    functions: HashMap<String, Vec<FunctionSchema>>,
}

impl ContractInterface {
    /// Parse a JSON ABI (the array form emitted by solc).
    pub fn from_json(address: Address, abi_json: &str) -> Result<Self, SchemaError> {
        let abi: JsonAbi =
            serde_json::from_str(abi_json).map_err(|e| SchemaError::InvalidAbi(e.to_string()))?;
        Self::from_abi(address, &abi)
    }

    pub fn from_abi(address: Address, abi: &JsonAbi) -> Result<Self, SchemaError> {
        let mut functions: HashMap<String, Vec<FunctionSchema>> = HashMap::new();
        for function in abi.functions() {
            functions
                .entry(function.name.clone())
                .or_default()
                .push(FunctionSchema::from_json_abi(function)?);
        }
        Ok(Self { address, functions })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Schema for `name` taking `arity` arguments.
    pub fn function(&self, name: &str, arity: usize) -> Option<&FunctionSchema> {
        self.functions
            .get(name)?
            .iter()
            .find(|f| f.inputs().len() == arity)
    }

    /// Descriptor for calling `name` with `args` on this contract.
    pub fn call(&self, name: &str, args: Vec<DynSolValue>) -> Result<CallDescriptor, SchemaError> {
        let function = self
            .function(name, args.len())
            .ok_or_else(|| SchemaError::UnknownFunction {
                name: name.to_string(),
                arity: args.len(),
            })?;
        Ok(CallDescriptor::new(self.address, function.clone(), args))
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;
    use crate::domain::schema::AbiType;

    const ERC20_ABI: &str = r#"[
        {"type":"function","name":"balanceOf","stateMutability":"view",
         "inputs":[{"name":"owner","type":"address"}],
         "outputs":[{"name":"","type":"uint256"}]},
        {"type":"function","name":"decimals","stateMutability":"view",
         "inputs":[],"outputs":[{"name":"","type":"uint8"}]},
        {"type":"function","name":"symbol","stateMutability":"view",
         "inputs":[],"outputs":[{"name":"","type":"string"}]},
        {"type":"event","name":"Transfer","anonymous":false,
         "inputs":[{"name":"from","type":"address","indexed":true},
                   {"name":"to","type":"address","indexed":true},
                   {"name":"value","type":"uint256","indexed":false}]}
    ]"#;

    const TOKEN: Address = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");

    #[test]
    fn test_from_json_builds_descriptors() {
        let contract = ContractInterface::from_json(TOKEN, ERC20_ABI).unwrap();
        let holder = address!("d8da6bf26964af9d7eed9e03e53415d37aa96045");

        let call = contract
            .call("balanceOf", vec![DynSolValue::Address(holder)])
            .unwrap();
        assert_eq!(call.target(), TOKEN);
        assert_eq!(call.function().signature(), "balanceOf(address)");
        assert_eq!(call.function().outputs(), &[AbiType::Uint(256)]);

        let symbol = contract.call("symbol", vec![]).unwrap();
        assert_eq!(symbol.function().outputs(), &[AbiType::String]);
    }

    #[test]
    fn test_unknown_function_or_arity() {
        let contract = ContractInterface::from_json(TOKEN, ERC20_ABI).unwrap();
        assert!(matches!(
            contract.call("totalSupply", vec![]),
            Err(SchemaError::UnknownFunction { .. })
        ));
        assert!(contract.call("decimals", vec![DynSolValue::Bool(true)]).is_err());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            ContractInterface::from_json(TOKEN, "not json"),
            Err(SchemaError::InvalidAbi(_))
        ));
    }
}
