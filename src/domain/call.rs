//! Call descriptors - one read-only contract call in a batch.
//!
//! A descriptor pairs a target address with a function schema and argument
//! values. It knows how to produce its calldata and how to decode the raw
//! buffer the aggregator hands back for it.

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, Bytes};

use crate::error::{CodecError, SchemaError};

use super::schema::FunctionSchema;

/// Immutable description of a single contract call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallDescriptor {
    target: Address,
    function: FunctionSchema,
    args: Vec<DynSolValue>,
}

impl CallDescriptor {
    /// Create a descriptor. Arguments are checked against the schema when
    /// the batch is encoded.
    pub fn new(target: Address, function: FunctionSchema, args: Vec<DynSolValue>) -> Self {
        Self {
            target,
            function,
            args,
        }
    }

    /// Build a descriptor from a textual signature and string arguments,
    /// e.g. `("balanceOf(address)(uint256)", ["0xd8dA...6045"])`.
    pub fn from_strings<S: AsRef<str>>(
        target: Address,
        signature: &str,
        args: &[S],
    ) -> Result<Self, SchemaError> {
        let function = FunctionSchema::parse(signature)?;

        if args.len() != function.inputs().len() {
            return Err(SchemaError::InvalidArgument {
                signature: function.signature(),
                position: args.len().min(function.inputs().len()),
                reason: format!(
                    "expected {} arguments, got {}",
                    function.inputs().len(),
                    args.len()
                ),
            });
        }

        let values = function
            .inputs()
            .iter()
            .zip(args)
            .enumerate()
            .map(|(position, (ty, raw))| {
                ty.to_dyn()
                    .coerce_str(raw.as_ref())
                    .map_err(|e| SchemaError::InvalidArgument {
                        signature: function.signature(),
                        position,
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(target, function, values))
    }

    pub fn target(&self) -> Address {
        self.target
    }

    pub fn function(&self) -> &FunctionSchema {
        &self.function
    }

    pub fn args(&self) -> &[DynSolValue] {
        &self.args
    }

    /// Selector followed by the ABI-encoded arguments.
    pub fn calldata(&self) -> Result<Bytes, CodecError> {
        let inputs = self.function.inputs();
        if inputs.len() != self.args.len() {
            return Err(CodecError::ArgumentCount {
                expected: inputs.len(),
                actual: self.args.len(),
            });
        }

        for (position, (ty, value)) in inputs.iter().zip(&self.args).enumerate() {
            if !ty.to_dyn().matches(value) {
                return Err(CodecError::ArgumentType {
                    position,
                    expected: ty.canonical_name(),
                    actual: value
                        .sol_type_name()
                        .map_or_else(|| "unknown".to_string(), |name| name.into_owned()),
                });
            }
        }

        let encoded = DynSolValue::Tuple(self.args.clone()).abi_encode_params();
        let mut data = Vec::with_capacity(4 + encoded.len());
        data.extend_from_slice(self.function.selector().as_slice());
        data.extend_from_slice(&encoded);
        Ok(Bytes::from(data))
    }

    /// Decode a raw return buffer against the declared outputs.
    ///
    /// One output yields the value itself; otherwise a tuple of all outputs
    /// (empty for functions without outputs).
    pub fn decode_output(&self, raw: &[u8]) -> Result<DynSolValue, CodecError> {
        let output_type = self.function.output_type();
        let decoded = output_type
            .abi_decode_params(raw)
            .map_err(|e| CodecError::ReturnData {
                expected: output_type.sol_type_name().into_owned(),
                reason: e.to_string(),
            })?;

        match decoded {
            DynSolValue::Tuple(mut values) if values.len() == 1 => Ok(values.remove(0)),
            other => Ok(other),
        }
    }
}
