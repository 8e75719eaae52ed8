//! Function schemas - ABI type tags and function interface definitions.
//!
//! A `FunctionSchema` is the data-only description of a contract function
//! (name, ordered input tags, ordered output tags). Encoding and decoding are
//! table-driven over the closed `AbiType` set and delegated to alloy's
//! `DynSolType`, so no generated bindings are needed at call time.

use std::fmt;
use std::str::FromStr;

use alloy::dyn_abi::DynSolType;
use alloy::json_abi::Function;
use alloy::primitives::{keccak256, Selector};

use crate::error::SchemaError;

/// Solidity ABI type tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AbiType {
    Address,
    Bool,
    /// `uintN`, N in bits.
    Uint(usize),
    /// `intN`, N in bits.
    Int(usize),
    /// `bytesN`, N in bytes.
    FixedBytes(usize),
    Bytes,
    String,
    /// `T[]`
    Array(Box<AbiType>),
    /// `T[k]`
    FixedArray(Box<AbiType>, usize),
    /// `(T1,T2,...)`
    Tuple(Vec<AbiType>),
}

impl AbiType {
    /// Parse a canonical type name such as `uint256`, `address[]` or
    /// `(uint112,uint112,uint32)`.
    pub fn parse(ty: &str) -> Result<Self, SchemaError> {
        let trimmed = ty.trim();
        let dyn_ty = DynSolType::parse(trimmed).map_err(|e| SchemaError::InvalidType {
            ty: trimmed.to_string(),
            reason: e.to_string(),
        })?;

        Self::from_dyn(&dyn_ty).ok_or_else(|| SchemaError::InvalidType {
            ty: trimmed.to_string(),
            reason: "type is not supported in call descriptors".to_string(),
        })
    }

    /// Convert from alloy's dynamic type, rejecting `function` and custom
    /// struct types.
    pub fn from_dyn(ty: &DynSolType) -> Option<Self> {
        let tag = match ty {
            DynSolType::Address => Self::Address,
            DynSolType::Bool => Self::Bool,
            DynSolType::Uint(bits) => Self::Uint(*bits),
            DynSolType::Int(bits) => Self::Int(*bits),
            DynSolType::FixedBytes(size) => Self::FixedBytes(*size),
            DynSolType::Bytes => Self::Bytes,
            DynSolType::String => Self::String,
            DynSolType::Array(inner) => Self::Array(Box::new(Self::from_dyn(inner)?)),
            DynSolType::FixedArray(inner, len) => {
                Self::FixedArray(Box::new(Self::from_dyn(inner)?), *len)
            }
            DynSolType::Tuple(items) => Self::Tuple(
                items
                    .iter()
                    .map(Self::from_dyn)
                    .collect::<Option<Vec<_>>>()?,
            ),
            _ => return None,
        };
        Some(tag)
    }

    /// The alloy dynamic type used for encoding and decoding.
    pub fn to_dyn(&self) -> DynSolType {
        match self {
            Self::Address => DynSolType::Address,
            Self::Bool => DynSolType::Bool,
            Self::Uint(bits) => DynSolType::Uint(*bits),
            Self::Int(bits) => DynSolType::Int(*bits),
            Self::FixedBytes(size) => DynSolType::FixedBytes(*size),
            Self::Bytes => DynSolType::Bytes,
            Self::String => DynSolType::String,
            Self::Array(inner) => DynSolType::Array(Box::new(inner.to_dyn())),
            Self::FixedArray(inner, len) => DynSolType::FixedArray(Box::new(inner.to_dyn()), *len),
            Self::Tuple(items) => DynSolType::Tuple(items.iter().map(Self::to_dyn).collect()),
        }
    }

    /// Canonical name as used in function signatures.
    pub fn canonical_name(&self) -> String {
        match self {
            Self::Address => "address".to_string(),
            Self::Bool => "bool".to_string(),
            Self::Uint(bits) => format!("uint{bits}"),
            Self::Int(bits) => format!("int{bits}"),
            Self::FixedBytes(size) => format!("bytes{size}"),
            Self::Bytes => "bytes".to_string(),
            Self::String => "string".to_string(),
            Self::Array(inner) => format!("{}[]", inner.canonical_name()),
            Self::FixedArray(inner, len) => format!("{}[{len}]", inner.canonical_name()),
            Self::Tuple(items) => format!("({})", join_canonical(items)),
        }
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

impl FromStr for AbiType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Interface definition of a single contract function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionSchema {
    name: String,
    inputs: Vec<AbiType>,
    outputs: Vec<AbiType>,
}

impl FunctionSchema {
    pub fn new(name: impl Into<String>, inputs: Vec<AbiType>, outputs: Vec<AbiType>) -> Self {
        Self {
            name: name.into(),
            inputs,
            outputs,
        }
    }

    /// Parse a human-readable signature.
    ///
    /// Accepts `balanceOf(address)(uint256)`,
    /// `balanceOf(address owner) returns (uint256)` and the same forms with a
    /// leading `function` keyword and `external`/`public`/`view`/`pure`
    /// modifiers. Parameter names and data locations are ignored.
    pub fn parse(signature: &str) -> Result<Self, SchemaError> {
        let invalid = |reason: &str| SchemaError::InvalidSignature {
            signature: signature.to_string(),
            reason: reason.to_string(),
        };

        let sig = signature.trim();
        let sig = sig.strip_prefix("function ").map_or(sig, str::trim_start);

        let open = sig.find('(').ok_or_else(|| invalid("missing parameter list"))?;
        let name = sig[..open].trim();
        if !is_identifier(name) {
            return Err(invalid("function name is not a valid identifier"));
        }

        let close = matching_paren(sig, open).ok_or_else(|| invalid("unbalanced parentheses"))?;
        let inputs = parse_param_list(&sig[open + 1..close], signature)?;

        let mut rest = sig[close + 1..].trim_start();
        while let Some(stripped) = ["external", "public", "view", "pure"]
            .iter()
            .find_map(|kw| rest.strip_prefix(kw))
        {
            rest = stripped.trim_start();
        }

        let outputs = if rest.is_empty() {
            Vec::new()
        } else {
            let rest = rest.strip_prefix("returns").map_or(rest, str::trim_start);
            if !rest.starts_with('(') {
                return Err(invalid("expected a return list after the parameters"));
            }
            let close = matching_paren(rest, 0).ok_or_else(|| invalid("unbalanced parentheses"))?;
            if !rest[close + 1..].trim().is_empty() {
                return Err(invalid("unexpected text after the return list"));
            }
            parse_param_list(&rest[1..close], signature)?
        };

        Ok(Self::new(name, inputs, outputs))
    }

    /// Build from a JSON ABI function entry.
    pub fn from_json_abi(function: &Function) -> Result<Self, SchemaError> {
        let inputs = function
            .inputs
            .iter()
            .map(|p| AbiType::parse(&p.selector_type()))
            .collect::<Result<Vec<_>, _>>()?;
        let outputs = function
            .outputs
            .iter()
            .map(|p| AbiType::parse(&p.selector_type()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(function.name.clone(), inputs, outputs))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[AbiType] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[AbiType] {
        &self.outputs
    }

    /// Canonical signature, e.g. `balanceOf(address)`.
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, join_canonical(&self.inputs))
    }

    /// First four bytes of `keccak256(signature)`.
    pub fn selector(&self) -> Selector {
        Selector::from_slice(&keccak256(self.signature().as_bytes())[..4])
    }

    /// Tuple of the declared outputs.
    pub fn output_type(&self) -> DynSolType {
        DynSolType::Tuple(self.outputs.iter().map(AbiType::to_dyn).collect())
    }
}

impl fmt::Display for FunctionSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signature())?;
        if !self.outputs.is_empty() {
            write!(f, " returns ({})", join_canonical(&self.outputs))?;
        }
        Ok(())
    }
}

impl FromStr for FunctionSchema {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn join_canonical(types: &[AbiType]) -> String {
    types
        .iter()
        .map(AbiType::canonical_name)
        .collect::<Vec<_>>()
        .join(",")
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Index of the `)` closing the `(` at `open`.
fn matching_paren(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in s.bytes().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on commas that are not nested inside parentheses.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, b) in s.bytes().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

fn parse_param_list(list: &str, signature: &str) -> Result<Vec<AbiType>, SchemaError> {
    if list.trim().is_empty() {
        return Ok(Vec::new());
    }
    split_top_level(list)
        .into_iter()
        .map(|param| parse_param(param, signature))
        .collect()
}

/// Parse one parameter, dropping its name and data location.
fn parse_param(param: &str, signature: &str) -> Result<AbiType, SchemaError> {
    let param = param.trim();
    let param = param.strip_prefix("tuple").unwrap_or(param);

    if param.starts_with('(') {
        let close = matching_paren(param, 0).ok_or_else(|| SchemaError::InvalidSignature {
            signature: signature.to_string(),
            reason: format!("unbalanced parentheses in `{param}`"),
        })?;
        let fields = parse_param_list(&param[1..close], signature)?;
        // Only a `[..]` suffix belongs to the type; a name or data location
        // follows after whitespace.
        let dims = param[close + 1..]
            .split_whitespace()
            .next()
            .filter(|suffix| suffix.starts_with('['))
            .unwrap_or("");
        if dims.is_empty() {
            return Ok(AbiType::Tuple(fields));
        }
        return AbiType::parse(&format!("{}{dims}", AbiType::Tuple(fields).canonical_name()));
    }

    let ty = param.split_whitespace().next().ok_or_else(|| SchemaError::InvalidSignature {
        signature: signature.to_string(),
        reason: "empty parameter".to_string(),
    })?;
    AbiType::parse(ty)
}
