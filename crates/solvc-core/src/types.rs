use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::IrError;

/// Resolved Solidity type of an operand, as delivered by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Bool,
    Uint(u16),
    Int(u16),
    Address,
    FixedBytes(u8),
    Bytes,
    String,
    Array(Box<Type>, Option<usize>),
    Mapping(Box<Type>, Box<Type>),
    Enum(EnumType),
    /// Components may be missing, e.g. the left side of `(, x) = f()`.
    Tuple(Vec<Option<Type>>),
    Contract(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeCategory {
    Integer,
    FixedBytes,
    Enum,
    Tuple,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    pub members: Vec<String>,
}

impl EnumType {
    pub fn new(name: impl Into<String>, members: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

impl Type {
    pub fn uint256() -> Self {
        Type::Uint(256)
    }

    pub fn category(&self) -> TypeCategory {
        match self {
            Type::Uint(_) | Type::Int(_) => TypeCategory::Integer,
            Type::FixedBytes(_) => TypeCategory::FixedBytes,
            Type::Enum(_) => TypeCategory::Enum,
            Type::Tuple(_) => TypeCategory::Tuple,
            _ => TypeCategory::Other,
        }
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self, Type::Tuple(_))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => write!(f, "bool"),
            Type::Uint(bits) => write!(f, "uint{}", bits),
            Type::Int(bits) => write!(f, "int{}", bits),
            Type::Address => write!(f, "address"),
            Type::FixedBytes(n) => write!(f, "bytes{}", n),
            Type::Bytes => write!(f, "bytes"),
            Type::String => write!(f, "string"),
            Type::Array(elem, Some(size)) => write!(f, "{}[{}]", elem, size),
            Type::Array(elem, None) => write!(f, "{}[]", elem),
            Type::Mapping(key, value) => write!(f, "mapping({} => {})", key, value),
            Type::Enum(e) => write!(f, "enum {}", e.name),
            Type::Tuple(components) => {
                let parts = components
                    .iter()
                    .map(|c| c.as_ref().map(|t| t.to_string()).unwrap_or_default())
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "tuple({})", parts)
            }
            Type::Contract(name) => write!(f, "contract {}", name),
        }
    }
}

impl FromStr for Type {
    type Err = IrError;

    /// Parses elementary type names such as `uint8`, `int`, `bytes32` or `address payable`.
    fn from_str(type_str: &str) -> Result<Self, Self::Err> {
        let type_str = type_str.trim();

        if let Some(bits) = type_str.strip_prefix("uint") {
            return parse_int_bits(bits, type_str).map(Type::Uint);
        }
        if let Some(bits) = type_str.strip_prefix("int") {
            return parse_int_bits(bits, type_str).map(Type::Int);
        }

        match type_str {
            "bool" => Ok(Type::Bool),
            "address" | "address payable" => Ok(Type::Address),
            "bytes" => Ok(Type::Bytes),
            "string" => Ok(Type::String),
            s if s.starts_with("bytes") => {
                let size_str = &s[5..];
                let size = size_str.parse::<u8>().map_err(|_| {
                    IrError::TypeError(format!("Invalid bytes size: {}", size_str))
                })?;
                if (1..=32).contains(&size) {
                    Ok(Type::FixedBytes(size))
                } else {
                    Err(IrError::TypeError(format!(
                        "Bytes size must be between 1 and 32, got {}",
                        size
                    )))
                }
            }
            _ => Err(IrError::TypeError(format!("Unknown type: {}", type_str))),
        }
    }
}

fn parse_int_bits(bits_str: &str, type_str: &str) -> Result<u16, IrError> {
    if bits_str.is_empty() {
        return Ok(256);
    }
    let bits = bits_str
        .parse::<u16>()
        .map_err(|_| IrError::TypeError(format!("Unknown type: {}", type_str)))?;
    if bits > 0 && bits <= 256 && bits % 8 == 0 {
        Ok(bits)
    } else {
        Err(IrError::TypeError(format!("Invalid integer size: {}", bits)))
    }
}
