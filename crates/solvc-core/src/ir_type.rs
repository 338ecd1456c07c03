use serde::{Deserialize, Serialize};
use std::fmt;

/// Types of the target verification language.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IrType {
    Bool,
    Int,
    Bv(u32),
    Map(Box<IrType>, Box<IrType>),
    /// Uninterpreted type introduced by a `type` declaration.
    Named(String),
    /// Only produced for tuple expressions, which are destructured before emission.
    Tuple(Vec<IrType>),
}

impl IrType {
    pub fn map(key: IrType, value: IrType) -> Self {
        IrType::Map(Box::new(key), Box::new(value))
    }

    pub fn named(name: impl Into<String>) -> Self {
        IrType::Named(name.into())
    }

    pub fn is_bv(&self) -> bool {
        matches!(self, IrType::Bv(_))
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrType::Bool => write!(f, "bool"),
            IrType::Int => write!(f, "int"),
            IrType::Bv(width) => write!(f, "bv{}", width),
            IrType::Map(key, value) => write!(f, "[{}]{}", key, value),
            IrType::Named(name) => write!(f, "{}", name),
            IrType::Tuple(elements) => {
                let parts = elements
                    .iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "({})", parts)
            }
        }
    }
}
