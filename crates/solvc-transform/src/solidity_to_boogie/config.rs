use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::TransformError;

/// Numeric domain used for every integer value of a translation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Encoding {
    /// Unbounded mathematical integers.
    #[default]
    #[serde(rename = "int")]
    Mathematical,
    /// Fixed-width bitvectors with wraparound.
    #[serde(rename = "bv")]
    Bitvector,
    /// Unbounded integers explicitly wrapped into the type's range.
    #[serde(rename = "mod")]
    Modular,
}

impl Encoding {
    pub fn short_name(&self) -> &'static str {
        match self {
            Encoding::Mathematical => "int",
            Encoding::Bitvector => "bv",
            Encoding::Modular => "mod",
        }
    }

    pub fn all() -> [Encoding; 3] {
        [Encoding::Mathematical, Encoding::Bitvector, Encoding::Modular]
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

impl FromStr for Encoding {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "int" => Ok(Encoding::Mathematical),
            "bv" => Ok(Encoding::Bitvector),
            "mod" => Ok(Encoding::Modular),
            other => Err(TransformError::UnsupportedFeature(format!(
                "unknown encoding '{}', expected one of int, bv, mod",
                other
            ))),
        }
    }
}

/// Settings fixed for the lifetime of one translation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    pub encoding: Encoding,
    /// Turn well-definedness conditions into proof obligations.
    pub check_overflow: bool,
}

impl EncodingConfig {
    pub fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            check_overflow: false,
        }
    }

    pub fn with_overflow_checks(mut self, enabled: bool) -> Self {
        self.check_overflow = enabled;
        self
    }
}
