//! Reserved names and small naming helpers shared by the generated code.

use super::errors::{Result, TransformError};
use serde::{Deserialize, Serialize};
use solvc_core::{Attr, AttrArg, IrType, SourceLocation};

pub const BALANCE: &str = "__balance";
pub const THIS: &str = "__this";
pub const MSG_SENDER: &str = "__msg_sender";
pub const MSG_VALUE: &str = "__msg_value";

pub const TRANSFER: &str = "__transfer";
pub const SEND: &str = "__send";
pub const CALL: &str = "__call";

pub const RESULT: &str = "__result";
pub const CALLDATA: &str = "__calldata";
pub const AMOUNT: &str = "amount";

pub const ADDRESS_TYPE: &str = "address_t";
pub const CONSTRUCTOR: &str = "__constructor";

pub const STORAGE: &str = "stor";
pub const MEMORY: &str = "mem";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataLocation {
    Storage,
    Memory,
    CallData,
}

/// Suffix distinguishing storage and memory variants of reference types.
pub fn data_location_name(location: DataLocation) -> Result<&'static str> {
    match location {
        DataLocation::Storage => Ok(STORAGE),
        DataLocation::Memory => Ok(MEMORY),
        DataLocation::CallData => Err(TransformError::InternalConsistency(
            "calldata location is not supported".to_string(),
        )),
    }
}

pub fn constructor_name(contract_id: u32) -> String {
    format!("{}#{}", CONSTRUCTOR, contract_id)
}

pub fn mapping_type(key: IrType, value: IrType) -> IrType {
    IrType::map(key, value)
}

/// `{:sourceloc "file", line, col}` and `{:message "..."}` for a generated
/// assertion, so prover output can be traced back to the source.
pub fn source_attrs(location: &SourceLocation, message: impl Into<String>) -> Vec<Attr> {
    vec![
        Attr::new(
            "sourceloc",
            vec![
                AttrArg::Str(location.file.clone()),
                AttrArg::Int(i64::from(location.line)),
                AttrArg::Int(i64::from(location.column)),
            ],
        ),
        Attr::message(message),
    ]
}
