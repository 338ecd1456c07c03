/*! Encode Solidity semantics as Boogie IR.
 *
 * A front end hands over typed operands one operation at a time. This module turns them into
 * verification IR under the selected numeric encoding, surfacing the overflow conditions each
 * encoding needs, and synthesizes the procedures standing in for Ether transfers.
 */

mod arithmetic;
mod builtins;
mod config;
mod context;
mod conventions;
mod conversion;
mod errors;
mod lvalue;
mod type_classifier;

use solvc_core::{Decl, Program};
use tracing::debug;

pub use arithmetic::{encode_binary, encode_unary, BinaryOperator, ExprWithCondition, UnaryOperator};
pub use builtins::{create_builtin_procs, create_call_proc, create_send_proc, create_transfer_proc};
pub use config::{Encoding, EncodingConfig};
pub use context::{Diagnostic, EncodingContext, NodeId};
pub use conventions::{
    constructor_name, data_location_name, mapping_type, source_attrs, DataLocation, ADDRESS_TYPE,
    AMOUNT, BALANCE, CALL, CALLDATA, MSG_SENDER, MSG_VALUE, RESULT, SEND, THIS, TRANSFER,
};
pub use conversion::{explicit_conversion, implicit_conversion, range_constraint};
pub use errors::{Result, TransformError};
pub use lvalue::select_to_update;
pub use type_classifier::TypeClassifier;

/// Output of a translation run: the program plus every diagnostic recorded
/// while producing it.
#[derive(Debug, Clone)]
pub struct Translation {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

impl Translation {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Assembles a program with the shared prelude, the bitvector builtins the
/// generated code references, and the transfer, send and call procedures.
pub fn builtin_program(config: EncodingConfig) -> Result<Translation> {
    let mut ctx = EncodingContext::new(config);
    let procedures = create_builtin_procs(&mut ctx)?;

    let mut program = Program::new();
    program.add_decls(ctx.prelude_decls())?;
    program.add_decls(ctx.builtin_decls())?;
    program.add_decls(procedures.into_iter().map(Decl::Proc))?;

    debug!(
        encoding = %config.encoding,
        declarations = program.len(),
        "assembled builtin program"
    );

    Ok(Translation {
        program,
        diagnostics: ctx.take_diagnostics(),
    })
}

#[cfg(test)]
mod tests;
