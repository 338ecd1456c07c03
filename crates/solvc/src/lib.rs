/*! Unified interface for encoding Solidity semantics in Boogie.
 *
 * Single import for the whole pipeline: the verification IR and its reference semantics, the
 * encoding engine that produces it, and the emitter that prints it as Boogie source.
 */

pub use solvc_core as core;
pub use solvc_emit as emit;
pub use solvc_transform as transform;

pub use solvc_core::{Decl, Expr, ExprRef, IrType, ProcDecl, Program, Stmt, Type};

pub use solvc_emit::{format_expr, BoogieEmitter, Emitter, EmitterConfig};

pub use solvc_transform::{
    builtin_program, Encoding, EncodingConfig, EncodingContext, Translation, TransformError,
};

/// Boogie source for the prelude and builtin procedures under `config`.
pub fn builtin_prelude(config: EncodingConfig, emitter: EmitterConfig) -> anyhow::Result<String> {
    let translation = builtin_program(config)?;
    BoogieEmitter::new(emitter).emit_to_string(&translation.program)
}
