/*! Intermediate representation for Boogie verification conditions.
 *
 * Solidity programs are checked by translating them into an intermediate verification language.
 * This crate models the output side of that translation: expressions, statements and declarations
 * of the target language, together with the Solidity source types the translation consumes.
 * A type checker and a reference evaluator make it possible to test that generated code is
 * well-typed and means what it should.
 */

pub mod decl;
pub mod eval;
pub mod expr;
pub mod ir_type;
pub mod program;
pub mod source_location;
pub mod stmt;
pub mod typeck;
pub mod types;

pub use decl::{Attr, AttrArg, Binding, Decl, FuncDecl, ProcDecl, TypeDecl, VarDecl};
pub use eval::{Env, MapValue, Outcome, Value};
pub use expr::{
    BinaryOp, BvBinaryOp, BvUnaryOp, Expr, ExprRef, Extension, UnaryOp, ERROR_EXPR,
};
pub use ir_type::IrType;
pub use program::Program;
pub use source_location::SourceLocation;
pub use stmt::{Block, Stmt};
pub use types::{EnumType, Type, TypeCategory};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IrError {
    #[error("Type error: {0}")]
    TypeError(String),
    #[error("Evaluation error: {0}")]
    EvalError(String),
    #[error("Unbound identifier: {0}")]
    UnboundIdentifier(String),
    #[error("Duplicate declaration: {0}")]
    DuplicateDeclaration(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, IrError>;

#[cfg(test)]
mod tests;
