/*! Semantic encoding engine from Solidity to Boogie.
 *
 * Verifying a contract means proving facts about its arithmetic, and the arithmetic a prover sees
 * depends on how integers are modelled. This crate encodes operators, conversions and Ether
 * transfers under mathematical, bitvector or modular integers, and tells the caller exactly which
 * overflow conditions each choice leaves to be proven.
 */

pub mod solidity_to_boogie;

pub use solidity_to_boogie::{
    builtin_program, encode_binary, encode_unary, explicit_conversion, implicit_conversion,
    range_constraint, select_to_update, BinaryOperator, Diagnostic, Encoding, EncodingConfig,
    EncodingContext, ExprWithCondition, NodeId, Translation, TransformError, TypeClassifier,
    UnaryOperator,
};
