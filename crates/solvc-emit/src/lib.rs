/*! Turn verification IR into Boogie source text.
 *
 * Generated programs are read by the prover and, just as often, by whoever is chasing down a
 * failed proof. The emitter prints declarations, statements and expressions with the parentheses
 * Boogie actually needs and keeps the attributes that tie an assertion back to its source line.
 */

pub mod boogie_emitter;
pub mod config;
pub mod emitter;

pub use boogie_emitter::{format_attrs, format_expr, BoogieEmitter};
pub use config::{EmitterConfig, IndentStyle};
pub use emitter::{EmitContext, EmitHelper, EmitResult, Emitter};
