/*! Test coverage for the verification IR.
 *
 * Generated code is only useful if it is well-typed and evaluates the way the verifier will
 * interpret it. These tests cover source type parsing, expression construction, the type checker
 * and the reference evaluator.
 */

mod expr_tests;
