use crate::expr::{BvBinaryOp, BvUnaryOp, Expr, Extension};
use num_bigint::{BigInt, BigUint};
use pretty_assertions::assert_eq;
use std::rc::Rc;

#[test]
fn test_bv_literal_is_truncated_to_width() {
    let lit = Expr::bv(300u32, 8);
    assert_eq!(lit.as_bv_lit(), Some((&BigUint::from(44u32), 8)));
}

#[test]
fn test_literal_accessors() {
    assert_eq!(Expr::int(-3).as_int_lit(), Some(&BigInt::from(-3)));
    assert_eq!(Expr::bool_lit(true).as_bool_lit(), Some(true));
    assert_eq!(Expr::id("x").as_int_lit(), None);
}

#[test]
fn test_and_all() {
    assert_eq!(Expr::and_all(Vec::new()), Expr::bool_lit(true));

    let a = Expr::id("a");
    let b = Expr::id("b");
    let c = Expr::id("c");
    let expected = Expr::and(Expr::and(a.clone(), b.clone()), c.clone());
    assert_eq!(Expr::and_all(vec![a, b, c]), expected);
}

#[test]
fn test_update_shares_subexpressions() {
    let base = Expr::id("m");
    let index = Expr::id("k");
    let write = Expr::update(base.clone(), index.clone(), Expr::int(0));
    match write.as_ref() {
        Expr::Update {
            base: b, index: i, ..
        } => {
            assert!(Rc::ptr_eq(b, &base));
            assert!(Rc::ptr_eq(i, &index));
        }
        other => panic!("expected update, got {:?}", other),
    }
}

#[test]
fn test_contains_error() {
    let clean = Expr::plus(Expr::id("x"), Expr::int(1));
    assert!(!clean.contains_error());

    let dirty = Expr::cond(Expr::bool_lit(true), Expr::error(), Expr::int(0));
    assert!(dirty.contains_error());
    assert!(Expr::error().is_error());
}

#[test]
fn test_builtin_function_names() {
    assert_eq!(BvBinaryOp::Add.function_name(256), "bvadd256");
    assert_eq!(BvBinaryOp::Slt.function_name(8), "bvslt8");
    assert!(BvBinaryOp::Uge.is_predicate());
    assert!(!BvBinaryOp::AShr.is_predicate());
    assert_eq!(BvUnaryOp::Not.function_name(16), "bvnot16");
    assert_eq!(Extension::Sign.smt_name(8, 256), "sign_extend 248");
    assert_eq!(Extension::Zero.function_name(8, 16), "bvzeroext_8_to_16");
}
