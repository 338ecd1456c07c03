use super::*;
use num_bigint::BigInt;
use pretty_assertions::assert_eq;
use solvc_core::typeck::check_program;
use solvc_core::{BvBinaryOp, EnumType, Expr, Extension, IrType, SourceLocation, Stmt, Type};

fn ctx(encoding: Encoding) -> EncodingContext {
    EncodingContext::new(EncodingConfig::new(encoding))
}

fn x() -> solvc_core::ExprRef {
    Expr::id("x")
}

fn y() -> solvc_core::ExprRef {
    Expr::id("y")
}

#[test]
fn test_encoding_names() {
    for encoding in Encoding::all() {
        let parsed: Encoding = encoding.to_string().parse().unwrap();
        assert_eq!(parsed, encoding);
    }
    assert!("float".parse::<Encoding>().is_err());
    assert_eq!(EncodingConfig::default().encoding, Encoding::Mathematical);
    assert!(!EncodingConfig::default().check_overflow);
}

#[test]
fn test_operator_tokens() {
    assert_eq!(BinaryOperator::from_token("+="), Some(BinaryOperator::Add));
    assert_eq!(BinaryOperator::from_token(">>="), Some(BinaryOperator::Sar));
    assert_eq!(BinaryOperator::from_token("**"), Some(BinaryOperator::Exp));
    assert_eq!(BinaryOperator::from_token("=="), None);
    for op in BinaryOperator::ALL {
        assert_eq!(BinaryOperator::from_token(op.token()), Some(op));
    }
    assert_eq!(UnaryOperator::from_token("~"), Some(UnaryOperator::BitNot));
}

#[test]
fn test_bit_precise_types() {
    assert!(TypeClassifier::is_bit_precise(&Type::Uint(8)));
    assert!(TypeClassifier::is_bit_precise(&Type::FixedBytes(4)));
    assert!(TypeClassifier::is_bit_precise(&Type::Enum(EnumType::new("E", ["A"]))));
    assert!(TypeClassifier::is_bit_precise(&Type::Tuple(vec![
        Some(Type::Int(16)),
        None
    ])));
    assert!(!TypeClassifier::is_bit_precise(&Type::Tuple(vec![Some(
        Type::String
    )])));
    assert!(!TypeClassifier::is_bit_precise(&Type::Address));
    assert!(!TypeClassifier::is_bit_precise(&Type::Bytes));
    assert!(!TypeClassifier::is_bit_precise(&Type::Mapping(
        Box::new(Type::Address),
        Box::new(Type::uint256())
    )));
}

#[test]
fn test_width_and_sign() {
    assert_eq!(TypeClassifier::bit_width(&Type::Int(64)), 64);
    assert!(TypeClassifier::is_signed(&Type::Int(64)));
    assert_eq!(TypeClassifier::bit_width(&Type::FixedBytes(4)), 32);
    assert!(!TypeClassifier::is_signed(&Type::FixedBytes(4)));
    let color = Type::Enum(EnumType::new("Color", ["Red", "Green", "Blue"]));
    assert_eq!(TypeClassifier::bit_width(&color), 256);
    assert!(!TypeClassifier::is_signed(&color));
}

#[test]
#[should_panic(expected = "non-bit-precise")]
fn test_width_of_string_panics() {
    TypeClassifier::bit_width(&Type::String);
}

#[test]
#[should_panic(expected = "non-bit-precise")]
fn test_sign_of_tuple_panics() {
    TypeClassifier::is_signed(&Type::Tuple(vec![Some(Type::Uint(8))]));
}

#[test]
fn test_int_encoding_is_plain_arithmetic() {
    let mut ctx = ctx(Encoding::Mathematical);
    let sum = encode_binary(&mut ctx, None, BinaryOperator::Add, x(), y(), 8, false);
    assert_eq!(sum, ExprWithCondition::new(Expr::plus(x(), y())));

    let div = encode_binary(&mut ctx, None, BinaryOperator::Div, x(), y(), 256, true);
    assert_eq!(div.expr, Expr::intdiv(x(), y()));
    assert!(div.condition.is_none());
    assert!(ctx.diagnostics().is_empty());
}

#[test]
fn test_int_exponentiation_of_literals() {
    let mut ctx = ctx(Encoding::Mathematical);
    let power = encode_binary(
        &mut ctx,
        None,
        BinaryOperator::Exp,
        Expr::int(2),
        Expr::int(100),
        256,
        false,
    );
    assert_eq!(power.expr.as_int_lit(), Some(&(BigInt::from(1) << 100u32)));
}

#[test]
fn test_non_literal_exponentiation_is_reported() {
    let mut ctx = ctx(Encoding::Mathematical);
    let power = encode_binary(
        &mut ctx,
        Some(NodeId(7)),
        BinaryOperator::Exp,
        x(),
        Expr::int(2),
        256,
        false,
    );
    assert!(power.is_error());
    assert_eq!(ctx.diagnostics().len(), 1);
    assert_eq!(ctx.diagnostics()[0].node, Some(NodeId(7)));
    assert_eq!(
        ctx.diagnostics()[0].error,
        TransformError::UnsupportedExponentiation(Encoding::Mathematical)
    );
}

#[test]
fn test_unsupported_operators_yield_sentinel() {
    let cases = [
        (Encoding::Mathematical, BinaryOperator::BitAnd),
        (Encoding::Mathematical, BinaryOperator::Shl),
        (Encoding::Modular, BinaryOperator::Mod),
        (Encoding::Modular, BinaryOperator::BitXor),
    ];
    for (encoding, op) in cases {
        let mut ctx = ctx(encoding);
        let result = encode_binary(&mut ctx, None, op, x(), y(), 32, false);
        assert!(result.is_error(), "{} {}", encoding, op);
        assert!(result.condition.is_none());
        assert_eq!(
            ctx.diagnostics()[0].error,
            TransformError::UnsupportedBinaryOperator {
                encoding,
                operator: op.token().to_string()
            }
        );
    }
}

#[test]
fn test_bv_operators_follow_signedness() {
    let mut ctx = ctx(Encoding::Bitvector);
    let signed = encode_binary(&mut ctx, None, BinaryOperator::Div, x(), y(), 32, true);
    assert_eq!(signed.expr, Expr::bv_binary(BvBinaryOp::SDiv, 32, x(), y()));
    let unsigned = encode_binary(&mut ctx, None, BinaryOperator::Sar, x(), y(), 32, false);
    assert_eq!(unsigned.expr, Expr::bv_binary(BvBinaryOp::LShr, 32, x(), y()));
    let cmp = encode_binary(&mut ctx, None, BinaryOperator::Lte, x(), y(), 32, true);
    assert_eq!(cmp.expr, Expr::bv_binary(BvBinaryOp::Sle, 32, x(), y()));

    let names: Vec<_> = ctx.bv_builtins().map(|f| f.name.clone()).collect();
    assert_eq!(names, vec!["bvsdiv32", "bvlshr32", "bvsle32"]);
}

#[test]
fn test_bv_builtins_are_registered_once() {
    let mut ctx = ctx(Encoding::Bitvector);
    for _ in 0..3 {
        encode_binary(&mut ctx, None, BinaryOperator::Add, x(), y(), 256, false);
    }
    let builtins: Vec<_> = ctx.bv_builtins().collect();
    assert_eq!(builtins.len(), 1);
    assert_eq!(builtins[0].attrs[0].string_arg(), Some("bvadd"));
    assert_eq!(builtins[0].params, vec![IrType::Bv(256), IrType::Bv(256)]);
}

#[test]
fn test_bv_encoding_never_has_condition() {
    for op in BinaryOperator::ALL {
        let mut ctx = ctx(Encoding::Bitvector);
        let result = encode_binary(
            &mut ctx,
            None,
            op,
            Expr::bv(3u32, 8),
            Expr::bv(2u32, 8),
            8,
            true,
        );
        assert!(result.condition.is_none(), "{}", op);
        assert!(!result.is_error(), "{}", op);
    }
}

#[test]
fn test_bv_exponentiation_wraps() {
    let mut ctx = ctx(Encoding::Bitvector);
    let power = encode_binary(
        &mut ctx,
        None,
        BinaryOperator::Exp,
        Expr::bv(3u32, 8),
        Expr::bv(5u32, 8),
        8,
        false,
    );
    // 3^5 = 243 fits; 3^6 = 729 wraps to 217.
    assert_eq!(power.expr, Expr::bv(243u32, 8));
    let power = encode_binary(
        &mut ctx,
        None,
        BinaryOperator::Exp,
        Expr::bv(3u32, 8),
        Expr::bv(6u32, 8),
        8,
        false,
    );
    assert_eq!(power.expr, Expr::bv(217u32, 8));
}

#[test]
fn test_mod_unsigned_add_shape() {
    let mut ctx = ctx(Encoding::Modular);
    let result = encode_binary(&mut ctx, None, BinaryOperator::Add, x(), y(), 8, false);
    let sum = Expr::plus(x(), y());
    let modulus = Expr::int(256);
    let expected = Expr::cond(
        Expr::gte(sum.clone(), modulus.clone()),
        Expr::minus(sum.clone(), modulus),
        sum.clone(),
    );
    assert_eq!(result.expr, expected);
    assert_eq!(result.condition, Some(Expr::eq(sum, expected)));
}

#[test]
fn test_mod_comparisons_pass_through() {
    let mut ctx = ctx(Encoding::Modular);
    let result = encode_binary(&mut ctx, None, BinaryOperator::Lt, x(), y(), 8, true);
    assert_eq!(result, ExprWithCondition::new(Expr::lt(x(), y())));
}

#[test]
fn test_mod_exponentiation() {
    let mut ctx = ctx(Encoding::Modular);
    let power = encode_binary(
        &mut ctx,
        None,
        BinaryOperator::Exp,
        Expr::int(2),
        Expr::int(8),
        8,
        false,
    );
    assert_eq!(power.expr, Expr::int(0));
    assert_eq!(power.condition, Some(Expr::eq(Expr::int(256), Expr::int(0))));

    let signed = encode_binary(
        &mut ctx,
        None,
        BinaryOperator::Exp,
        Expr::int(2),
        Expr::int(6),
        8,
        true,
    );
    assert_eq!(signed.expr, Expr::int(64));

    let smallest = encode_binary(
        &mut ctx,
        None,
        BinaryOperator::Exp,
        Expr::int(-2),
        Expr::int(7),
        8,
        true,
    );
    assert_eq!(smallest.expr, Expr::int(-128));
    assert_eq!(smallest.condition, Some(Expr::eq(Expr::int(-128), Expr::int(-128))));

    let wrapped = encode_binary(
        &mut ctx,
        None,
        BinaryOperator::Exp,
        Expr::int(3),
        Expr::int(5),
        8,
        true,
    );
    assert_eq!(wrapped.expr, Expr::int(-13));
    assert_eq!(wrapped.condition, Some(Expr::eq(Expr::int(243), Expr::int(-13))));
}

#[test]
fn test_unary_operators() {
    let mut int_ctx = ctx(Encoding::Mathematical);
    let neg = encode_unary(&mut int_ctx, None, UnaryOperator::Neg, x(), 8, true);
    assert_eq!(neg, ExprWithCondition::new(Expr::neg(x())));
    let not = encode_unary(&mut int_ctx, None, UnaryOperator::BitNot, x(), 8, true);
    assert!(not.is_error());
    assert_eq!(int_ctx.diagnostics().len(), 1);

    let mut bv_ctx = ctx(Encoding::Bitvector);
    let not = encode_unary(&mut bv_ctx, None, UnaryOperator::BitNot, x(), 8, false);
    assert!(not.condition.is_none());
    assert_eq!(bv_ctx.bv_builtins().next().map(|f| f.name.as_str()), Some("bvnot8"));

    let mut mod_ctx = ctx(Encoding::Modular);
    let neg = encode_unary(&mut mod_ctx, None, UnaryOperator::Neg, x(), 8, true);
    assert!(neg.condition.is_some());
}

#[test]
fn test_implicit_bv_widening() {
    let mut ctx = ctx(Encoding::Bitvector);
    let zext = implicit_conversion(&mut ctx, x(), &Type::Uint(8), &Type::Int(16)).unwrap();
    assert_eq!(zext, Expr::bv_extend(Extension::Zero, 8, 16, x()));
    let sext = implicit_conversion(&mut ctx, x(), &Type::Int(8), &Type::Int(256)).unwrap();
    assert_eq!(sext, Expr::bv_extend(Extension::Sign, 8, 256, x()));
    let same = implicit_conversion(&mut ctx, x(), &Type::Uint(8), &Type::Uint(8)).unwrap();
    assert_eq!(same, x());

    let names: Vec<_> = ctx.bv_builtins().map(|f| f.name.clone()).collect();
    assert_eq!(names, vec!["bvzeroext_8_to_16", "bvsignext_8_to_256"]);
}

#[test]
fn test_implicit_literal_conversion() {
    let mut ctx = ctx(Encoding::Bitvector);
    let positive = implicit_conversion(&mut ctx, Expr::int(5), &Type::Uint(8), &Type::Uint(8)).unwrap();
    assert_eq!(positive, Expr::bv(5u32, 8));

    let negative = implicit_conversion(&mut ctx, Expr::int(-5), &Type::Int(8), &Type::Int(8)).unwrap();
    assert_eq!(
        negative,
        Expr::bv_unary(solvc_core::BvUnaryOp::Neg, 8, Expr::bv(5u32, 8))
    );

    let mut int_ctx = self::ctx(Encoding::Mathematical);
    let untouched =
        implicit_conversion(&mut int_ctx, Expr::int(-5), &Type::Int(8), &Type::Int(16)).unwrap();
    assert_eq!(untouched, Expr::int(-5));
}

#[test]
fn test_implicit_conversion_presuppositions() {
    for encoding in Encoding::all() {
        let mut ctx = ctx(encoding);
        let narrowing = implicit_conversion(&mut ctx, x(), &Type::Uint(16), &Type::Uint(8));
        assert!(matches!(narrowing, Err(TransformError::InternalConsistency(_))));
        let unsigning = implicit_conversion(&mut ctx, x(), &Type::Int(8), &Type::Uint(16));
        assert!(matches!(unsigning, Err(TransformError::InternalConsistency(_))));
        assert!(ctx.diagnostics().is_empty());
    }
}

#[test]
fn test_implicit_tuple_conversion() {
    let mut ctx = ctx(Encoding::Bitvector);
    let from = Type::Tuple(vec![Some(Type::Uint(8)), Some(Type::Bool)]);
    let to = Type::Tuple(vec![Some(Type::Uint(16)), None]);
    let tuple = Expr::tuple(vec![x(), y()]);
    let converted = implicit_conversion(&mut ctx, tuple, &from, &to).unwrap();
    assert_eq!(
        converted,
        Expr::tuple(vec![Expr::bv_extend(Extension::Zero, 8, 16, x()), y()])
    );
}

#[test]
fn test_non_bit_precise_conversion_is_identity() {
    let mut ctx = ctx(Encoding::Bitvector);
    let addr = implicit_conversion(&mut ctx, x(), &Type::Address, &Type::Address).unwrap();
    assert_eq!(addr, x());
    let unknown = explicit_conversion(&mut ctx, x(), None, Some(&Type::Uint(8))).unwrap();
    assert_eq!(unknown, x());
}

#[test]
fn test_explicit_bv_conversion() {
    let mut ctx = ctx(Encoding::Bitvector);
    let narrowed =
        explicit_conversion(&mut ctx, x(), Some(&Type::Uint(256)), Some(&Type::Uint(8))).unwrap();
    assert_eq!(narrowed, Expr::bv_extract(x(), 7, 0));

    let resigned =
        explicit_conversion(&mut ctx, x(), Some(&Type::Int(8)), Some(&Type::Uint(8))).unwrap();
    assert_eq!(resigned, x());

    let widened =
        explicit_conversion(&mut ctx, x(), Some(&Type::Int(8)), Some(&Type::Uint(16))).unwrap();
    assert_eq!(widened, Expr::bv_extend(Extension::Sign, 8, 16, x()));

    let implicit =
        explicit_conversion(&mut ctx, x(), Some(&Type::Uint(8)), Some(&Type::Uint(16))).unwrap();
    assert_eq!(implicit, Expr::bv_extend(Extension::Zero, 8, 16, x()));
}

#[test]
fn test_explicit_mod_conversion_wraps() {
    let mut ctx = ctx(Encoding::Modular);
    let narrowed =
        explicit_conversion(&mut ctx, x(), Some(&Type::Uint(16)), Some(&Type::Uint(8))).unwrap();
    assert_eq!(narrowed, Expr::modulo(x(), Expr::int(256)));

    let literal = explicit_conversion(
        &mut ctx,
        Expr::int(200),
        Some(&Type::Uint(16)),
        Some(&Type::Int(8)),
    )
    .unwrap();
    assert_eq!(literal, Expr::int(-56));

    let mut int_ctx = self::ctx(Encoding::Mathematical);
    let untouched =
        explicit_conversion(&mut int_ctx, x(), Some(&Type::Uint(16)), Some(&Type::Uint(8)))
            .unwrap();
    assert_eq!(untouched, x());
}

#[test]
fn test_fixed_bytes_widening_pads_on_the_right() {
    let (bytes2, bytes4) = (Type::FixedBytes(2), Type::FixedBytes(4));

    let mut bv_ctx = ctx(Encoding::Bitvector);
    let literal = implicit_conversion(&mut bv_ctx, Expr::int(0x1234), &bytes2, &bytes4).unwrap();
    assert_eq!(literal, Expr::bv(0x1234_0000u32, 32));
    let symbolic = implicit_conversion(&mut bv_ctx, x(), &bytes2, &bytes4).unwrap();
    assert_eq!(
        symbolic,
        Expr::bv_binary(
            BvBinaryOp::Shl,
            32,
            Expr::bv_extend(Extension::Zero, 16, 32, x()),
            Expr::bv(16u32, 32),
        )
    );
    let names: Vec<_> = bv_ctx.bv_builtins().map(|f| f.name.clone()).collect();
    assert_eq!(names, vec!["bvzeroext_16_to_32", "bvshl32"]);

    let mut mod_ctx = ctx(Encoding::Modular);
    let literal = implicit_conversion(&mut mod_ctx, Expr::int(0x1234), &bytes2, &bytes4).unwrap();
    assert_eq!(literal, Expr::int(0x1234_0000));
    let symbolic = implicit_conversion(&mut mod_ctx, x(), &bytes2, &bytes4).unwrap();
    assert_eq!(symbolic, Expr::times(x(), Expr::int(65536)));

    for encoding in Encoding::all() {
        let mut ctx = ctx(encoding);
        let narrowing = implicit_conversion(&mut ctx, x(), &bytes4, &bytes2);
        assert!(matches!(narrowing, Err(TransformError::InternalConsistency(_))));
    }
}

#[test]
fn test_fixed_bytes_narrowing_keeps_leading_bytes() {
    let (bytes4, bytes2) = (Type::FixedBytes(4), Type::FixedBytes(2));

    let mut bv_ctx = ctx(Encoding::Bitvector);
    let symbolic = explicit_conversion(&mut bv_ctx, x(), Some(&bytes4), Some(&bytes2)).unwrap();
    assert_eq!(symbolic, Expr::bv_extract(x(), 31, 16));
    let literal =
        explicit_conversion(&mut bv_ctx, Expr::int(0x1234_5678), Some(&bytes4), Some(&bytes2))
            .unwrap();
    assert_eq!(literal, Expr::bv(0x1234u32, 16));

    let mut mod_ctx = ctx(Encoding::Modular);
    let symbolic = explicit_conversion(&mut mod_ctx, x(), Some(&bytes4), Some(&bytes2)).unwrap();
    assert_eq!(symbolic, Expr::intdiv(x(), Expr::int(65536)));
    let literal =
        explicit_conversion(&mut mod_ctx, Expr::int(0x1234_5678), Some(&bytes4), Some(&bytes2))
            .unwrap();
    assert_eq!(literal, Expr::int(0x1234));
}

#[test]
fn test_zero_width_range_constraint() {
    assert_eq!(
        range_constraint(x(), &Type::Int(0)),
        Expr::and(Expr::lte(Expr::int(-1), x()), Expr::lte(x(), Expr::int(0)))
    );
    assert_eq!(
        range_constraint(x(), &Type::Uint(0)),
        Expr::and(Expr::lte(Expr::int(0), x()), Expr::lte(x(), Expr::int(0)))
    );
}

#[test]
fn test_range_constraints() {
    assert_eq!(
        range_constraint(x(), &Type::Uint(8)),
        Expr::and(
            Expr::lte(Expr::int(0), x()),
            Expr::lte(x(), Expr::int(255))
        )
    );
    assert_eq!(
        range_constraint(x(), &Type::Int(8)),
        Expr::and(
            Expr::lte(Expr::int(-128), x()),
            Expr::lte(x(), Expr::int(127))
        )
    );
    let suit = Type::Enum(EnumType::new("Suit", ["Hearts", "Spades", "Clubs", "Diamonds"]));
    assert_eq!(
        range_constraint(x(), &suit),
        Expr::and(Expr::lte(Expr::int(0), x()), Expr::lt(x(), Expr::int(4)))
    );
    assert_eq!(range_constraint(x(), &Type::String), Expr::bool_lit(true));
}

#[test]
fn test_select_to_update_two_levels() {
    let outer = Expr::id("outer");
    let inner = Expr::select(outer.clone(), Expr::id("i"));
    let read = Expr::select(inner.clone(), Expr::id("j"));
    let v = Expr::id("v");

    let update = select_to_update(&read, v.clone()).unwrap();
    let expected = Expr::update(
        outer,
        Expr::id("i"),
        Expr::update(inner, Expr::id("j"), v),
    );
    assert_eq!(update, expected);
}

#[test]
fn test_select_to_update_rejects_other_shapes() {
    let result = select_to_update(&Expr::id("m"), Expr::int(1));
    assert!(matches!(result, Err(TransformError::InternalConsistency(_))));

    let tuple_base = Expr::select(Expr::tuple(vec![Expr::id("a")]), Expr::int(0));
    let update = select_to_update(&tuple_base, Expr::int(1)).unwrap();
    assert!(matches!(update.as_ref(), Expr::Update { .. }));
}

#[test]
fn test_naming_helpers() {
    assert_eq!(constructor_name(12), "__constructor#12");
    assert_eq!(data_location_name(DataLocation::Storage).unwrap(), "stor");
    assert_eq!(data_location_name(DataLocation::Memory).unwrap(), "mem");
    assert!(matches!(
        data_location_name(DataLocation::CallData),
        Err(TransformError::InternalConsistency(_))
    ));
    assert_eq!(
        mapping_type(IrType::named(ADDRESS_TYPE), IrType::Int).to_string(),
        "[address_t]int"
    );

    let loc = SourceLocation::new("Token.sol".to_string(), 4, 9, 40, 52);
    let attrs = source_attrs(&loc, "Overflow in addition");
    assert_eq!(attrs[0].name, "sourceloc");
    assert_eq!(attrs[0].args.len(), 3);
    assert_eq!(attrs[1].string_arg(), Some("Overflow in addition"));
}

#[test]
fn test_transfer_signature() {
    let mut ctx = ctx(Encoding::Bitvector);
    let transfer = create_transfer_proc(&mut ctx);
    assert_eq!(transfer.name, TRANSFER);
    let params: Vec<_> = transfer.params.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(params, vec![THIS, MSG_SENDER, MSG_VALUE, AMOUNT]);
    assert_eq!(transfer.params[3].ty, IrType::Bv(256));
    assert!(transfer.returns.is_empty());
    assert!(transfer.is_inline());
    assert_eq!(transfer.message(), Some("transfer"));
    assert_eq!(transfer.modifies, vec![BALANCE.to_string()]);
}

#[test]
fn test_call_and_send_signatures() {
    let mut ctx = ctx(Encoding::Mathematical);
    let call = create_call_proc(&mut ctx).unwrap();
    let returns: Vec<_> = call.returns.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(returns, vec![RESULT, CALLDATA]);
    assert_eq!(call.params.len(), 3);
    assert_eq!(call.message(), Some("call"));

    let send = create_send_proc(&mut ctx);
    assert_eq!(send.returns.len(), 1);
    assert_eq!(send.returns[0].ty, IrType::Bool);
    assert_eq!(send.message(), Some("send"));
    assert!(matches!(send.body.stmts.last(), Some(Stmt::IfElse { cond: None, .. })));
}

#[test]
fn test_overflow_checks_become_assertions() {
    let config = EncodingConfig::new(Encoding::Modular).with_overflow_checks(true);
    let mut ctx = EncodingContext::new(config);
    let transfer = create_transfer_proc(&mut ctx);
    let asserts = transfer
        .body
        .iter()
        .filter(|s| matches!(s, Stmt::Assert { .. }))
        .count();
    assert_eq!(asserts, 2);

    let mut unchecked = self::ctx(Encoding::Modular);
    let transfer = create_transfer_proc(&mut unchecked);
    assert!(!transfer.body.iter().any(|s| matches!(s, Stmt::Assert { .. })));
}

#[test]
fn test_builtin_program_is_well_typed() {
    for encoding in Encoding::all() {
        for check_overflow in [false, true] {
            let config = EncodingConfig::new(encoding).with_overflow_checks(check_overflow);
            let translation = builtin_program(config).unwrap();
            assert!(!translation.has_errors());
            check_program(&translation.program)
                .unwrap_or_else(|e| panic!("{} encoding: {}", encoding, e));
            assert!(translation.program.get_procedure(TRANSFER).is_some());
            assert!(translation.program.get_procedure(SEND).is_some());
            assert!(translation.program.get_procedure(CALL).is_some());
        }
    }
}

#[test]
fn test_bv_builtin_program_declares_functions() {
    let translation = builtin_program(EncodingConfig::new(Encoding::Bitvector)).unwrap();
    let names: Vec<_> = translation
        .program
        .decls()
        .map(|d| d.name().to_string())
        .collect();
    assert_eq!(
        names,
        vec![ADDRESS_TYPE, BALANCE, "bvuge256", "bvadd256", "bvsub256", TRANSFER, SEND, CALL]
    );
}
