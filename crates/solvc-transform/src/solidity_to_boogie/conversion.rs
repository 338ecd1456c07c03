use super::config::Encoding;
use super::context::EncodingContext;
use super::errors::{Result, TransformError};
use super::type_classifier::TypeClassifier;
use num_bigint::BigInt;
use num_traits::{One, Signed};
use solvc_core::{BvBinaryOp, BvUnaryOp, Expr, ExprRef, Type};

fn pow2(bits: u32) -> BigInt {
    BigInt::one() << bits
}

fn smallest_signed(bits: u32) -> BigInt {
    -pow2(bits.saturating_sub(1))
}

fn largest_signed(bits: u32) -> BigInt {
    pow2(bits.saturating_sub(1)) - BigInt::one()
}

fn inconsistent(message: String) -> TransformError {
    TransformError::InternalConsistency(message)
}

/// Bitvector literal for `value`; negative values become the negation of
/// their magnitude.
fn bv_literal(ctx: &mut EncodingContext, value: &BigInt, bits: u32) -> ExprRef {
    if value.is_negative() {
        let magnitude = Expr::bv(value.magnitude().clone(), bits);
        ctx.bv_unary(BvUnaryOp::Neg, bits, magnitude)
    } else {
        Expr::bv(value.magnitude().clone(), bits)
    }
}

/// `value` reduced into the range of a `bits`-wide integer.
pub(super) fn wrap_value(value: &BigInt, bits: u32, signed: bool) -> BigInt {
    let modulus = pow2(bits);
    let wrapped = ((value % &modulus) + &modulus) % &modulus;
    if signed && wrapped > largest_signed(bits) {
        wrapped - modulus
    } else {
        wrapped
    }
}

fn wrap_expr(expr: ExprRef, bits: u32, signed: bool) -> ExprRef {
    let modulus = Expr::int(pow2(bits));
    let wrapped = Expr::modulo(expr, modulus.clone());
    if signed {
        Expr::cond(
            Expr::gt(wrapped.clone(), Expr::int(largest_signed(bits))),
            Expr::minus(wrapped.clone(), modulus),
            wrapped,
        )
    } else {
        wrapped
    }
}

fn fixed_bytes_widths(from: &Type, to: &Type) -> Option<(u32, u32)> {
    match (from, to) {
        (Type::FixedBytes(from), Type::FixedBytes(to)) => {
            Some((u32::from(*from) * 8, u32::from(*to) * 8))
        }
        _ => None,
    }
}

/// Resizes a `bytesN` value. Bytes are left-aligned: widening pads with zero
/// bytes on the right and narrowing keeps the leading bytes.
fn resize_fixed_bytes(
    ctx: &mut EncodingContext,
    expr: ExprRef,
    from_bits: u32,
    to_bits: u32,
) -> ExprRef {
    if from_bits == to_bits {
        return expr;
    }
    let bitvector = ctx.encoding() == Encoding::Bitvector;
    let widening = to_bits > from_bits;
    let shift = to_bits.abs_diff(from_bits);

    if let Some(value) = expr.as_int_lit() {
        let resized = if widening { value << shift } else { value >> shift };
        return if bitvector {
            bv_literal(ctx, &resized, to_bits)
        } else {
            Expr::int(resized)
        };
    }

    match (bitvector, widening) {
        (true, true) => {
            let extended = ctx.bv_zero_ext(expr, from_bits, to_bits);
            ctx.bv_binary(BvBinaryOp::Shl, to_bits, extended, Expr::bv(shift, to_bits))
        }
        (true, false) => ctx.bv_extract(expr, from_bits - 1, shift),
        (false, true) => Expr::times(expr, Expr::int(pow2(shift))),
        (false, false) => Expr::intdiv(expr, Expr::int(pow2(shift))),
    }
}

/// Converts `expr` from `from` to `to` where the source language allows it
/// without a cast. Only the bitvector encoding changes the expression; the
/// widening-only presuppositions are checked under every encoding.
///
/// Narrowing, or a signed value reaching an unsigned target, means the front
/// end let an illegal conversion through and is reported as
/// [`TransformError::InternalConsistency`].
pub fn implicit_conversion(
    ctx: &mut EncodingContext,
    expr: ExprRef,
    from: &Type,
    to: &Type,
) -> Result<ExprRef> {
    if let Type::Tuple(targets) = to {
        let sources = match from {
            Type::Tuple(sources) if sources.len() == targets.len() => sources,
            _ => {
                return Err(inconsistent(format!(
                    "cannot convert {} to tuple type {}",
                    from, to
                )))
            }
        };
        let elements = match expr.as_ref() {
            Expr::Tuple(elements) if elements.len() == targets.len() => elements,
            _ => {
                return Err(inconsistent(format!(
                    "expected a tuple expression for conversion to {}",
                    to
                )))
            }
        };

        let mut converted = Vec::with_capacity(elements.len());
        for ((element, source), target) in elements.iter().zip(sources).zip(targets) {
            let element = match (source, target) {
                (_, None) => element.clone(),
                (Some(source), Some(target)) => {
                    implicit_conversion(ctx, element.clone(), source, target)?
                }
                (None, Some(target)) => {
                    return Err(inconsistent(format!(
                        "tuple component of unknown type converted to {}",
                        target
                    )))
                }
            };
            converted.push(element);
        }
        return Ok(Expr::tuple(converted));
    }

    let (to_bits, to_signed) = match TypeClassifier::shape(to) {
        Some(shape) => shape,
        None => return Ok(expr),
    };
    let bitvector = ctx.encoding() == Encoding::Bitvector;

    if let Some((from_bits, to_bits)) = fixed_bytes_widths(from, to) {
        if to_bits < from_bits {
            return Err(inconsistent(format!(
                "implicit conversion from {} to smaller type {}",
                from, to
            )));
        }
        return Ok(resize_fixed_bytes(ctx, expr, from_bits, to_bits));
    }

    if let Some(value) = expr.as_int_lit() {
        return Ok(if bitvector {
            bv_literal(ctx, value, to_bits)
        } else {
            expr.clone()
        });
    }

    let (from_bits, from_signed) = match TypeClassifier::shape(from) {
        Some(shape) => shape,
        None => return Ok(expr),
    };

    if from_bits == to_bits && from_signed == to_signed {
        return Ok(expr);
    }
    if to_bits < from_bits {
        return Err(inconsistent(format!(
            "implicit conversion from {} to smaller type {}",
            from, to
        )));
    }
    if from_signed && !to_signed {
        return Err(inconsistent(format!(
            "implicit conversion from signed {} to unsigned {}",
            from, to
        )));
    }
    if !bitvector || from_bits == to_bits {
        return Ok(expr);
    }

    Ok(if from_signed {
        ctx.bv_sign_ext(expr, from_bits, to_bits)
    } else {
        ctx.bv_zero_ext(expr, from_bits, to_bits)
    })
}

/// Converts `expr` for an explicit cast. Unknown types leave the expression
/// untouched.
///
/// Narrowing and sign changes truncate under the bitvector encoding and wrap
/// into the target range under the modular encoding; everything else goes
/// through [`implicit_conversion`].
pub fn explicit_conversion(
    ctx: &mut EncodingContext,
    expr: ExprRef,
    from: Option<&Type>,
    to: Option<&Type>,
) -> Result<ExprRef> {
    let (from, to) = match (from, to) {
        (Some(from), Some(to)) => (from, to),
        _ => return Ok(expr),
    };
    let (to_bits, to_signed) = match TypeClassifier::shape(to) {
        Some(shape) => shape,
        None => return Ok(expr),
    };

    if let Some((from_bits, to_bits)) = fixed_bytes_widths(from, to) {
        return Ok(resize_fixed_bytes(ctx, expr, from_bits, to_bits));
    }

    if let Some(value) = expr.as_int_lit() {
        if ctx.encoding() == Encoding::Modular {
            return Ok(Expr::int(wrap_value(value, to_bits, to_signed)));
        }
        return implicit_conversion(ctx, expr, from, to);
    }

    let (from_bits, from_signed) = match TypeClassifier::shape(from) {
        Some(shape) => shape,
        None => return Ok(expr),
    };

    let needs_cast = to_bits < from_bits
        || (from_signed && !to_signed)
        || (to_bits == from_bits && !from_signed && to_signed);
    if !needs_cast {
        return implicit_conversion(ctx, expr, from, to);
    }

    Ok(match ctx.encoding() {
        Encoding::Mathematical => expr,
        Encoding::Modular => wrap_expr(expr, to_bits, to_signed),
        // Bitvectors carry no sign, so only the width can change.
        Encoding::Bitvector if to_bits == from_bits => expr,
        Encoding::Bitvector if to_bits > from_bits => ctx.bv_sign_ext(expr, from_bits, to_bits),
        Encoding::Bitvector => ctx.bv_extract(expr, to_bits - 1, 0),
    })
}

/// Type-range constraint (TCC) bounding `expr` to the values of `ty`.
/// Types without numeric bounds yield `true`.
pub fn range_constraint(expr: ExprRef, ty: &Type) -> ExprRef {
    if let Type::Enum(enum_type) = ty {
        return Expr::and(
            Expr::lte(Expr::int(0), expr.clone()),
            Expr::lt(expr, Expr::int(enum_type.member_count())),
        );
    }

    match TypeClassifier::shape(ty) {
        Some((bits, true)) => Expr::and(
            Expr::lte(Expr::int(smallest_signed(bits)), expr.clone()),
            Expr::lte(expr, Expr::int(largest_signed(bits))),
        ),
        Some((bits, false)) => Expr::and(
            Expr::lte(Expr::int(0), expr.clone()),
            Expr::lte(expr, Expr::int(pow2(bits) - BigInt::one())),
        ),
        None => Expr::bool_lit(true),
    }
}
