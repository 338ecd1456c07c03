//! Arithmetic operators under the three numeric encodings.
//!
//! Every operation yields a value expression and, where the encoding can
//! silently wrap, a well-definedness condition stating that no wraparound
//! happened. Operators an encoding cannot express are reported through the
//! context and replaced by the error sentinel so translation can go on.

use super::config::Encoding;
use super::context::{EncodingContext, NodeId};
use super::conversion::wrap_value;
use super::errors::TransformError;
use num_bigint::{BigInt, BigUint};
use num_traits::{One, ToPrimitive, Zero};
use solvc_core::{BvBinaryOp, BvUnaryOp, Expr, ExprRef};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Sar,
    Lt,
    Gt,
    Lte,
    Gte,
}

impl BinaryOperator {
    pub const ALL: [BinaryOperator; 15] = [
        BinaryOperator::Add,
        BinaryOperator::Sub,
        BinaryOperator::Mul,
        BinaryOperator::Div,
        BinaryOperator::Mod,
        BinaryOperator::Exp,
        BinaryOperator::BitAnd,
        BinaryOperator::BitOr,
        BinaryOperator::BitXor,
        BinaryOperator::Shl,
        BinaryOperator::Sar,
        BinaryOperator::Lt,
        BinaryOperator::Gt,
        BinaryOperator::Lte,
        BinaryOperator::Gte,
    ];

    /// Accepts both the plain and the compound-assignment spelling (`+`, `+=`).
    pub fn from_token(token: &str) -> Option<Self> {
        let op = match token {
            "+" | "+=" => BinaryOperator::Add,
            "-" | "-=" => BinaryOperator::Sub,
            "*" | "*=" => BinaryOperator::Mul,
            "/" | "/=" => BinaryOperator::Div,
            "%" | "%=" => BinaryOperator::Mod,
            "**" => BinaryOperator::Exp,
            "&" | "&=" => BinaryOperator::BitAnd,
            "|" | "|=" => BinaryOperator::BitOr,
            "^" | "^=" => BinaryOperator::BitXor,
            "<<" | "<<=" => BinaryOperator::Shl,
            ">>" | ">>=" => BinaryOperator::Sar,
            "<" => BinaryOperator::Lt,
            ">" => BinaryOperator::Gt,
            "<=" => BinaryOperator::Lte,
            ">=" => BinaryOperator::Gte,
            _ => return None,
        };
        Some(op)
    }

    pub fn token(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::Exp => "**",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^",
            BinaryOperator::Shl => "<<",
            BinaryOperator::Sar => ">>",
            BinaryOperator::Lt => "<",
            BinaryOperator::Gt => ">",
            BinaryOperator::Lte => "<=",
            BinaryOperator::Gte => ">=",
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Lt | BinaryOperator::Gt | BinaryOperator::Lte | BinaryOperator::Gte
        )
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for BinaryOperator {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s.trim())
            .ok_or_else(|| TransformError::UnsupportedFeature(format!("binary operator '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Neg,
    BitNot,
}

impl UnaryOperator {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "-" => Some(UnaryOperator::Neg),
            "~" => Some(UnaryOperator::BitNot),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            UnaryOperator::Neg => "-",
            UnaryOperator::BitNot => "~",
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// A value together with the condition under which it is the true result.
/// No condition means the operation is always well-defined.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprWithCondition {
    pub expr: ExprRef,
    pub condition: Option<ExprRef>,
}

impl ExprWithCondition {
    pub fn new(expr: ExprRef) -> Self {
        Self {
            expr,
            condition: None,
        }
    }

    pub fn with_condition(expr: ExprRef, condition: ExprRef) -> Self {
        Self {
            expr,
            condition: Some(condition),
        }
    }

    pub fn error() -> Self {
        Self::new(Expr::error())
    }

    pub fn is_error(&self) -> bool {
        self.expr.is_error()
    }
}

fn pow2(bits: u32) -> BigInt {
    BigInt::one() << bits
}

/// Range limits of a `bits`-wide integer in the modular encoding.
struct Bounds {
    modulus: ExprRef,
    largest_signed: ExprRef,
    smallest_signed: ExprRef,
}

impl Bounds {
    fn new(bits: u32) -> Self {
        let half = pow2(bits.saturating_sub(1));
        Self {
            modulus: Expr::int(pow2(bits)),
            largest_signed: Expr::int(&half - BigInt::one()),
            smallest_signed: Expr::int(-half),
        }
    }

    /// Brings `raw` back into the signed range by one modulus step.
    fn wrap_signed(&self, raw: &ExprRef) -> ExprRef {
        Expr::cond(
            Expr::gt(raw.clone(), self.largest_signed.clone()),
            Expr::minus(raw.clone(), self.modulus.clone()),
            Expr::cond(
                Expr::lt(raw.clone(), self.smallest_signed.clone()),
                Expr::plus(raw.clone(), self.modulus.clone()),
                raw.clone(),
            ),
        )
    }
}

fn int_literal_power(lhs: &Expr, rhs: &Expr) -> Option<BigInt> {
    let base = lhs.as_int_lit()?;
    let exponent = rhs.as_int_lit()?.to_u32()?;
    Some(base.pow(exponent))
}

fn unsupported_binary(
    ctx: &mut EncodingContext,
    node: Option<NodeId>,
    op: BinaryOperator,
) -> ExprWithCondition {
    let error = match op {
        BinaryOperator::Exp => TransformError::UnsupportedExponentiation(ctx.encoding()),
        _ => TransformError::UnsupportedBinaryOperator {
            encoding: ctx.encoding(),
            operator: op.token().to_string(),
        },
    };
    ctx.report_error(node, error);
    ExprWithCondition::error()
}

fn unsupported_unary(
    ctx: &mut EncodingContext,
    node: Option<NodeId>,
    op: UnaryOperator,
) -> ExprWithCondition {
    let error = TransformError::UnsupportedUnaryOperator {
        encoding: ctx.encoding(),
        operator: op.token().to_string(),
    };
    ctx.report_error(node, error);
    ExprWithCondition::error()
}

/// Encodes `lhs op rhs` for operands of the given width and signedness.
///
/// Never fails: an operator the active encoding cannot express is reported
/// as a diagnostic attributed to `node` and yields the error sentinel.
pub fn encode_binary(
    ctx: &mut EncodingContext,
    node: Option<NodeId>,
    op: BinaryOperator,
    lhs: ExprRef,
    rhs: ExprRef,
    bits: u32,
    signed: bool,
) -> ExprWithCondition {
    match ctx.encoding() {
        Encoding::Mathematical => encode_int_binary(ctx, node, op, lhs, rhs),
        Encoding::Bitvector => encode_bv_binary(ctx, node, op, lhs, rhs, bits, signed),
        Encoding::Modular => encode_mod_binary(ctx, node, op, lhs, rhs, bits, signed),
    }
}

fn encode_int_binary(
    ctx: &mut EncodingContext,
    node: Option<NodeId>,
    op: BinaryOperator,
    lhs: ExprRef,
    rhs: ExprRef,
) -> ExprWithCondition {
    let expr = match op {
        BinaryOperator::Add => Expr::plus(lhs, rhs),
        BinaryOperator::Sub => Expr::minus(lhs, rhs),
        BinaryOperator::Mul => Expr::times(lhs, rhs),
        // Euclidean, unlike Solidity's truncating division on negative operands.
        BinaryOperator::Div => Expr::intdiv(lhs, rhs),
        BinaryOperator::Mod => Expr::modulo(lhs, rhs),
        BinaryOperator::Lt => Expr::lt(lhs, rhs),
        BinaryOperator::Gt => Expr::gt(lhs, rhs),
        BinaryOperator::Lte => Expr::lte(lhs, rhs),
        BinaryOperator::Gte => Expr::gte(lhs, rhs),
        BinaryOperator::Exp => match int_literal_power(&lhs, &rhs) {
            Some(power) => Expr::int(power),
            None => return unsupported_binary(ctx, node, op),
        },
        BinaryOperator::BitAnd
        | BinaryOperator::BitOr
        | BinaryOperator::BitXor
        | BinaryOperator::Shl
        | BinaryOperator::Sar => return unsupported_binary(ctx, node, op),
    };
    ExprWithCondition::new(expr)
}

fn encode_bv_binary(
    ctx: &mut EncodingContext,
    node: Option<NodeId>,
    op: BinaryOperator,
    lhs: ExprRef,
    rhs: ExprRef,
    bits: u32,
    signed: bool,
) -> ExprWithCondition {
    let pick = |signed_op, unsigned_op| if signed { signed_op } else { unsigned_op };
    let bv_op = match op {
        BinaryOperator::Add => BvBinaryOp::Add,
        BinaryOperator::Sub => BvBinaryOp::Sub,
        BinaryOperator::Mul => BvBinaryOp::Mul,
        BinaryOperator::Div => pick(BvBinaryOp::SDiv, BvBinaryOp::UDiv),
        BinaryOperator::Mod => pick(BvBinaryOp::SRem, BvBinaryOp::URem),
        BinaryOperator::BitAnd => BvBinaryOp::And,
        BinaryOperator::BitOr => BvBinaryOp::Or,
        BinaryOperator::BitXor => BvBinaryOp::Xor,
        BinaryOperator::Shl => BvBinaryOp::Shl,
        BinaryOperator::Sar => pick(BvBinaryOp::AShr, BvBinaryOp::LShr),
        BinaryOperator::Lt => pick(BvBinaryOp::Slt, BvBinaryOp::Ult),
        BinaryOperator::Gt => pick(BvBinaryOp::Sgt, BvBinaryOp::Ugt),
        BinaryOperator::Lte => pick(BvBinaryOp::Sle, BvBinaryOp::Ule),
        BinaryOperator::Gte => pick(BvBinaryOp::Sge, BvBinaryOp::Uge),
        BinaryOperator::Exp => {
            return match (lhs.as_bv_lit(), rhs.as_bv_lit()) {
                (Some((base, _)), Some((exponent, _))) => {
                    let modulus = BigUint::one() << bits;
                    ExprWithCondition::new(Expr::bv(base.modpow(exponent, &modulus), bits))
                }
                _ => unsupported_binary(ctx, node, op),
            };
        }
    };
    ExprWithCondition::new(ctx.bv_binary(bv_op, bits, lhs, rhs))
}

fn encode_mod_binary(
    ctx: &mut EncodingContext,
    node: Option<NodeId>,
    op: BinaryOperator,
    lhs: ExprRef,
    rhs: ExprRef,
    bits: u32,
    signed: bool,
) -> ExprWithCondition {
    let bounds = Bounds::new(bits);
    let zero = || Expr::int(0);

    let (raw, result) = match op {
        BinaryOperator::Add => {
            let sum = Expr::plus(lhs, rhs);
            let result = if signed {
                bounds.wrap_signed(&sum)
            } else {
                Expr::cond(
                    Expr::gte(sum.clone(), bounds.modulus.clone()),
                    Expr::minus(sum.clone(), bounds.modulus.clone()),
                    sum.clone(),
                )
            };
            (sum, result)
        }
        BinaryOperator::Sub => {
            let diff = Expr::minus(lhs.clone(), rhs.clone());
            let result = if signed {
                bounds.wrap_signed(&diff)
            } else {
                Expr::cond(
                    Expr::gte(lhs, rhs),
                    diff.clone(),
                    Expr::plus(diff.clone(), bounds.modulus.clone()),
                )
            };
            (diff, result)
        }
        BinaryOperator::Mul => {
            let prod = Expr::times(lhs.clone(), rhs.clone());
            let result = if signed {
                let to_unsigned = |e: ExprRef| {
                    Expr::cond(
                        Expr::gte(e.clone(), zero()),
                        e.clone(),
                        Expr::plus(bounds.modulus.clone(), e),
                    )
                };
                let wrapped = Expr::modulo(
                    Expr::times(to_unsigned(lhs), to_unsigned(rhs)),
                    bounds.modulus.clone(),
                );
                Expr::cond(
                    Expr::gt(wrapped.clone(), bounds.largest_signed.clone()),
                    Expr::minus(wrapped.clone(), bounds.modulus.clone()),
                    wrapped,
                )
            } else {
                Expr::cond(
                    Expr::gte(prod.clone(), bounds.modulus.clone()),
                    Expr::modulo(prod.clone(), bounds.modulus.clone()),
                    prod.clone(),
                )
            };
            (prod, result)
        }
        // `div` is Euclidean, so a negative dividend rounds towards negative
        // infinity instead of towards zero (`-7 / 2` is `-4`). Kept as is,
        // like the comparisons below.
        BinaryOperator::Div => {
            let quot = Expr::intdiv(lhs, rhs);
            let result = if signed {
                bounds.wrap_signed(&quot)
            } else {
                quot.clone()
            };
            (quot, result)
        }
        // Order is compared on the unwrapped values.
        BinaryOperator::Lt => return ExprWithCondition::new(Expr::lt(lhs, rhs)),
        BinaryOperator::Gt => return ExprWithCondition::new(Expr::gt(lhs, rhs)),
        BinaryOperator::Lte => return ExprWithCondition::new(Expr::lte(lhs, rhs)),
        BinaryOperator::Gte => return ExprWithCondition::new(Expr::gte(lhs, rhs)),
        BinaryOperator::Exp => match int_literal_power(&lhs, &rhs) {
            Some(power) => {
                let reduced = wrap_value(&power, bits, signed);
                let result = ctx.int_lit(&reduced, bits);
                (ctx.int_lit(&power, bits), result)
            }
            None => return unsupported_binary(ctx, node, op),
        },
        BinaryOperator::Mod
        | BinaryOperator::BitAnd
        | BinaryOperator::BitOr
        | BinaryOperator::BitXor
        | BinaryOperator::Shl
        | BinaryOperator::Sar => return unsupported_binary(ctx, node, op),
    };

    let condition = Expr::eq(raw, result.clone());
    ExprWithCondition::with_condition(result, condition)
}

/// Encodes `op operand`; same totality guarantee as [`encode_binary`].
pub fn encode_unary(
    ctx: &mut EncodingContext,
    node: Option<NodeId>,
    op: UnaryOperator,
    operand: ExprRef,
    bits: u32,
    signed: bool,
) -> ExprWithCondition {
    match (ctx.encoding(), op) {
        (Encoding::Mathematical, UnaryOperator::Neg) => ExprWithCondition::new(Expr::neg(operand)),
        (Encoding::Bitvector, UnaryOperator::Neg) => {
            ExprWithCondition::new(ctx.bv_unary(BvUnaryOp::Neg, bits, operand))
        }
        (Encoding::Bitvector, UnaryOperator::BitNot) => {
            ExprWithCondition::new(ctx.bv_unary(BvUnaryOp::Not, bits, operand))
        }
        (Encoding::Modular, UnaryOperator::Neg) => {
            let negated = Expr::neg(operand.clone());
            let bounds = Bounds::new(bits);
            let result = if signed {
                // The minimum has no positive counterpart and negates to itself.
                Expr::cond(
                    Expr::eq(operand, bounds.smallest_signed.clone()),
                    bounds.smallest_signed,
                    negated.clone(),
                )
            } else {
                let zero = Expr::int(BigInt::zero());
                Expr::cond(
                    Expr::eq(operand.clone(), zero.clone()),
                    zero,
                    Expr::minus(bounds.modulus, operand),
                )
            };
            let condition = Expr::eq(negated, result.clone());
            ExprWithCondition::with_condition(result, condition)
        }
        (Encoding::Mathematical, UnaryOperator::BitNot)
        | (Encoding::Modular, UnaryOperator::BitNot) => unsupported_unary(ctx, node, op),
    }
}
