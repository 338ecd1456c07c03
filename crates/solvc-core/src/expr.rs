use num_bigint::{BigInt, BigUint};
use num_traits::One;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Expressions are immutable and shared: a subtree reused in several places
/// (a balance read used by both a value and its overflow condition) is the
/// same allocation.
pub type ExprRef = Rc<Expr>;

pub const ERROR_EXPR: &str = "__ERROR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    IntDiv,
    Mod,
    Eq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
    And,
    Or,
    Implies,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::IntDiv => "div",
            BinaryOp::Mod => "mod",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Lte => "<=",
            BinaryOp::Gte => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Implies => "==>",
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::IntDiv | BinaryOp::Mod
        )
    }

    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Lte | BinaryOp::Gte
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or | BinaryOp::Implies)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BvBinaryOp {
    Add,
    Sub,
    Mul,
    UDiv,
    SDiv,
    URem,
    SRem,
    And,
    Or,
    Xor,
    Shl,
    LShr,
    AShr,
    Ult,
    Ugt,
    Ule,
    Uge,
    Slt,
    Sgt,
    Sle,
    Sge,
}

impl BvBinaryOp {
    /// SMT-LIB name of the operation, used for the `bvbuiltin` attribute.
    pub fn smt_name(&self) -> &'static str {
        match self {
            BvBinaryOp::Add => "bvadd",
            BvBinaryOp::Sub => "bvsub",
            BvBinaryOp::Mul => "bvmul",
            BvBinaryOp::UDiv => "bvudiv",
            BvBinaryOp::SDiv => "bvsdiv",
            BvBinaryOp::URem => "bvurem",
            BvBinaryOp::SRem => "bvsrem",
            BvBinaryOp::And => "bvand",
            BvBinaryOp::Or => "bvor",
            BvBinaryOp::Xor => "bvxor",
            BvBinaryOp::Shl => "bvshl",
            BvBinaryOp::LShr => "bvlshr",
            BvBinaryOp::AShr => "bvashr",
            BvBinaryOp::Ult => "bvult",
            BvBinaryOp::Ugt => "bvugt",
            BvBinaryOp::Ule => "bvule",
            BvBinaryOp::Uge => "bvuge",
            BvBinaryOp::Slt => "bvslt",
            BvBinaryOp::Sgt => "bvsgt",
            BvBinaryOp::Sle => "bvsle",
            BvBinaryOp::Sge => "bvsge",
        }
    }

    pub fn function_name(&self, width: u32) -> String {
        format!("{}{}", self.smt_name(), width)
    }

    /// Comparisons yield `bool` rather than a bitvector.
    pub fn is_predicate(&self) -> bool {
        matches!(
            self,
            BvBinaryOp::Ult
                | BvBinaryOp::Ugt
                | BvBinaryOp::Ule
                | BvBinaryOp::Uge
                | BvBinaryOp::Slt
                | BvBinaryOp::Sgt
                | BvBinaryOp::Sle
                | BvBinaryOp::Sge
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BvUnaryOp {
    Neg,
    Not,
}

impl BvUnaryOp {
    pub fn smt_name(&self) -> &'static str {
        match self {
            BvUnaryOp::Neg => "bvneg",
            BvUnaryOp::Not => "bvnot",
        }
    }

    pub fn function_name(&self, width: u32) -> String {
        format!("{}{}", self.smt_name(), width)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Extension {
    Zero,
    Sign,
}

impl Extension {
    pub fn smt_name(&self, from: u32, to: u32) -> String {
        match self {
            Extension::Zero => format!("zero_extend {}", to - from),
            Extension::Sign => format!("sign_extend {}", to - from),
        }
    }

    pub fn function_name(&self, from: u32, to: u32) -> String {
        match self {
            Extension::Zero => format!("bvzeroext_{}_to_{}", from, to),
            Extension::Sign => format!("bvsignext_{}_to_{}", from, to),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
    BoolLit(bool),
    IntLit(BigInt),
    BvLit {
        value: BigUint,
        width: u32,
    },
    Id(String),
    Unary {
        op: UnaryOp,
        operand: ExprRef,
    },
    Binary {
        op: BinaryOp,
        lhs: ExprRef,
        rhs: ExprRef,
    },
    Cond {
        cond: ExprRef,
        then_expr: ExprRef,
        else_expr: ExprRef,
    },
    Select {
        base: ExprRef,
        index: ExprRef,
    },
    /// Functional map write: a new map equal to `base` except at `index`.
    Update {
        base: ExprRef,
        index: ExprRef,
        value: ExprRef,
    },
    Tuple(Vec<ExprRef>),
    BvUnary {
        op: BvUnaryOp,
        width: u32,
        operand: ExprRef,
    },
    BvBinary {
        op: BvBinaryOp,
        width: u32,
        lhs: ExprRef,
        rhs: ExprRef,
    },
    BvExtend {
        kind: Extension,
        from: u32,
        to: u32,
        operand: ExprRef,
    },
    /// Bits `hi` down to `lo`, both inclusive.
    BvExtract {
        operand: ExprRef,
        hi: u32,
        lo: u32,
    },
    /// Placeholder for a construct that could not be translated.
    Error,
}

impl Expr {
    pub fn bool_lit(value: bool) -> ExprRef {
        Rc::new(Expr::BoolLit(value))
    }

    pub fn int(value: impl Into<BigInt>) -> ExprRef {
        Rc::new(Expr::IntLit(value.into()))
    }

    /// Values wider than `width` are truncated to the low `width` bits.
    pub fn bv(value: impl Into<BigUint>, width: u32) -> ExprRef {
        let modulus = BigUint::one() << width;
        Rc::new(Expr::BvLit {
            value: value.into() % modulus,
            width,
        })
    }

    pub fn id(name: impl Into<String>) -> ExprRef {
        Rc::new(Expr::Id(name.into()))
    }

    pub fn error() -> ExprRef {
        Rc::new(Expr::Error)
    }

    pub fn not(operand: ExprRef) -> ExprRef {
        Rc::new(Expr::Unary {
            op: UnaryOp::Not,
            operand,
        })
    }

    pub fn neg(operand: ExprRef) -> ExprRef {
        Rc::new(Expr::Unary {
            op: UnaryOp::Neg,
            operand,
        })
    }

    pub fn binary(op: BinaryOp, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        Rc::new(Expr::Binary { op, lhs, rhs })
    }

    pub fn plus(lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        Self::binary(BinaryOp::Add, lhs, rhs)
    }

    pub fn minus(lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        Self::binary(BinaryOp::Sub, lhs, rhs)
    }

    pub fn times(lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        Self::binary(BinaryOp::Mul, lhs, rhs)
    }

    pub fn intdiv(lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        Self::binary(BinaryOp::IntDiv, lhs, rhs)
    }

    pub fn modulo(lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        Self::binary(BinaryOp::Mod, lhs, rhs)
    }

    pub fn eq(lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        Self::binary(BinaryOp::Eq, lhs, rhs)
    }

    pub fn neq(lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        Self::binary(BinaryOp::Neq, lhs, rhs)
    }

    pub fn lt(lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        Self::binary(BinaryOp::Lt, lhs, rhs)
    }

    pub fn gt(lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        Self::binary(BinaryOp::Gt, lhs, rhs)
    }

    pub fn lte(lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        Self::binary(BinaryOp::Lte, lhs, rhs)
    }

    pub fn gte(lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        Self::binary(BinaryOp::Gte, lhs, rhs)
    }

    pub fn and(lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        Self::binary(BinaryOp::And, lhs, rhs)
    }

    pub fn or(lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        Self::binary(BinaryOp::Or, lhs, rhs)
    }

    pub fn implies(lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        Self::binary(BinaryOp::Implies, lhs, rhs)
    }

    /// Conjunction of all operands; `true` when empty.
    pub fn and_all(operands: impl IntoIterator<Item = ExprRef>) -> ExprRef {
        operands
            .into_iter()
            .reduce(Self::and)
            .unwrap_or_else(|| Self::bool_lit(true))
    }

    pub fn cond(cond: ExprRef, then_expr: ExprRef, else_expr: ExprRef) -> ExprRef {
        Rc::new(Expr::Cond {
            cond,
            then_expr,
            else_expr,
        })
    }

    pub fn select(base: ExprRef, index: ExprRef) -> ExprRef {
        Rc::new(Expr::Select { base, index })
    }

    pub fn update(base: ExprRef, index: ExprRef, value: ExprRef) -> ExprRef {
        Rc::new(Expr::Update { base, index, value })
    }

    pub fn tuple(elements: Vec<ExprRef>) -> ExprRef {
        Rc::new(Expr::Tuple(elements))
    }

    pub fn bv_unary(op: BvUnaryOp, width: u32, operand: ExprRef) -> ExprRef {
        Rc::new(Expr::BvUnary { op, width, operand })
    }

    pub fn bv_binary(op: BvBinaryOp, width: u32, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        Rc::new(Expr::BvBinary {
            op,
            width,
            lhs,
            rhs,
        })
    }

    pub fn bv_extend(kind: Extension, from: u32, to: u32, operand: ExprRef) -> ExprRef {
        Rc::new(Expr::BvExtend {
            kind,
            from,
            to,
            operand,
        })
    }

    pub fn bv_extract(operand: ExprRef, hi: u32, lo: u32) -> ExprRef {
        Rc::new(Expr::BvExtract { operand, hi, lo })
    }

    pub fn as_int_lit(&self) -> Option<&BigInt> {
        match self {
            Expr::IntLit(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bv_lit(&self) -> Option<(&BigUint, u32)> {
        match self {
            Expr::BvLit { value, width } => Some((value, *width)),
            _ => None,
        }
    }

    pub fn as_bool_lit(&self) -> Option<bool> {
        match self {
            Expr::BoolLit(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Expr::Error)
    }

    pub fn is_select(&self) -> bool {
        matches!(self, Expr::Select { .. })
    }

    pub fn contains_error(&self) -> bool {
        match self {
            Expr::Error => true,
            Expr::BoolLit(_) | Expr::IntLit(_) | Expr::BvLit { .. } | Expr::Id(_) => false,
            Expr::Unary { operand, .. }
            | Expr::BvUnary { operand, .. }
            | Expr::BvExtend { operand, .. }
            | Expr::BvExtract { operand, .. } => operand.contains_error(),
            Expr::Binary { lhs, rhs, .. } | Expr::BvBinary { lhs, rhs, .. } => {
                lhs.contains_error() || rhs.contains_error()
            }
            Expr::Cond {
                cond,
                then_expr,
                else_expr,
            } => cond.contains_error() || then_expr.contains_error() || else_expr.contains_error(),
            Expr::Select { base, index } => base.contains_error() || index.contains_error(),
            Expr::Update { base, index, value } => {
                base.contains_error() || index.contains_error() || value.contains_error()
            }
            Expr::Tuple(elements) => elements.iter().any(|e| e.contains_error()),
        }
    }
}
