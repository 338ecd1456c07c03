//! Reference interpreter for the IR.
//!
//! Expressions evaluate to [`Value`]s under the target language's semantics:
//! unbounded integers with Euclidean `div`/`mod`, and bitvector builtins
//! with SMT-LIB behaviour (including division by zero). Statement execution
//! explores every branch of a nondeterministic `if (*)`, drops paths whose
//! `assume` fails, and reports failed `assert`s as outcomes.

use crate::decl::{find_attr, Attr, ProcDecl};
use crate::expr::{BinaryOp, BvBinaryOp, BvUnaryOp, Expr, Extension, UnaryOp};
use crate::ir_type::IrType;
use crate::stmt::{Block, Stmt};
use crate::{IrError, Result};
use indexmap::IndexMap;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Value {
    Bool(bool),
    Int(BigInt),
    Bv { value: BigUint, width: u32 },
    Map(MapValue),
    Tuple(Vec<Value>),
}

/// Total map: a default plus the finitely many keys that differ from it.
///
/// Entries equal to the default are never stored, so two maps holding the
/// same mapping compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MapValue {
    default: Box<Value>,
    entries: BTreeMap<Value, Value>,
}

impl MapValue {
    pub fn new(default: Value) -> Self {
        Self {
            default: Box::new(default),
            entries: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &Value) -> &Value {
        self.entries.get(key).unwrap_or(&self.default)
    }

    pub fn set(&mut self, key: Value, value: Value) {
        if value == *self.default {
            self.entries.remove(&key);
        } else {
            self.entries.insert(key, value);
        }
    }

    pub fn with(mut self, key: Value, value: Value) -> Self {
        self.set(key, value);
        self
    }
}

fn modulus(width: u32) -> BigUint {
    BigUint::one() << width
}

fn from_signed(value: &BigInt, width: u32) -> BigUint {
    let m = BigInt::from(modulus(width));
    let wrapped = ((value % &m) + &m) % &m;
    wrapped.into_parts().1
}

/// Euclidean division: the remainder is always in `0..|rhs|`.
fn euclid_div_rem(lhs: &BigInt, rhs: &BigInt) -> (BigInt, BigInt) {
    let mut rem = lhs % rhs;
    if rem.is_negative() {
        rem += rhs.abs();
    }
    let quot = (lhs - &rem) / rhs;
    (quot, rem)
}

impl Value {
    pub fn int(value: impl Into<BigInt>) -> Self {
        Value::Int(value.into())
    }

    /// Bitvector from a possibly negative integer, in two's complement.
    pub fn bv(value: impl Into<BigInt>, width: u32) -> Self {
        Value::Bv {
            value: from_signed(&value.into(), width),
            width,
        }
    }

    /// Default value of a freshly declared variable of type `ty`.
    pub fn default_for(ty: &IrType) -> Self {
        match ty {
            IrType::Bool => Value::Bool(false),
            IrType::Int | IrType::Named(_) => Value::Int(BigInt::zero()),
            IrType::Bv(width) => Value::Bv {
                value: BigUint::zero(),
                width: *width,
            },
            IrType::Map(_, value) => Value::Map(MapValue::new(Self::default_for(value))),
            IrType::Tuple(elements) => Value::Tuple(elements.iter().map(Self::default_for).collect()),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(IrError::EvalError(format!("expected bool, found {}", other))),
        }
    }

    pub fn as_int(&self) -> Result<&BigInt> {
        match self {
            Value::Int(i) => Ok(i),
            other => Err(IrError::EvalError(format!("expected int, found {}", other))),
        }
    }

    pub fn as_bv(&self) -> Result<(&BigUint, u32)> {
        match self {
            Value::Bv { value, width } => Ok((value, *width)),
            other => Err(IrError::EvalError(format!(
                "expected bitvector, found {}",
                other
            ))),
        }
    }

    pub fn as_map(&self) -> Result<&MapValue> {
        match self {
            Value::Map(map) => Ok(map),
            other => Err(IrError::EvalError(format!("expected map, found {}", other))),
        }
    }

    /// Two's-complement reading of a bitvector.
    pub fn to_signed(&self) -> Result<BigInt> {
        let (value, width) = self.as_bv()?;
        let signed = BigInt::from(value.clone());
        if is_negative(value, width) {
            Ok(signed - BigInt::from(modulus(width)))
        } else {
            Ok(signed)
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Bv { value, width } => write!(f, "{}bv{}", value, width),
            Value::Map(map) => {
                write!(f, "[")?;
                for (key, value) in &map.entries {
                    write!(f, "{} := {}, ", key, value)?;
                }
                write!(f, "_ := {}]", map.default)
            }
            Value::Tuple(elements) => {
                let parts = elements
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "({})", parts)
            }
        }
    }
}

/// Variable store for evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Env {
    vars: IndexMap<String, Value>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value);
    }

    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.bind(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    fn lookup(&self, name: &str) -> Result<&Value> {
        self.get(name)
            .ok_or_else(|| IrError::UnboundIdentifier(name.to_string()))
    }
}

pub fn eval(expr: &Expr, env: &Env) -> Result<Value> {
    match expr {
        Expr::BoolLit(b) => Ok(Value::Bool(*b)),
        Expr::IntLit(i) => Ok(Value::Int(i.clone())),
        Expr::BvLit { value, width } => Ok(Value::Bv {
            value: value.clone(),
            width: *width,
        }),
        Expr::Id(name) => env.lookup(name).cloned(),
        Expr::Error => Err(IrError::EvalError(
            "cannot evaluate an untranslated construct".to_string(),
        )),
        Expr::Unary { op, operand } => {
            let value = eval(operand, env)?;
            match op {
                UnaryOp::Not => Ok(Value::Bool(!value.as_bool()?)),
                UnaryOp::Neg => Ok(Value::Int(-value.as_int()?.clone())),
            }
        }
        Expr::Binary { op, lhs, rhs } => eval_binary(*op, lhs, rhs, env),
        Expr::Cond {
            cond,
            then_expr,
            else_expr,
        } => {
            if eval(cond, env)?.as_bool()? {
                eval(then_expr, env)
            } else {
                eval(else_expr, env)
            }
        }
        Expr::Select { base, index } => {
            let map = eval(base, env)?;
            let key = eval(index, env)?;
            Ok(map.as_map()?.get(&key).clone())
        }
        Expr::Update { base, index, value } => {
            let map = eval(base, env)?.as_map()?.clone();
            let key = eval(index, env)?;
            let value = eval(value, env)?;
            Ok(Value::Map(map.with(key, value)))
        }
        Expr::Tuple(elements) => elements
            .iter()
            .map(|e| eval(e, env))
            .collect::<Result<Vec<_>>>()
            .map(Value::Tuple),
        Expr::BvUnary { op, width, operand } => {
            let operand = eval(operand, env)?;
            let (value, _) = operand.as_bv()?;
            let m = modulus(*width);
            let result = match op {
                BvUnaryOp::Neg => (&m - value) % &m,
                BvUnaryOp::Not => (&m - BigUint::one()) - value,
            };
            Ok(Value::Bv {
                value: result,
                width: *width,
            })
        }
        Expr::BvBinary {
            op,
            width,
            lhs,
            rhs,
        } => eval_bv_binary(*op, *width, &eval(lhs, env)?, &eval(rhs, env)?),
        Expr::BvExtend {
            kind, to, operand, ..
        } => {
            let operand = eval(operand, env)?;
            let value = match kind {
                Extension::Zero => operand.as_bv()?.0.clone(),
                Extension::Sign => from_signed(&operand.to_signed()?, *to),
            };
            Ok(Value::Bv { value, width: *to })
        }
        Expr::BvExtract { operand, hi, lo } => {
            let operand = eval(operand, env)?;
            let (value, _) = operand.as_bv()?;
            let width = hi - lo + 1;
            Ok(Value::Bv {
                value: (value >> *lo) % modulus(width),
                width,
            })
        }
    }
}

fn eval_binary(op: BinaryOp, lhs: &Expr, rhs: &Expr, env: &Env) -> Result<Value> {
    match op {
        BinaryOp::And => {
            Ok(Value::Bool(eval(lhs, env)?.as_bool()? && eval(rhs, env)?.as_bool()?))
        }
        BinaryOp::Or => {
            Ok(Value::Bool(eval(lhs, env)?.as_bool()? || eval(rhs, env)?.as_bool()?))
        }
        BinaryOp::Implies => {
            Ok(Value::Bool(!eval(lhs, env)?.as_bool()? || eval(rhs, env)?.as_bool()?))
        }
        BinaryOp::Eq => Ok(Value::Bool(eval(lhs, env)? == eval(rhs, env)?)),
        BinaryOp::Neq => Ok(Value::Bool(eval(lhs, env)? != eval(rhs, env)?)),
        BinaryOp::Add
        | BinaryOp::Sub
        | BinaryOp::Mul
        | BinaryOp::IntDiv
        | BinaryOp::Mod
        | BinaryOp::Lt
        | BinaryOp::Gt
        | BinaryOp::Lte
        | BinaryOp::Gte => {
            let lhs = eval(lhs, env)?;
            let rhs = eval(rhs, env)?;
            eval_int_binary(op, lhs.as_int()?, rhs.as_int()?)
        }
    }
}

fn eval_int_binary(op: BinaryOp, a: &BigInt, b: &BigInt) -> Result<Value> {
    let value = match op {
        BinaryOp::Add => Value::Int(a + b),
        BinaryOp::Sub => Value::Int(a - b),
        BinaryOp::Mul => Value::Int(a * b),
        BinaryOp::IntDiv | BinaryOp::Mod => {
            if b.is_zero() {
                return Err(IrError::EvalError("division by zero".to_string()));
            }
            let (quot, rem) = euclid_div_rem(a, b);
            Value::Int(if op == BinaryOp::IntDiv { quot } else { rem })
        }
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::Lte => Value::Bool(a <= b),
        BinaryOp::Gte => Value::Bool(a >= b),
        other => {
            return Err(IrError::EvalError(format!(
                "{} is not an integer operation",
                other.symbol()
            )))
        }
    };
    Ok(value)
}

fn is_negative(value: &BigUint, width: u32) -> bool {
    width > 0 && !((value >> (width - 1)) & BigUint::one()).is_zero()
}

fn bv_neg(value: &BigUint, width: u32) -> BigUint {
    let m = modulus(width);
    (&m - value) % &m
}

fn bv_udiv(a: &BigUint, b: &BigUint, width: u32) -> BigUint {
    if b.is_zero() {
        modulus(width) - BigUint::one()
    } else {
        a / b
    }
}

fn bv_urem(a: &BigUint, b: &BigUint) -> BigUint {
    if b.is_zero() {
        a.clone()
    } else {
        a % b
    }
}

fn shift_amount(b: &BigUint, width: u32) -> Option<usize> {
    b.to_u32().filter(|s| *s < width).map(|s| s as usize)
}

pub fn eval_bv_binary(op: BvBinaryOp, width: u32, lhs: &Value, rhs: &Value) -> Result<Value> {
    let (a, lhs_width) = lhs.as_bv()?;
    let (b, rhs_width) = rhs.as_bv()?;
    if lhs_width != width || rhs_width != width {
        return Err(IrError::EvalError(format!(
            "{} applied to bv{} and bv{}",
            op.function_name(width),
            lhs_width,
            rhs_width
        )));
    }

    let m = modulus(width);
    let bv = |value: BigUint| -> Result<Value> { Ok(Value::Bv { value, width }) };
    let (neg_a, neg_b) = (is_negative(a, width), is_negative(b, width));
    let abs = |v: &BigUint, neg: bool| if neg { bv_neg(v, width) } else { v.clone() };

    match op {
        BvBinaryOp::Add => bv((a + b) % &m),
        BvBinaryOp::Sub => bv((a + &m - b) % &m),
        BvBinaryOp::Mul => bv((a * b) % &m),
        BvBinaryOp::UDiv => bv(bv_udiv(a, b, width)),
        BvBinaryOp::URem => bv(bv_urem(a, b)),
        BvBinaryOp::SDiv => {
            let quot = bv_udiv(&abs(a, neg_a), &abs(b, neg_b), width);
            bv(if neg_a != neg_b { bv_neg(&quot, width) } else { quot })
        }
        BvBinaryOp::SRem => {
            let rem = bv_urem(&abs(a, neg_a), &abs(b, neg_b));
            bv(if neg_a { bv_neg(&rem, width) } else { rem })
        }
        BvBinaryOp::And => bv(a & b),
        BvBinaryOp::Or => bv(a | b),
        BvBinaryOp::Xor => bv(a ^ b),
        BvBinaryOp::Shl => bv(match shift_amount(b, width) {
            Some(s) => (a << s) % &m,
            None => BigUint::zero(),
        }),
        BvBinaryOp::LShr => bv(match shift_amount(b, width) {
            Some(s) => a >> s,
            None => BigUint::zero(),
        }),
        BvBinaryOp::AShr => {
            let signed = lhs.to_signed()?;
            let shifted = match shift_amount(b, width) {
                Some(s) => euclid_div_rem(&signed, &(BigInt::one() << s)).0,
                None if signed.sign() == Sign::Minus => -BigInt::one(),
                None => BigInt::zero(),
            };
            bv(from_signed(&shifted, width))
        }
        BvBinaryOp::Ult => Ok(Value::Bool(a < b)),
        BvBinaryOp::Ugt => Ok(Value::Bool(a > b)),
        BvBinaryOp::Ule => Ok(Value::Bool(a <= b)),
        BvBinaryOp::Uge => Ok(Value::Bool(a >= b)),
        BvBinaryOp::Slt => Ok(Value::Bool(lhs.to_signed()? < rhs.to_signed()?)),
        BvBinaryOp::Sgt => Ok(Value::Bool(lhs.to_signed()? > rhs.to_signed()?)),
        BvBinaryOp::Sle => Ok(Value::Bool(lhs.to_signed()? <= rhs.to_signed()?)),
        BvBinaryOp::Sge => Ok(Value::Bool(lhs.to_signed()? >= rhs.to_signed()?)),
    }
}

/// Final state of one execution path.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Normal(Env),
    AssertionFailed { env: Env, message: Option<String> },
}

impl Outcome {
    pub fn env(&self) -> &Env {
        match self {
            Outcome::Normal(env) => env,
            Outcome::AssertionFailed { env, .. } => env,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::AssertionFailed { .. })
    }
}

fn assign(lhs: &Expr, value: Value, env: &mut Env) -> Result<()> {
    match lhs {
        Expr::Id(name) => {
            env.bind(name.clone(), value);
            Ok(())
        }
        Expr::Select { base, index } => {
            let key = eval(index, env)?;
            let map = eval(base, env)?.as_map()?.clone();
            assign(base, Value::Map(map.with(key, value)), env)
        }
        _ => Err(IrError::EvalError(
            "left side of assignment is not an lvalue".to_string(),
        )),
    }
}

fn message_of(attrs: &[Attr]) -> Option<String> {
    find_attr(attrs, "message")
        .and_then(Attr::string_arg)
        .map(str::to_string)
}

pub fn exec_stmt(stmt: &Stmt, mut env: Env) -> Result<Vec<Outcome>> {
    match stmt {
        Stmt::Assign { lhs, rhs } => {
            let value = eval(rhs, &env)?;
            assign(lhs, value, &mut env)?;
            Ok(vec![Outcome::Normal(env)])
        }
        Stmt::Assume(expr) => {
            if eval(expr, &env)?.as_bool()? {
                Ok(vec![Outcome::Normal(env)])
            } else {
                Ok(Vec::new())
            }
        }
        Stmt::Assert { expr, attrs } => {
            if eval(expr, &env)?.as_bool()? {
                Ok(vec![Outcome::Normal(env)])
            } else {
                Ok(vec![Outcome::AssertionFailed {
                    env,
                    message: message_of(attrs),
                }])
            }
        }
        Stmt::Comment(_) => Ok(vec![Outcome::Normal(env)]),
        Stmt::IfElse {
            cond,
            then_block,
            else_block,
        } => {
            let empty = Block::new();
            let else_block = else_block.as_ref().unwrap_or(&empty);
            match cond {
                Some(cond) => {
                    if eval(cond, &env)?.as_bool()? {
                        exec_block(then_block, env)
                    } else {
                        exec_block(else_block, env)
                    }
                }
                None => {
                    let mut outcomes = exec_block(then_block, env.clone())?;
                    outcomes.extend(exec_block(else_block, env)?);
                    Ok(outcomes)
                }
            }
        }
        Stmt::Block(block) => exec_block(block, env),
    }
}

pub fn exec_block(block: &Block, env: Env) -> Result<Vec<Outcome>> {
    let mut outcomes = vec![Outcome::Normal(env)];
    for stmt in block.iter() {
        let mut next = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                Outcome::Normal(env) => next.extend(exec_stmt(stmt, env)?),
                failed => next.push(failed),
            }
        }
        outcomes = next;
    }
    Ok(outcomes)
}

/// Runs `proc_decl` on `args` starting from `globals`. Return variables start
/// at their type's default value.
pub fn exec_procedure(proc_decl: &ProcDecl, args: Vec<Value>, globals: &Env) -> Result<Vec<Outcome>> {
    if args.len() != proc_decl.params.len() {
        return Err(IrError::EvalError(format!(
            "procedure {} expects {} arguments, got {}",
            proc_decl.name,
            proc_decl.params.len(),
            args.len()
        )));
    }

    let mut env = globals.clone();
    for (param, arg) in proc_decl.params.iter().zip(args) {
        env.bind(param.name.clone(), arg);
    }
    for ret in &proc_decl.returns {
        env.bind(ret.name.clone(), Value::default_for(&ret.ty));
    }
    exec_block(&proc_decl.body, env)
}
