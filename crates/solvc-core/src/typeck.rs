//! Type inference over the IR, enforcing that generated code is well-typed
//! in the target language (width and map key/value agreement).

use crate::decl::{Decl, ProcDecl};
use crate::expr::{BinaryOp, Expr, UnaryOp};
use crate::ir_type::IrType;
use crate::program::Program;
use crate::stmt::{Block, Stmt};
use crate::{IrError, Result};
use indexmap::IndexMap;

#[derive(Debug, Clone, Default)]
pub struct TypeEnv {
    vars: IndexMap<String, IrType>,
}

impl TypeEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: impl Into<String>, ty: IrType) {
        self.vars.insert(name.into(), ty);
    }

    pub fn with(mut self, name: impl Into<String>, ty: IrType) -> Self {
        self.bind(name, ty);
        self
    }

    pub fn lookup(&self, name: &str) -> Option<&IrType> {
        self.vars.get(name)
    }

    /// Global variables declared by `program`.
    pub fn globals(program: &Program) -> Self {
        let mut env = Self::new();
        for decl in program.decls() {
            if let Decl::Var(var) = decl {
                env.bind(var.name.clone(), var.ty.clone());
            }
        }
        env
    }
}

fn mismatch(what: &str, expected: &IrType, found: &IrType) -> IrError {
    IrError::TypeError(format!(
        "{}: expected {}, found {}",
        what, expected, found
    ))
}

fn expect(what: &str, expected: &IrType, found: IrType) -> Result<()> {
    if &found == expected {
        Ok(())
    } else {
        Err(mismatch(what, expected, &found))
    }
}

fn expect_bv(what: &str, width: u32, found: IrType) -> Result<()> {
    expect(what, &IrType::Bv(width), found)
}

pub fn infer(expr: &Expr, env: &TypeEnv) -> Result<IrType> {
    match expr {
        Expr::BoolLit(_) => Ok(IrType::Bool),
        Expr::IntLit(_) => Ok(IrType::Int),
        Expr::BvLit { width, .. } => Ok(IrType::Bv(*width)),
        Expr::Id(name) => env
            .lookup(name)
            .cloned()
            .ok_or_else(|| IrError::UnboundIdentifier(name.clone())),
        Expr::Error => Err(IrError::TypeError(
            "untranslated construct has no type".to_string(),
        )),
        Expr::Unary { op, operand } => {
            let ty = infer(operand, env)?;
            match op {
                UnaryOp::Not => expect("operand of !", &IrType::Bool, ty).map(|_| IrType::Bool),
                UnaryOp::Neg => expect("operand of -", &IrType::Int, ty).map(|_| IrType::Int),
            }
        }
        Expr::Binary { op, lhs, rhs } => {
            let lhs_ty = infer(lhs, env)?;
            let rhs_ty = infer(rhs, env)?;
            if op.is_arithmetic() {
                expect(op.symbol(), &IrType::Int, lhs_ty)?;
                expect(op.symbol(), &IrType::Int, rhs_ty)?;
                Ok(IrType::Int)
            } else if op.is_ordering() {
                expect(op.symbol(), &IrType::Int, lhs_ty)?;
                expect(op.symbol(), &IrType::Int, rhs_ty)?;
                Ok(IrType::Bool)
            } else if op.is_logical() {
                expect(op.symbol(), &IrType::Bool, lhs_ty)?;
                expect(op.symbol(), &IrType::Bool, rhs_ty)?;
                Ok(IrType::Bool)
            } else {
                debug_assert!(matches!(op, BinaryOp::Eq | BinaryOp::Neq));
                expect(op.symbol(), &lhs_ty, rhs_ty)?;
                Ok(IrType::Bool)
            }
        }
        Expr::Cond {
            cond,
            then_expr,
            else_expr,
        } => {
            expect("condition", &IrType::Bool, infer(cond, env)?)?;
            let then_ty = infer(then_expr, env)?;
            expect("else branch", &then_ty, infer(else_expr, env)?)?;
            Ok(then_ty)
        }
        Expr::Select { base, index } => match infer(base, env)? {
            IrType::Map(key, value) => {
                expect("map index", &key, infer(index, env)?)?;
                Ok(*value)
            }
            other => Err(IrError::TypeError(format!(
                "select on non-map type {}",
                other
            ))),
        },
        Expr::Update { base, index, value } => match infer(base, env)? {
            IrType::Map(key, elem) => {
                expect("map index", &key, infer(index, env)?)?;
                expect("map value", &elem, infer(value, env)?)?;
                Ok(IrType::Map(key, elem))
            }
            other => Err(IrError::TypeError(format!(
                "update on non-map type {}",
                other
            ))),
        },
        Expr::Tuple(elements) => elements
            .iter()
            .map(|e| infer(e, env))
            .collect::<Result<Vec<_>>>()
            .map(IrType::Tuple),
        Expr::BvUnary { op, width, operand } => {
            expect_bv(op.smt_name(), *width, infer(operand, env)?)?;
            Ok(IrType::Bv(*width))
        }
        Expr::BvBinary {
            op,
            width,
            lhs,
            rhs,
        } => {
            expect_bv(op.smt_name(), *width, infer(lhs, env)?)?;
            expect_bv(op.smt_name(), *width, infer(rhs, env)?)?;
            if op.is_predicate() {
                Ok(IrType::Bool)
            } else {
                Ok(IrType::Bv(*width))
            }
        }
        Expr::BvExtend {
            from, to, operand, ..
        } => {
            if to < from {
                return Err(IrError::TypeError(format!(
                    "cannot extend bv{} to narrower bv{}",
                    from, to
                )));
            }
            expect_bv("extension", *from, infer(operand, env)?)?;
            Ok(IrType::Bv(*to))
        }
        Expr::BvExtract { operand, hi, lo } => match infer(operand, env)? {
            IrType::Bv(width) if lo <= hi && *hi < width => Ok(IrType::Bv(hi - lo + 1)),
            other => Err(IrError::TypeError(format!(
                "invalid extract [{}:{}] from {}",
                hi, lo, other
            ))),
        },
    }
}

fn check_assignable(lhs: &Expr) -> Result<()> {
    match lhs {
        Expr::Id(_) => Ok(()),
        Expr::Select { base, .. } => check_assignable(base),
        _ => Err(IrError::TypeError(
            "left side of assignment is not an lvalue".to_string(),
        )),
    }
}

pub fn check_block(block: &Block, env: &TypeEnv) -> Result<()> {
    for stmt in block.iter() {
        check_stmt(stmt, env)?;
    }
    Ok(())
}

pub fn check_stmt(stmt: &Stmt, env: &TypeEnv) -> Result<()> {
    match stmt {
        Stmt::Assign { lhs, rhs } => {
            check_assignable(lhs)?;
            let lhs_ty = infer(lhs, env)?;
            expect("assignment", &lhs_ty, infer(rhs, env)?)
        }
        Stmt::Assume(expr) => expect("assume", &IrType::Bool, infer(expr, env)?),
        Stmt::Assert { expr, .. } => expect("assert", &IrType::Bool, infer(expr, env)?),
        Stmt::Comment(_) => Ok(()),
        Stmt::IfElse {
            cond,
            then_block,
            else_block,
        } => {
            if let Some(cond) = cond {
                expect("if condition", &IrType::Bool, infer(cond, env)?)?;
            }
            check_block(then_block, env)?;
            match else_block {
                Some(block) => check_block(block, env),
                None => Ok(()),
            }
        }
        Stmt::Block(block) => check_block(block, env),
    }
}

pub fn check_procedure(proc_decl: &ProcDecl, globals: &TypeEnv) -> Result<()> {
    for global in &proc_decl.modifies {
        if globals.lookup(global).is_none() {
            return Err(IrError::UnboundIdentifier(global.clone()));
        }
    }

    let mut env = globals.clone();
    for binding in proc_decl.params.iter().chain(&proc_decl.returns) {
        env.bind(binding.name.clone(), binding.ty.clone());
    }
    check_block(&proc_decl.body, &env)
        .map_err(|e| IrError::TypeError(format!("in procedure {}: {}", proc_decl.name, e)))
}

pub fn check_program(program: &Program) -> Result<()> {
    let globals = TypeEnv::globals(program);
    for proc_decl in program.procedures() {
        check_procedure(proc_decl, &globals)?;
    }
    Ok(())
}
