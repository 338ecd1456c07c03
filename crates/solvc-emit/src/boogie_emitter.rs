use crate::config::EmitterConfig;
use crate::emitter::{EmitContext, EmitHelper, EmitResult, Emitter};
use num_bigint::Sign;
use solvc_core::{
    Attr, AttrArg, BinaryOp, Binding, Block, Decl, Expr, FuncDecl, ProcDecl, Program, Stmt,
    UnaryOp, ERROR_EXPR,
};
use std::io::Write;

/// Binding strength, loosest first. An operand is parenthesized when it binds
/// looser than its position requires.
mod prec {
    pub const COND: u8 = 0;
    pub const IMPLIES: u8 = 1;
    pub const LOGICAL: u8 = 2;
    pub const RELATION: u8 = 4;
    pub const ADDITIVE: u8 = 6;
    pub const MULTIPLICATIVE: u8 = 7;
    pub const UNARY: u8 = 8;
    pub const POSTFIX: u8 = 9;
    pub const ATOM: u8 = 10;
}

fn binary_prec(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Implies => prec::IMPLIES,
        BinaryOp::And | BinaryOp::Or => prec::LOGICAL,
        BinaryOp::Eq
        | BinaryOp::Neq
        | BinaryOp::Lt
        | BinaryOp::Gt
        | BinaryOp::Lte
        | BinaryOp::Gte => prec::RELATION,
        BinaryOp::Add | BinaryOp::Sub => prec::ADDITIVE,
        BinaryOp::Mul | BinaryOp::IntDiv | BinaryOp::Mod => prec::MULTIPLICATIVE,
    }
}

fn expr_prec(expr: &Expr) -> u8 {
    match expr {
        Expr::Cond { .. } => prec::COND,
        Expr::Binary { op, .. } => binary_prec(*op),
        Expr::Unary { .. } => prec::UNARY,
        Expr::IntLit(value) if value.sign() == Sign::Minus => prec::UNARY,
        Expr::Select { .. } | Expr::Update { .. } | Expr::BvExtract { .. } => prec::POSTFIX,
        _ => prec::ATOM,
    }
}

fn write_expr(out: &mut String, expr: &Expr, min_prec: u8) {
    let parens = expr_prec(expr) < min_prec;
    if parens {
        out.push('(');
    }
    write_expr_inner(out, expr);
    if parens {
        out.push(')');
    }
}

fn write_args(out: &mut String, name: &str, args: &[&Expr]) {
    out.push_str(name);
    out.push('(');
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_expr(out, arg, prec::COND);
    }
    out.push(')');
}

fn write_expr_inner(out: &mut String, expr: &Expr) {
    match expr {
        Expr::BoolLit(value) => out.push_str(if *value { "true" } else { "false" }),
        Expr::IntLit(value) => out.push_str(&value.to_string()),
        Expr::BvLit { value, width } => out.push_str(&format!("{}bv{}", value, width)),
        Expr::Id(name) => out.push_str(name),
        Expr::Error => out.push_str(ERROR_EXPR),
        Expr::Unary { op, operand } => {
            out.push_str(match op {
                UnaryOp::Not => "!",
                UnaryOp::Neg => "-",
            });
            // `--x` would lex as a single token.
            let min = if matches!(op, UnaryOp::Neg) && expr_prec(operand) == prec::UNARY {
                prec::ATOM
            } else {
                prec::UNARY
            };
            write_expr(out, operand, min);
        }
        Expr::Binary { op, lhs, rhs } => {
            let p = binary_prec(*op);
            let (lhs_min, rhs_min) = match op {
                BinaryOp::Implies => (p + 1, p),
                // Boogie rejects `&&` and `||` side by side without parentheses.
                BinaryOp::And | BinaryOp::Or => {
                    let lhs_same = matches!(lhs.as_ref(), Expr::Binary { op: l, .. } if l == op);
                    (if lhs_same { p } else { p + 1 }, p + 1)
                }
                _ if p == prec::RELATION => (p + 1, p + 1),
                _ => (p, p + 1),
            };
            write_expr(out, lhs, lhs_min);
            out.push(' ');
            out.push_str(op.symbol());
            out.push(' ');
            write_expr(out, rhs, rhs_min);
        }
        Expr::Cond {
            cond,
            then_expr,
            else_expr,
        } => {
            out.push_str("if ");
            write_expr(out, cond, prec::COND);
            out.push_str(" then ");
            write_expr(out, then_expr, prec::COND);
            out.push_str(" else ");
            write_expr(out, else_expr, prec::COND);
        }
        Expr::Select { base, index } => {
            write_expr(out, base, prec::POSTFIX);
            out.push('[');
            write_expr(out, index, prec::COND);
            out.push(']');
        }
        Expr::Update { base, index, value } => {
            write_expr(out, base, prec::POSTFIX);
            out.push('[');
            write_expr(out, index, prec::COND);
            out.push_str(" := ");
            write_expr(out, value, prec::COND);
            out.push(']');
        }
        Expr::Tuple(elements) => {
            let elements: Vec<&Expr> = elements.iter().map(|e| e.as_ref()).collect();
            write_args(out, "", &elements);
        }
        Expr::BvUnary { op, width, operand } => {
            write_args(out, &op.function_name(*width), &[operand.as_ref()]);
        }
        Expr::BvBinary { op, width, lhs, rhs } => {
            write_args(out, &op.function_name(*width), &[lhs.as_ref(), rhs.as_ref()]);
        }
        Expr::BvExtend {
            kind,
            from,
            to,
            operand,
        } => {
            write_args(out, &kind.function_name(*from, *to), &[operand.as_ref()]);
        }
        Expr::BvExtract { operand, hi, lo } => {
            write_expr(out, operand, prec::POSTFIX);
            out.push_str(&format!("[{}:{}]", hi + 1, lo));
        }
    }
}

/// Boogie source for `expr`, parenthesized only where precedence requires.
pub fn format_expr(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr, prec::COND);
    out
}

fn format_attr(attr: &Attr) -> String {
    let args = attr
        .args
        .iter()
        .map(|arg| match arg {
            AttrArg::Int(value) => value.to_string(),
            AttrArg::Str(text) => format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\"")),
        })
        .collect::<Vec<_>>()
        .join(", ");
    if args.is_empty() {
        format!("{{:{}}}", attr.name)
    } else {
        format!("{{:{} {}}}", attr.name, args)
    }
}

/// Attributes as a space-separated prefix, including the trailing space.
pub fn format_attrs(attrs: &[Attr]) -> String {
    attrs
        .iter()
        .map(|attr| format!("{} ", format_attr(attr)))
        .collect()
}

fn format_bindings(bindings: &[Binding]) -> String {
    bindings
        .iter()
        .map(|b| format!("{}: {}", b.name, b.ty))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Prints programs as Boogie text.
pub struct BoogieEmitter {
    config: EmitterConfig,
}

impl BoogieEmitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    fn visible_attrs(&self, attrs: &[Attr]) -> Vec<Attr> {
        attrs
            .iter()
            .filter(|a| {
                self.config.include_source_attrs || !matches!(a.name.as_str(), "sourceloc" | "message")
            })
            .cloned()
            .collect()
    }

    pub fn emit_decl<W: Write>(
        &self,
        decl: &Decl,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        match decl {
            Decl::Type(ty) => EmitHelper::write_line(
                writer,
                context,
                &format!("type {}{};", format_attrs(&ty.attrs), ty.name),
            ),
            Decl::Var(var) => EmitHelper::write_line(
                writer,
                context,
                &format!("var {}{}: {};", format_attrs(&var.attrs), var.name, var.ty),
            ),
            Decl::Func(func) => self.emit_function(func, writer, context),
            Decl::Proc(proc_decl) => self.emit_procedure(proc_decl, writer, context),
        }
    }

    fn emit_function<W: Write>(
        &self,
        func: &FuncDecl,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        let params = func
            .params
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        EmitHelper::write_line(
            writer,
            context,
            &format!(
                "function {}{}({}) returns ({});",
                format_attrs(&func.attrs),
                func.name,
                params,
                func.returns
            ),
        )
    }

    pub fn emit_procedure<W: Write>(
        &self,
        proc_decl: &ProcDecl,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        let mut header = format!(
            "procedure {}{}({})",
            format_attrs(&self.visible_attrs(&proc_decl.attrs)),
            proc_decl.name,
            format_bindings(&proc_decl.params)
        );
        if !proc_decl.returns.is_empty() {
            header.push_str(&format!(
                " returns ({})",
                format_bindings(&proc_decl.returns)
            ));
        }
        EmitHelper::write_line(writer, context, &header)?;
        if !proc_decl.modifies.is_empty() {
            let clause = format!("modifies {};", proc_decl.modifies.join(", "));
            EmitHelper::write_line(writer, &context.nested(), &clause)?;
        }
        EmitHelper::write_block(writer, context, "", |w, c| {
            self.emit_stmts(&proc_decl.body, w, c)
        })
    }

    fn emit_stmts<W: Write>(
        &self,
        block: &Block,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        for stmt in block.iter() {
            self.emit_stmt(stmt, writer, context)?;
        }
        Ok(())
    }

    pub fn emit_stmt<W: Write>(
        &self,
        stmt: &Stmt,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        match stmt {
            Stmt::Assign { lhs, rhs } => EmitHelper::write_line(
                writer,
                context,
                &format!("{} := {};", format_expr(lhs), format_expr(rhs)),
            ),
            Stmt::Assume(expr) => {
                EmitHelper::write_line(writer, context, &format!("assume {};", format_expr(expr)))
            }
            Stmt::Assert { expr, attrs } => EmitHelper::write_line(
                writer,
                context,
                &format!(
                    "assert {}{};",
                    format_attrs(&self.visible_attrs(attrs)),
                    format_expr(expr)
                ),
            ),
            Stmt::Comment(text) if self.config.include_comments => {
                EmitHelper::write_comment(writer, context, text)
            }
            Stmt::Comment(_) => Ok(()),
            Stmt::IfElse {
                cond,
                then_block,
                else_block,
            } => {
                let guard = match cond {
                    Some(cond) => format_expr(cond),
                    None => "*".to_string(),
                };
                let header = format!("if ({}) {{", guard);
                EmitHelper::write_line(writer, context, &header)?;
                context.indent();
                self.emit_stmts(then_block, writer, context)?;
                context.dedent();
                if let Some(else_block) = else_block {
                    EmitHelper::write_line(writer, context, "} else {")?;
                    context.indent();
                    self.emit_stmts(else_block, writer, context)?;
                    context.dedent();
                }
                EmitHelper::write_line(writer, context, "}")
            }
            Stmt::Block(block) => {
                EmitHelper::write_block(writer, context, "", |w, c| self.emit_stmts(block, w, c))
            }
        }
    }
}

impl Default for BoogieEmitter {
    fn default() -> Self {
        Self::new(EmitterConfig::default())
    }
}

impl Emitter for BoogieEmitter {
    type Item = Program;

    fn emit<W: Write>(
        &self,
        program: &Program,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        let mut previous_was_proc = false;
        for (i, decl) in program.decls().enumerate() {
            let is_proc = matches!(decl, Decl::Proc(_));
            if i > 0 && (is_proc || previous_was_proc) {
                writeln!(writer)?;
            }
            self.emit_decl(decl, writer, context)?;
            previous_was_proc = is_proc;
        }
        Ok(())
    }

    fn context(&self) -> EmitContext {
        EmitContext::from_config(&self.config)
    }
}
