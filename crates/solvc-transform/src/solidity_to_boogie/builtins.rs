//! Procedures modelling the native value-transfer primitives.
//!
//! All three act on the global balance map. Failure of `send` and `call` is
//! modelled as a nondeterministic branch that leaves the state untouched;
//! the receiver's code is never executed.

use super::arithmetic::{encode_binary, BinaryOperator};
use super::context::EncodingContext;
use super::config::Encoding;
use super::conventions::{
    AMOUNT, BALANCE, CALL, CALLDATA, MSG_SENDER, MSG_VALUE, RESULT, SEND, THIS, TRANSFER,
};
use super::conversion::range_constraint;
use super::errors::Result;
use solvc_core::{Attr, Binding, Block, Expr, ExprRef, ProcDecl, Stmt, Type};
use tracing::debug;

fn caller_bindings(ctx: &EncodingContext) -> Vec<Binding> {
    vec![
        Binding::new(THIS, ctx.address_type()),
        Binding::new(MSG_SENDER, ctx.address_type()),
        Binding::new(MSG_VALUE, ctx.int_type(256)),
    ]
}

/// `balance[account] >= amount`, assumed rather than checked.
fn sufficient_balance(ctx: &mut EncodingContext, account: ExprRef, amount: ExprRef) -> Stmt {
    let account_balance = Expr::select(ctx.balance(), account);
    let geq = encode_binary(
        ctx,
        None,
        BinaryOperator::Gte,
        account_balance,
        amount,
        256,
        false,
    );
    Stmt::assume(geq.expr)
}

/// Appends `balance[account] := balance[account] op amount` to `block`.
///
/// Under the modular encoding both operands are first assumed to be in the
/// `uint256` range. With overflow checking on, the well-definedness
/// condition of the update becomes an assertion.
fn update_balance(
    ctx: &mut EncodingContext,
    block: &mut Block,
    account: ExprRef,
    amount: ExprRef,
    op: BinaryOperator,
) {
    let balance = ctx.balance();
    let account_balance = Expr::select(balance.clone(), account.clone());

    if ctx.encoding() == Encoding::Modular {
        let uint256 = Type::uint256();
        block.add_stmts([
            Stmt::assume(range_constraint(account_balance.clone(), &uint256)),
            Stmt::assume(range_constraint(amount.clone(), &uint256)),
        ]);
    }

    let updated = encode_binary(ctx, None, op, account_balance, amount, 256, false);
    if ctx.check_overflow() {
        if let Some(condition) = updated.condition {
            let message = match op {
                BinaryOperator::Sub => "Balance underflow",
                _ => "Balance overflow",
            };
            block.add_stmts([
                Stmt::comment("Balances must not overflow"),
                Stmt::assert(condition, vec![Attr::message(message)]),
            ]);
        }
    }

    block.add_stmt(Stmt::assign(
        balance.clone(),
        Expr::update(balance, account, updated.expr),
    ));
}

fn finish(ctx: &EncodingContext, mut proc_decl: ProcDecl, label: &str) -> ProcDecl {
    proc_decl.add_modifies(BALANCE);
    proc_decl.add_attrs([Attr::inline(), Attr::message(label)]);
    debug!(
        procedure = %proc_decl.name,
        encoding = %ctx.encoding(),
        statements = proc_decl.body.len(),
        "generated builtin procedure"
    );
    proc_decl
}

/// `__transfer(this, sender, value, amount)`: moves `amount` from the sender
/// to `this`. Insufficient funds are assumed away.
pub fn create_transfer_proc(ctx: &mut EncodingContext) -> ProcDecl {
    let amount = Expr::id(AMOUNT);
    let mut params = caller_bindings(ctx);
    params.push(Binding::new(AMOUNT, ctx.int_type(256)));

    let (this, sender) = (ctx.this(), ctx.msg_sender());
    let mut body = Block::new();
    body.add_stmt(sufficient_balance(ctx, sender.clone(), amount.clone()));
    update_balance(ctx, &mut body, this, amount.clone(), BinaryOperator::Add);
    update_balance(ctx, &mut body, sender, amount, BinaryOperator::Sub);
    body.add_stmt(Stmt::comment("Fallback function of the receiver is not modelled"));

    finish(ctx, ProcDecl::new(TRANSFER, params, Vec::new(), body), "transfer")
}

/// `__call(this, sender, value) returns (__result, __calldata)`: either
/// credits `value` to `this` and succeeds, or fails without effect.
pub fn create_call_proc(ctx: &mut EncodingContext) -> Result<ProcDecl> {
    let result = Expr::id(RESULT);
    let params = caller_bindings(ctx);
    let returns = vec![
        Binding::new(RESULT, ctx.bool_type()),
        Binding::new(CALLDATA, ctx.to_ir_type(&Type::Bytes)?),
    ];

    let mut success = Block::new();
    let (this, value) = (ctx.this(), ctx.msg_value());
    update_balance(ctx, &mut success, this, value, BinaryOperator::Add);
    success.add_stmt(Stmt::assign(result.clone(), Expr::bool_lit(true)));

    let failure: Block = vec![Stmt::assign(result, Expr::bool_lit(false))].into();

    let body: Block = vec![
        Stmt::comment("Code of the callee is not modelled"),
        Stmt::nondet(success, failure),
    ]
    .into();

    Ok(finish(ctx, ProcDecl::new(CALL, params, returns, body), "call"))
}

/// `__send(this, sender, value, amount) returns (__result)`: the effect of
/// `__transfer` on success, no effect on failure.
pub fn create_send_proc(ctx: &mut EncodingContext) -> ProcDecl {
    let amount = Expr::id(AMOUNT);
    let result = Expr::id(RESULT);
    let mut params = caller_bindings(ctx);
    params.push(Binding::new(AMOUNT, ctx.int_type(256)));
    let returns = vec![Binding::new(RESULT, ctx.bool_type())];

    let mut success = Block::new();
    let (this, sender) = (ctx.this(), ctx.msg_sender());
    update_balance(ctx, &mut success, this, amount.clone(), BinaryOperator::Add);
    update_balance(ctx, &mut success, sender.clone(), amount.clone(), BinaryOperator::Sub);
    success.add_stmt(Stmt::assign(result.clone(), Expr::bool_lit(true)));

    let failure: Block = vec![Stmt::assign(result, Expr::bool_lit(false))].into();

    let body: Block = vec![
        sufficient_balance(ctx, sender, amount),
        Stmt::comment("Fallback function of the receiver is not modelled"),
        Stmt::nondet(success, failure),
    ]
    .into();

    finish(ctx, ProcDecl::new(SEND, params, returns, body), "send")
}

/// The transfer, send and call procedures, in that order.
pub fn create_builtin_procs(ctx: &mut EncodingContext) -> Result<Vec<ProcDecl>> {
    Ok(vec![
        create_transfer_proc(ctx),
        create_send_proc(ctx),
        create_call_proc(ctx)?,
    ])
}
