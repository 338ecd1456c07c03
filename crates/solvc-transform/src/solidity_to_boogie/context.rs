use super::config::{Encoding, EncodingConfig};
use super::conventions::{self, ADDRESS_TYPE, BALANCE, MSG_SENDER, MSG_VALUE, THIS};
use super::errors::{Result, TransformError};
use indexmap::IndexMap;
use num_bigint::{BigInt, BigUint};
use num_traits::One;
use serde::{Deserialize, Serialize};
use solvc_core::{
    Attr, BvBinaryOp, BvUnaryOp, Decl, Expr, ExprRef, Extension, FuncDecl, IrType, Type,
};
use std::fmt;
use tracing::{trace, warn};

/// Identifier of the source AST node a diagnostic is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub node: Option<NodeId>,
    pub error: TransformError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node {
            Some(node) => write!(f, "{}: {}", node, self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

/// Per-run state shared by every encoding operation: the configuration, the
/// diagnostics channel, and the bitvector builtins referenced so far.
pub struct EncodingContext {
    config: EncodingConfig,
    diagnostics: Vec<Diagnostic>,
    bv_builtins: IndexMap<String, FuncDecl>,
    balance: ExprRef,
    this: ExprRef,
    msg_sender: ExprRef,
    msg_value: ExprRef,
}

impl EncodingContext {
    pub fn new(config: EncodingConfig) -> Self {
        Self {
            config,
            diagnostics: Vec::new(),
            bv_builtins: IndexMap::new(),
            balance: Expr::id(BALANCE),
            this: Expr::id(THIS),
            msg_sender: Expr::id(MSG_SENDER),
            msg_value: Expr::id(MSG_VALUE),
        }
    }

    pub fn config(&self) -> &EncodingConfig {
        &self.config
    }

    pub fn encoding(&self) -> Encoding {
        self.config.encoding
    }

    pub fn check_overflow(&self) -> bool {
        self.config.check_overflow
    }

    /// Records a non-fatal diagnostic. Translation continues afterwards.
    pub fn report_error(&mut self, node: Option<NodeId>, error: TransformError) {
        warn!(node = ?node, encoding = %self.config.encoding, "{}", error);
        self.diagnostics.push(Diagnostic { node, error });
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn balance(&self) -> ExprRef {
        self.balance.clone()
    }

    pub fn this(&self) -> ExprRef {
        self.this.clone()
    }

    pub fn msg_sender(&self) -> ExprRef {
        self.msg_sender.clone()
    }

    pub fn msg_value(&self) -> ExprRef {
        self.msg_value.clone()
    }

    pub fn bool_type(&self) -> IrType {
        IrType::Bool
    }

    /// Integer type of the given width: `bv<bits>` under the bitvector
    /// encoding, `int` otherwise.
    pub fn int_type(&self, bits: u32) -> IrType {
        match self.config.encoding {
            Encoding::Bitvector => IrType::Bv(bits),
            Encoding::Mathematical | Encoding::Modular => IrType::Int,
        }
    }

    pub fn address_type(&self) -> IrType {
        IrType::named(ADDRESS_TYPE)
    }

    pub fn balance_type(&self) -> IrType {
        conventions::mapping_type(self.address_type(), self.int_type(256))
    }

    pub fn to_ir_type(&self, ty: &Type) -> Result<IrType> {
        match ty {
            Type::Bool => Ok(IrType::Bool),
            Type::Uint(bits) | Type::Int(bits) => Ok(self.int_type(u32::from(*bits))),
            Type::FixedBytes(bytes) => Ok(self.int_type(u32::from(*bytes) * 8)),
            Type::Enum(_) | Type::Bytes | Type::String => Ok(self.int_type(256)),
            Type::Address | Type::Contract(_) => Ok(self.address_type()),
            Type::Array(elem, _) => Ok(conventions::mapping_type(
                self.int_type(256),
                self.to_ir_type(elem)?,
            )),
            Type::Mapping(key, value) => Ok(conventions::mapping_type(
                self.to_ir_type(key)?,
                self.to_ir_type(value)?,
            )),
            Type::Tuple(components) => components
                .iter()
                .map(|c| match c {
                    Some(c) => self.to_ir_type(c),
                    None => Err(TransformError::UnsupportedFeature(
                        "tuple type with a missing component".to_string(),
                    )),
                })
                .collect::<Result<Vec<_>>>()
                .map(IrType::Tuple),
        }
    }

    /// Integer literal in the active encoding. Under the bitvector encoding
    /// negative values are stored in two's complement.
    pub fn int_lit(&self, value: &BigInt, bits: u32) -> ExprRef {
        match self.config.encoding {
            Encoding::Bitvector => {
                let modulus = BigInt::from(BigUint::one() << bits);
                let wrapped = ((value % &modulus) + &modulus) % &modulus;
                Expr::bv(wrapped.into_parts().1, bits)
            }
            Encoding::Mathematical | Encoding::Modular => Expr::int(value.clone()),
        }
    }

    fn register_builtin(&mut self, name: String, smt_name: String, params: Vec<IrType>, returns: IrType) {
        if self.bv_builtins.contains_key(&name) {
            return;
        }
        trace!(builtin = %name, smt = %smt_name, "registering bitvector builtin");
        let decl = FuncDecl {
            name: name.clone(),
            attrs: vec![Attr::string("bvbuiltin", smt_name)],
            params,
            returns,
        };
        self.bv_builtins.insert(name, decl);
    }

    pub fn bv_binary(&mut self, op: BvBinaryOp, width: u32, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        let returns = if op.is_predicate() {
            IrType::Bool
        } else {
            IrType::Bv(width)
        };
        self.register_builtin(
            op.function_name(width),
            op.smt_name().to_string(),
            vec![IrType::Bv(width), IrType::Bv(width)],
            returns,
        );
        Expr::bv_binary(op, width, lhs, rhs)
    }

    pub fn bv_unary(&mut self, op: BvUnaryOp, width: u32, operand: ExprRef) -> ExprRef {
        self.register_builtin(
            op.function_name(width),
            op.smt_name().to_string(),
            vec![IrType::Bv(width)],
            IrType::Bv(width),
        );
        Expr::bv_unary(op, width, operand)
    }

    fn bv_extend(&mut self, kind: Extension, expr: ExprRef, from: u32, to: u32) -> ExprRef {
        self.register_builtin(
            kind.function_name(from, to),
            kind.smt_name(from, to),
            vec![IrType::Bv(from)],
            IrType::Bv(to),
        );
        Expr::bv_extend(kind, from, to, expr)
    }

    pub fn bv_zero_ext(&mut self, expr: ExprRef, from: u32, to: u32) -> ExprRef {
        self.bv_extend(Extension::Zero, expr, from, to)
    }

    pub fn bv_sign_ext(&mut self, expr: ExprRef, from: u32, to: u32) -> ExprRef {
        self.bv_extend(Extension::Sign, expr, from, to)
    }

    /// Bits `hi..=lo` of `expr`. Extraction is native syntax, nothing to register.
    pub fn bv_extract(&self, expr: ExprRef, hi: u32, lo: u32) -> ExprRef {
        Expr::bv_extract(expr, hi, lo)
    }

    pub fn bv_builtins(&self) -> impl Iterator<Item = &FuncDecl> {
        self.bv_builtins.values()
    }

    /// Address type and the balance map every builtin procedure reads.
    pub fn prelude_decls(&self) -> Vec<Decl> {
        vec![
            Decl::type_decl(ADDRESS_TYPE),
            Decl::var(BALANCE, self.balance_type()),
        ]
    }

    pub fn builtin_decls(&self) -> Vec<Decl> {
        self.bv_builtins().cloned().map(Decl::Func).collect()
    }
}
