use crate::decl::Attr;
use crate::expr::ExprRef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Assign {
        lhs: ExprRef,
        rhs: ExprRef,
    },
    Assume(ExprRef),
    Assert {
        expr: ExprRef,
        attrs: Vec<Attr>,
    },
    Comment(String),
    /// A missing condition is the nondeterministic choice `if (*)`.
    IfElse {
        cond: Option<ExprRef>,
        then_block: Block,
        else_block: Option<Block>,
    },
    Block(Block),
}

impl Stmt {
    pub fn assign(lhs: ExprRef, rhs: ExprRef) -> Self {
        Stmt::Assign { lhs, rhs }
    }

    pub fn assume(expr: ExprRef) -> Self {
        Stmt::Assume(expr)
    }

    pub fn assert(expr: ExprRef, attrs: Vec<Attr>) -> Self {
        Stmt::Assert { expr, attrs }
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Stmt::Comment(text.into())
    }

    pub fn if_else(cond: ExprRef, then_block: Block, else_block: Option<Block>) -> Self {
        Stmt::IfElse {
            cond: Some(cond),
            then_block,
            else_block,
        }
    }

    pub fn nondet(then_block: Block, else_block: Block) -> Self {
        Stmt::IfElse {
            cond: None,
            then_block,
            else_block: Some(else_block),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stmt(&mut self, stmt: Stmt) {
        self.stmts.push(stmt);
    }

    pub fn add_stmts(&mut self, stmts: impl IntoIterator<Item = Stmt>) {
        self.stmts.extend(stmts);
    }

    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stmt> {
        self.stmts.iter()
    }
}

impl From<Vec<Stmt>> for Block {
    fn from(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }
}
