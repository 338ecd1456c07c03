use crate::ir_type::IrType;
use crate::stmt::Block;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrArg {
    Int(i64),
    Str(String),
}

/// Declaration attribute, rendered as `{:name arg, ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attr {
    pub name: String,
    pub args: Vec<AttrArg>,
}

impl Attr {
    pub fn new(name: impl Into<String>, args: Vec<AttrArg>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    pub fn int(name: impl Into<String>, value: i64) -> Self {
        Self::new(name, vec![AttrArg::Int(value)])
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, vec![AttrArg::Str(value.into())])
    }

    pub fn inline() -> Self {
        Self::int("inline", 1)
    }

    pub fn message(text: impl Into<String>) -> Self {
        Self::string("message", text)
    }

    pub fn string_arg(&self) -> Option<&str> {
        self.args.iter().find_map(|arg| match arg {
            AttrArg::Str(s) => Some(s.as_str()),
            AttrArg::Int(_) => None,
        })
    }
}

pub fn find_attr<'a>(attrs: &'a [Attr], name: &str) -> Option<&'a Attr> {
    attrs.iter().find(|a| a.name == name)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub name: String,
    pub ty: IrType,
}

impl Binding {
    pub fn new(name: impl Into<String>, ty: IrType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    pub attrs: Vec<Attr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: String,
    pub ty: IrType,
    pub attrs: Vec<Attr>,
}

/// Function signature without a body, e.g. a `bvbuiltin` binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncDecl {
    pub name: String,
    pub attrs: Vec<Attr>,
    pub params: Vec<IrType>,
    pub returns: IrType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcDecl {
    pub name: String,
    pub params: Vec<Binding>,
    pub returns: Vec<Binding>,
    pub modifies: Vec<String>,
    pub attrs: Vec<Attr>,
    pub body: Block,
}

impl ProcDecl {
    pub fn new(
        name: impl Into<String>,
        params: Vec<Binding>,
        returns: Vec<Binding>,
        body: Block,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            returns,
            modifies: Vec::new(),
            attrs: Vec::new(),
            body,
        }
    }

    pub fn add_attr(&mut self, attr: Attr) {
        self.attrs.push(attr);
    }

    pub fn add_attrs(&mut self, attrs: impl IntoIterator<Item = Attr>) {
        self.attrs.extend(attrs);
    }

    pub fn add_modifies(&mut self, global: impl Into<String>) {
        self.modifies.push(global.into());
    }

    pub fn attr(&self, name: &str) -> Option<&Attr> {
        find_attr(&self.attrs, name)
    }

    pub fn is_inline(&self) -> bool {
        self.attr("inline").is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.attr("message").and_then(Attr::string_arg)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decl {
    Type(TypeDecl),
    Var(VarDecl),
    Func(FuncDecl),
    Proc(ProcDecl),
}

impl Decl {
    pub fn type_decl(name: impl Into<String>) -> Self {
        Decl::Type(TypeDecl {
            name: name.into(),
            attrs: Vec::new(),
        })
    }

    pub fn var(name: impl Into<String>, ty: IrType) -> Self {
        Decl::Var(VarDecl {
            name: name.into(),
            ty,
            attrs: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Decl::Type(d) => &d.name,
            Decl::Var(d) => &d.name,
            Decl::Func(d) => &d.name,
            Decl::Proc(d) => &d.name,
        }
    }
}
