use crate::decl::{Decl, ProcDecl};
use crate::{IrError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Output program: declarations in emission order, keyed by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Program {
    decls: IndexMap<String, Decl>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_decl(&mut self, decl: Decl) -> Result<()> {
        let name = decl.name().to_string();
        if self.decls.contains_key(&name) {
            return Err(IrError::DuplicateDeclaration(name));
        }
        self.decls.insert(name, decl);
        Ok(())
    }

    pub fn add_decls(&mut self, decls: impl IntoIterator<Item = Decl>) -> Result<()> {
        for decl in decls {
            self.add_decl(decl)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Decl> {
        self.decls.get(name)
    }

    pub fn get_procedure(&self, name: &str) -> Option<&ProcDecl> {
        match self.decls.get(name) {
            Some(Decl::Proc(proc_decl)) => Some(proc_decl),
            _ => None,
        }
    }

    pub fn decls(&self) -> impl Iterator<Item = &Decl> {
        self.decls.values()
    }

    pub fn procedures(&self) -> impl Iterator<Item = &ProcDecl> {
        self.decls.values().filter_map(|decl| match decl {
            Decl::Proc(proc_decl) => Some(proc_decl),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| IrError::Serialization(e.to_string()))
    }
}
