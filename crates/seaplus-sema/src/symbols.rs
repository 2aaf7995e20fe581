//! Scope-chained symbol table.

use seaplus_ast::ast::TypeName;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TypeTag {
    Int,
    Char,
    Str,
    /// A function and its parameter types.
    Func(Vec<TypeTag>),
}

impl From<TypeName> for TypeTag {
    fn from(ty: TypeName) -> Self {
        match ty {
            TypeName::Int => TypeTag::Int,
            TypeName::Char => TypeTag::Char,
            TypeName::Str => TypeTag::Str,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Int => f.write_str("int"),
            TypeTag::Char => f.write_str("char"),
            TypeTag::Str => f.write_str("string"),
            TypeTag::Func(params) => {
                f.write_str("func(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", p)?;
                }
                f.write_str(")")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Symbol {
    pub name: String,
    pub ty: TypeTag,
    pub scope_level: usize,
    pub declared_at_line: u32,
    pub initialized: bool,
}

/// Symbols of one scope in declaration order, indexed by name.
#[derive(Debug, Default)]
struct Scope {
    syms: Vec<Symbol>,
    by_name: HashMap<String, usize>,
}

impl Scope {
    fn get(&self, name: &str) -> Option<&Symbol> {
        self.by_name.get(name).map(|&i| &self.syms[i])
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.by_name.get(name).map(|&i| &mut self.syms[i])
    }
}

/// One scope per open block; index 0 is program scope.
///
/// At most one symbol exists per `(name, scope_level)`. Lookups walk the
/// stack from the innermost scope outwards, so a nested declaration shadows
/// an outer one until its scope is exited.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    pub fn current_scope(&self) -> usize {
        self.scopes.len() - 1
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Leave the innermost scope, dropping every symbol declared in it.
    /// Program scope is never popped.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Declare `name` in the current scope, uninitialized.
    /// Returns `false` if the current scope already has that name.
    pub fn declare(&mut self, name: &str, ty: TypeTag, line: u32) -> bool {
        let scope_level = self.current_scope();
        let Some(scope) = self.scopes.last_mut() else {
            return false;
        };
        if scope.by_name.contains_key(name) {
            return false;
        }
        scope.by_name.insert(name.to_string(), scope.syms.len());
        scope.syms.push(Symbol {
            name: name.to_string(),
            ty,
            scope_level,
            declared_at_line: line,
            initialized: false,
        });
        true
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn lookup_current(&self, name: &str) -> Option<&Symbol> {
        self.scopes.last().and_then(|scope| scope.get(name))
    }

    /// Mark the innermost visible `name` as assigned.
    pub fn mark_initialized(&mut self, name: &str) {
        if let Some(sym) = self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
        {
            sym.initialized = true;
        }
    }

    /// Every live symbol, most recently declared first.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.scopes.iter().rev().flat_map(|scope| scope.syms.iter().rev())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_scope_redeclaration_is_refused() {
        let mut t = SymbolTable::new();
        assert!(t.declare("x", TypeTag::Int, 1));
        assert!(!t.declare("x", TypeTag::Char, 2));
        assert_eq!(t.lookup("x").map(|s| s.declared_at_line), Some(1));
    }

    #[test]
    fn nested_scope_shadows_then_purges() {
        let mut t = SymbolTable::new();
        t.declare("x", TypeTag::Int, 1);
        t.enter_scope();
        assert!(t.declare("x", TypeTag::Str, 2));
        assert_eq!(t.lookup("x").map(|s| s.scope_level), Some(1));
        assert_eq!(t.lookup("x").map(|s| &s.ty), Some(&TypeTag::Str));
        t.exit_scope();
        assert_eq!(t.current_scope(), 0);
        assert_eq!(t.lookup("x").map(|s| &s.ty), Some(&TypeTag::Int));
    }

    #[test]
    fn inner_symbols_vanish_on_exit() {
        let mut t = SymbolTable::new();
        t.enter_scope();
        t.declare("y", TypeTag::Int, 3);
        t.exit_scope();
        assert!(t.lookup("y").is_none());
        assert_eq!(t.symbols().count(), 0);
    }

    #[test]
    fn initialization_targets_the_innermost_binding() {
        let mut t = SymbolTable::new();
        t.declare("x", TypeTag::Int, 1);
        t.enter_scope();
        t.declare("x", TypeTag::Int, 2);
        t.mark_initialized("x");
        assert!(t.lookup("x").is_some_and(|s| s.initialized));
        t.exit_scope();
        assert!(t.lookup("x").is_some_and(|s| !s.initialized));
    }

    #[test]
    fn symbols_come_out_most_recent_first() {
        let mut t = SymbolTable::new();
        for (i, name) in ["a", "b", "c", "d", "e", "f"].iter().enumerate() {
            t.declare(name, TypeTag::Int, i as u32 + 1);
        }
        t.enter_scope();
        t.declare("inner", TypeTag::Char, 7);
        t.declare("a", TypeTag::Str, 8);

        let names: Vec<&str> = t.symbols().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "inner", "f", "e", "d", "c", "b", "a"]);
    }

    #[test]
    fn program_scope_is_never_popped() {
        let mut t = SymbolTable::new();
        t.declare("g", TypeTag::Int, 1);
        t.exit_scope();
        assert!(t.lookup("g").is_some());
    }
}
