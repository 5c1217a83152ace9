//! Scope table and analysis results

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

use crate::dialect::SideEffects;
use crate::frontend::ast::BlockId;
use crate::names::{Name, NameRepository};

/// Index of a scope in [`AnalysisInfo`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub usize);

/// Identity of a variable: the scope it lives in and its name
pub type VariableId = (ScopeId, Name);

/// Identity of a user-defined function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId {
    /// Scope the function is registered in
    pub scope: ScopeId,
    pub name: Name,
}

/// A symbol in a scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Variable { ty: Name },
    Function { parameters: Vec<Name>, returns: Vec<Name> },
}

impl Symbol {
    pub fn is_variable(&self) -> bool {
        matches!(self, Symbol::Variable { .. })
    }
}

/// Symbols declared directly in one block, or the parameters of one function
#[derive(Debug, Clone)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    /// Virtual scope holding function parameters; variables beyond it are invisible
    pub function_scope: bool,
    symbols: BTreeMap<Name, Symbol>,
}

impl Scope {
    pub fn new(parent: Option<ScopeId>, function_scope: bool) -> Self {
        Self {
            parent,
            function_scope,
            symbols: BTreeMap::new(),
        }
    }

    /// Register a variable, returns false if the name is already taken here
    pub fn insert_variable(&mut self, name: Name, ty: Name) -> bool {
        self.insert(name, Symbol::Variable { ty })
    }

    /// Register a function, returns false if the name is already taken here
    pub fn insert_function(&mut self, name: Name, parameters: Vec<Name>, returns: Vec<Name>) -> bool {
        self.insert(name, Symbol::Function { parameters, returns })
    }

    fn insert(&mut self, name: Name, symbol: Symbol) -> bool {
        if self.symbols.contains_key(&name) {
            return false;
        }
        self.symbols.insert(name, symbol);
        true
    }

    pub fn get(&self, name: Name) -> Option<&Symbol> {
        self.symbols.get(&name)
    }

    pub fn contains(&self, name: Name) -> bool {
        self.symbols.contains_key(&name)
    }

    pub fn symbols(&self) -> impl Iterator<Item = (Name, &Symbol)> {
        self.symbols.iter().map(|(name, symbol)| (*name, symbol))
    }

    /// Names of the variables declared directly in this scope
    pub fn variables(&self) -> impl Iterator<Item = Name> + '_ {
        self.symbols()
            .filter(|(_, symbol)| symbol.is_variable())
            .map(|(name, _)| name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Result of analyzing one block
///
/// Owns every scope created during analysis. Scopes stay here after their
/// block has been left, so later stages can look names up by block.
#[derive(Debug, Default)]
pub struct AnalysisInfo {
    scopes: Vec<Scope>,
    /// Scope of every visited block
    pub block_scopes: HashMap<BlockId, ScopeId>,
    /// Parameter scope of every function, keyed by the function body
    pub function_scopes: HashMap<BlockId, ScopeId>,
    /// Effects of every visited block including called functions
    pub block_side_effects: HashMap<BlockId, SideEffects>,
    /// Effects of every function body including its callees
    pub function_side_effects: HashMap<FunctionId, SideEffects>,
    /// Union over everything that was visited
    pub side_effects: SideEffects,
}

impl AnalysisInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_scope(&mut self, parent: Option<ScopeId>, function_scope: bool) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(parent, function_scope));
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0]
    }

    pub fn scopes(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.scopes.iter().enumerate().map(|(i, scope)| (ScopeId(i), scope))
    }

    /// Scope recorded for a block
    pub fn scope_of(&self, block: BlockId) -> Option<&Scope> {
        self.block_scopes.get(&block).map(|id| self.scope(*id))
    }

    /// Resolve `name` starting at `scope`
    ///
    /// Walks the parent chain and stops at the first scope declaring the
    /// name. Once a function boundary has been crossed, a variable found
    /// further out is not visible and the lookup fails.
    pub fn lookup(&self, scope: ScopeId, name: Name) -> Option<(ScopeId, &Symbol)> {
        let mut crossed_function = false;
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scope(id);
            if let Some(symbol) = scope.get(name) {
                if crossed_function && symbol.is_variable() {
                    return None;
                }
                return Some((id, symbol));
            }
            crossed_function |= scope.function_scope;
            current = scope.parent;
        }
        None
    }

    /// Whether `name` is declared anywhere along the chain, function
    /// boundaries included
    pub fn exists(&self, scope: ScopeId, name: Name) -> bool {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scope(id);
            if scope.contains(name) {
                return true;
            }
            current = scope.parent;
        }
        false
    }

    /// Human readable listing of all scopes
    pub fn dump(&self, names: &NameRepository) -> String {
        let block_of: HashMap<_, _> = self
            .block_scopes
            .iter()
            .map(|(block, scope)| (*scope, *block))
            .collect();
        let function_of: HashMap<_, _> = self
            .function_scopes
            .iter()
            .map(|(body, scope)| (*scope, *body))
            .collect();

        let mut output = String::new();
        for (id, scope) in self.scopes() {
            let _ = write!(output, "scope {}", id.0);
            if let Some(parent) = scope.parent {
                let _ = write!(output, " (parent {})", parent.0);
            }
            if let Some(block) = block_of.get(&id) {
                let _ = write!(output, " block {}", block.0);
            }
            if let Some(body) = function_of.get(&id) {
                let _ = write!(output, " parameters of function body {}", body.0);
            }
            output.push('\n');

            for (name, symbol) in scope.symbols() {
                match symbol {
                    Symbol::Variable { ty } => {
                        let _ = writeln!(
                            output,
                            "  let {}: {}",
                            names.resolve(name),
                            names.display_type(*ty)
                        );
                    }
                    Symbol::Function { parameters, returns } => {
                        let _ = writeln!(
                            output,
                            "  function {}({}) -> ({})",
                            names.resolve(name),
                            parameters.len(),
                            returns.len()
                        );
                    }
                }
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{EvmDialect, EvmVersion};

    fn names() -> NameRepository {
        NameRepository::new(EvmDialect::new(EvmVersion::Cancun))
    }

    #[test]
    fn test_lookup_walks_parents() {
        let mut names = names();
        let x = names.intern("x");
        let ty = names.default_type();

        let mut info = AnalysisInfo::new();
        let root = info.add_scope(None, false);
        let child = info.add_scope(Some(root), false);
        assert!(info.scope_mut(root).insert_variable(x, ty));

        assert_eq!(info.lookup(child, x).map(|(id, _)| id), Some(root));
        assert!(info.exists(child, x));
    }

    #[test]
    fn test_variables_hidden_behind_function_boundary() {
        let mut names = names();
        let x = names.intern("x");
        let f = names.intern("f");
        let ty = names.default_type();

        let mut info = AnalysisInfo::new();
        let root = info.add_scope(None, false);
        info.scope_mut(root).insert_variable(x, ty);
        info.scope_mut(root).insert_function(f, Vec::new(), Vec::new());
        let parameters = info.add_scope(Some(root), true);
        let body = info.add_scope(Some(parameters), false);

        assert!(info.lookup(body, x).is_none());
        assert!(matches!(info.lookup(body, f), Some((_, Symbol::Function { .. }))));
        // Declaring `x` inside the function would still shadow the outer one.
        assert!(info.exists(body, x));
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut names = names();
        let x = names.intern("x");
        let ty = names.default_type();

        let mut scope = Scope::new(None, false);
        assert!(scope.insert_variable(x, ty));
        assert!(!scope.insert_function(x, Vec::new(), Vec::new()));
        assert_eq!(scope.len(), 1);
        assert_eq!(scope.variables().collect::<Vec<_>>(), vec![x]);
    }
}
