//! Lexical scopes.
//!
//! Each scope has separate value and type namespaces, so `Array` can name
//! both the `ArrayConstructor` value and the `Array<T>` interface. Scopes
//! are owned by syntax nodes (the file root, function-likes, blocks, and
//! declarations with type parameters); name lookup starts at the nearest
//! owning ancestor and walks outward.

use rustc_hash::FxHashMap;

use crate::ty::{NodeKey, SymbolId};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const GLOBAL: ScopeId = ScopeId(0);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Namespace {
    Value,
    Type,
}

#[derive(Debug, Default)]
struct Scope {
    parent: Option<ScopeId>,
    values: FxHashMap<String, SymbolId>,
    types: FxHashMap<String, SymbolId>,
}

impl Scope {
    fn names(&self, ns: Namespace) -> &FxHashMap<String, SymbolId> {
        match ns {
            Namespace::Value => &self.values,
            Namespace::Type => &self.types,
        }
    }
}

#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    owners: FxHashMap<NodeKey, ScopeId>,
}

impl ScopeTree {
    /// A tree holding only the global scope.
    pub fn new() -> Self {
        ScopeTree {
            scopes: vec![Scope::default()],
            owners: FxHashMap::default(),
        }
    }

    pub fn add(&mut self, parent: ScopeId, owner: NodeKey) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            parent: Some(parent),
            ..Scope::default()
        });
        self.owners.insert(owner, id);
        id
    }

    pub fn set_owner(&mut self, owner: NodeKey, scope: ScopeId) {
        self.owners.insert(owner, scope);
    }

    pub fn owned_by(&self, owner: &NodeKey) -> Option<ScopeId> {
        self.owners.get(owner).copied()
    }

    /// Bind `name` in `scope`. The first declaration of a name wins; the
    /// existing symbol is returned when the name is taken.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        ns: Namespace,
        name: &str,
        symbol: SymbolId,
    ) -> Result<(), SymbolId> {
        let scope = &mut self.scopes[scope.0 as usize];
        let names = match ns {
            Namespace::Value => &mut scope.values,
            Namespace::Type => &mut scope.types,
        };
        if let Some(&existing) = names.get(name) {
            return Err(existing);
        }
        names.insert(name.to_string(), symbol);
        Ok(())
    }

    /// Only `scope` itself, without walking outward.
    pub fn get_local(&self, scope: ScopeId, ns: Namespace, name: &str) -> Option<SymbolId> {
        self.scopes[scope.0 as usize].names(ns).get(name).copied()
    }

    /// Search from `scope` outward to the global scope.
    pub fn lookup(&self, scope: ScopeId, ns: Namespace, name: &str) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id.0 as usize];
            if let Some(&sym) = scope.names(ns).get(name) {
                return Some(sym);
            }
            current = scope.parent;
        }
        None
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}
