//! Binding: one walk per file that creates symbols for declarations and
//! records which nodes own scopes.

use routemeta_parser::ast::item::{Name, Param};
use routemeta_parser::ast::{child_node, AstNode};
use routemeta_parser::{SyntaxKind, SyntaxNode};

use crate::scope::{Namespace, ScopeId};
use crate::ty::{FileId, NodeKey, Symbol, SymbolId, SymbolKind};

use super::Checker;

impl Checker {
    /// The prelude binds straight into the global scope; the main file gets
    /// a child scope so its declarations shadow prelude names.
    pub(super) fn bind_file(&mut self, file: FileId, root: &SyntaxNode) {
        let key = NodeKey::new(file, root);
        let scope = match file {
            FileId::Prelude => {
                self.scopes.set_owner(key, ScopeId::GLOBAL);
                ScopeId::GLOBAL
            }
            FileId::Main => self.scopes.add(ScopeId::GLOBAL, key),
        };
        self.bind_children(file, root, scope);
    }

    fn bind_children(&mut self, file: FileId, node: &SyntaxNode, scope: ScopeId) {
        for child in node.children() {
            self.bind_node(file, &child, scope);
        }
    }

    fn bind_node(&mut self, file: FileId, node: &SyntaxNode, scope: ScopeId) {
        let key = NodeKey::new(file, node);
        match node.kind() {
            SyntaxKind::VAR_DECLARATOR | SyntaxKind::BINDING_ELEMENT => {
                let is_const = is_const_declaration(node);
                self.declare(file, node, scope, Namespace::Value, SymbolKind::Variable { is_const });
                self.bind_children(file, node, scope);
            }
            SyntaxKind::FUNCTION_DECL => {
                self.declare(file, node, scope, Namespace::Value, SymbolKind::Function);
                let inner = self.scopes.add(scope, key);
                self.bind_children(file, node, inner);
            }
            SyntaxKind::FUNCTION_EXPR => {
                let inner = self.scopes.add(scope, key);
                self.declare(file, node, inner, Namespace::Value, SymbolKind::Function);
                self.bind_children(file, node, inner);
            }
            SyntaxKind::CLASS_DECL => {
                if let Some(sym) = self.declare(file, node, scope, Namespace::Type, SymbolKind::Class) {
                    if let Some(name) = child_node::<Name>(node) {
                        // A class also names its constructor value.
                        let _ = self.scopes.declare(scope, Namespace::Value, &name.text(), sym);
                    }
                }
                let inner = self.scopes.add(scope, key);
                self.bind_children(file, node, inner);
            }
            SyntaxKind::INTERFACE_DECL => {
                self.declare(file, node, scope, Namespace::Type, SymbolKind::Interface);
                let inner = self.scopes.add(scope, key);
                self.bind_children(file, node, inner);
            }
            SyntaxKind::TYPE_ALIAS_DECL => {
                self.declare(file, node, scope, Namespace::Type, SymbolKind::TypeAlias);
                let inner = self.scopes.add(scope, key);
                self.bind_children(file, node, inner);
            }
            SyntaxKind::TYPE_PARAM => {
                self.declare(file, node, scope, Namespace::Type, SymbolKind::TypeParam);
                self.bind_children(file, node, scope);
            }
            SyntaxKind::PARAM => {
                let in_index_signature = node
                    .parent()
                    .is_some_and(|p| p.kind() == SyntaxKind::INDEX_SIGNATURE);
                let is_this = Param::cast(node.clone())
                    .and_then(|p| p.name())
                    .and_then(|n| n.token())
                    .is_some_and(|t| t.kind() == SyntaxKind::THIS_KW);
                if !in_index_signature && !is_this {
                    self.declare(file, node, scope, Namespace::Value, SymbolKind::Parameter);
                }
                self.bind_children(file, node, scope);
            }
            SyntaxKind::ARROW_FUNCTION
            | SyntaxKind::METHOD_DECL
            | SyntaxKind::CONSTRUCTOR_DECL
            | SyntaxKind::METHOD_SIGNATURE
            | SyntaxKind::FUNCTION_TYPE
            | SyntaxKind::BLOCK => {
                let inner = self.scopes.add(scope, key);
                self.bind_children(file, node, inner);
            }
            _ => self.bind_children(file, node, scope),
        }
    }

    /// Create a symbol for `decl` named by its NAME child and bind it. A
    /// repeated name of the same kind merges into the existing symbol
    /// (overloads, interface merging). Returns the new symbol, if any.
    fn declare(
        &mut self,
        file: FileId,
        decl: &SyntaxNode,
        scope: ScopeId,
        ns: Namespace,
        kind: SymbolKind,
    ) -> Option<SymbolId> {
        let name = child_node::<Name>(decl)?.text();
        let mut symbol = Symbol::new(name.clone(), kind, Some(decl.clone()));
        symbol.is_optional = decl
            .children_with_tokens()
            .any(|it| it.kind() == SyntaxKind::QUESTION);

        let key = NodeKey::new(file, decl);
        match self.scopes.get_local(scope, ns, &name) {
            Some(existing) if self.symbol(existing).kind == kind => {
                self.symbols[existing.0 as usize].decls.push(decl.clone());
                self.declarations.insert(key, existing);
                None
            }
            Some(_) => {
                // Conflicting kinds: keep the first binding, but the node
                // still gets its own symbol.
                let sym = self.alloc_symbol(symbol);
                self.declarations.insert(key, sym);
                None
            }
            None => {
                let sym = self.alloc_symbol(symbol);
                let _ = self.scopes.declare(scope, ns, &name, sym);
                self.declarations.insert(key, sym);
                Some(sym)
            }
        }
    }
}

/// Whether the VAR_STMT around a declarator or binding element uses `const`.
fn is_const_declaration(node: &SyntaxNode) -> bool {
    node.ancestors()
        .find(|n| n.kind() == SyntaxKind::VAR_STMT)
        .and_then(|stmt| {
            stmt.children_with_tokens()
                .filter_map(|it| it.into_token())
                .find(|t| {
                    matches!(
                        t.kind(),
                        SyntaxKind::CONST_KW | SyntaxKind::LET_KW | SyntaxKind::VAR_KW
                    )
                })
        })
        .is_some_and(|t| t.kind() == SyntaxKind::CONST_KW)
}
