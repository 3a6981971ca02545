//! routemeta type checker.
//!
//! Binds declarations of a parsed file (plus a small built-in prelude),
//! computes types for symbols and expressions, and hands back an immutable
//! [`TypeckResult`] that answers the queries a source rewriter needs:
//! which symbol a name refers to, the type of a node, members of a type,
//! call signatures and their return types.
//!
//! The checker is deliberately lenient. It knows no strict null checks and
//! no generic inference, and every problem it finds is recorded as a
//! [`TypeError`] with checking continuing at type `any`.

mod checker;
pub mod diagnostics;
mod display;
pub mod error;
pub mod prelude;
pub mod scope;
pub mod ty;

use rustc_hash::FxHashMap;

use routemeta_parser::{Parse, SyntaxNode};

use crate::diagnostics::{render_diagnostic, DiagnosticOptions};
pub use crate::error::TypeError;
use crate::ty::{
    FileId, NodeKey, ObjectKind, Signature, SignatureId, Symbol, SymbolId, TypeData, TypeId,
};

/// Alias chains longer than this are treated as cyclic.
const MAX_ALIAS_HOPS: usize = 64;

/// The result of type checking one file.
pub struct TypeckResult {
    pub symbols: Vec<Symbol>,
    pub types: Vec<TypeData>,
    pub signatures: Vec<Signature>,
    /// Errors in source order of discovery.
    pub errors: Vec<TypeError>,
    symbol_types: FxHashMap<SymbolId, TypeId>,
    node_types: FxHashMap<NodeKey, TypeId>,
    resolutions: FxHashMap<NodeKey, SymbolId>,
    declarations: FxHashMap<NodeKey, SymbolId>,
    /// `const a = b` makes `a` an alias of `b`'s symbol.
    aliases: FxHashMap<SymbolId, SymbolId>,
    array_symbol: Option<SymbolId>,
    prelude: SyntaxNode,
}

/// Type check a parsed file against the built-in prelude.
pub fn check(parse: &Parse) -> TypeckResult {
    let prelude = routemeta_parser::parse(prelude::PRELUDE);
    let mut checker = checker::Checker::new(prelude.syntax(), parse.syntax());
    checker.run();
    checker.finish()
}

impl TypeckResult {
    fn key(&self, node: &SyntaxNode) -> NodeKey {
        let root = node.ancestors().last().unwrap_or_else(|| node.clone());
        let file = if std::ptr::eq(&*root.green(), &*self.prelude.green()) {
            FileId::Prelude
        } else {
            FileId::Main
        };
        NodeKey::new(file, node)
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    pub fn type_data(&self, id: TypeId) -> &TypeData {
        &self.types[id.0 as usize]
    }

    pub fn signature(&self, id: SignatureId) -> &Signature {
        &self.signatures[id.0 as usize]
    }

    // ── Symbols ────────────────────────────────────────────────────────

    /// The symbol a NAME_REF or PROPERTY_ACCESS refers to, as written.
    pub fn resolve(&self, node: &SyntaxNode) -> Option<SymbolId> {
        self.resolutions.get(&self.key(node)).copied()
    }

    /// Like [`resolve`](Self::resolve), then through `const` aliases:
    /// with `const register = routes.add`, a use of `register` resolves
    /// to the `add` member.
    pub fn resolve_aliased(&self, node: &SyntaxNode) -> Option<SymbolId> {
        self.resolve(node).map(|sym| self.follow_aliases(sym))
    }

    pub fn follow_aliases(&self, mut sym: SymbolId) -> SymbolId {
        for _ in 0..MAX_ALIAS_HOPS {
            match self.aliases.get(&sym) {
                Some(&next) if next != sym => sym = next,
                _ => break,
            }
        }
        sym
    }

    /// The symbol declared by a declaration node (VAR_DECLARATOR,
    /// CLASS_DECL, PARAM, PROPERTY_DECL, ...).
    pub fn declaration_symbol(&self, node: &SyntaxNode) -> Option<SymbolId> {
        self.declarations.get(&self.key(node)).copied()
    }

    /// First declaration of a value symbol. Members of instantiated types
    /// report the declaration of the generic member.
    pub fn value_declaration(&self, mut sym: SymbolId) -> Option<SyntaxNode> {
        while let Some((origin, _)) = self.symbol(sym).origin {
            sym = origin;
        }
        let symbol = self.symbol(sym);
        if !symbol.kind.is_value() {
            return None;
        }
        symbol.decls.first().cloned()
    }

    // ── Types ──────────────────────────────────────────────────────────

    /// Type of an expression in the checked file; `any` for nodes the
    /// checker never saw.
    pub fn type_of_node(&self, node: &SyntaxNode) -> TypeId {
        if let Some(&ty) = self.node_types.get(&self.key(node)) {
            return ty;
        }
        match self.declaration_symbol(node) {
            Some(sym) => self.type_of_symbol(sym),
            None => TypeId::ANY,
        }
    }

    pub fn type_of_symbol(&self, sym: SymbolId) -> TypeId {
        self.symbol_types.get(&sym).copied().unwrap_or(TypeId::ANY)
    }

    /// Property and method symbols of an object type in declaration order.
    pub fn members(&self, ty: TypeId) -> &[SymbolId] {
        match self.type_data(ty) {
            TypeData::Object(obj) => &obj.members,
            _ => &[],
        }
    }

    pub fn property(&self, ty: TypeId, name: &str) -> Option<SymbolId> {
        self.members(ty)
            .iter()
            .copied()
            .find(|&m| self.symbol(m).name == name)
    }

    pub fn call_signatures(&self, ty: TypeId) -> &[SignatureId] {
        match self.type_data(ty) {
            TypeData::Object(obj) => &obj.call_signatures,
            _ => &[],
        }
    }

    pub fn return_type(&self, sig: SignatureId) -> TypeId {
        self.signature(sig).return_type.unwrap_or(TypeId::ANY)
    }

    /// Name of the class, interface or generic declaration behind an
    /// object type.
    pub fn type_name(&self, ty: TypeId) -> Option<&str> {
        let obj = self.type_data(ty).as_object()?;
        match obj.kind {
            ObjectKind::Anonymous => None,
            _ => obj.symbol.map(|s| self.symbol(s).name.as_str()),
        }
    }

    pub fn object_kind(&self, ty: TypeId) -> Option<ObjectKind> {
        self.type_data(ty).as_object().map(|obj| obj.kind)
    }

    pub fn type_arguments(&self, ty: TypeId) -> &[TypeId] {
        match self.type_data(ty) {
            TypeData::Object(obj) => &obj.type_arguments,
            _ => &[],
        }
    }

    /// Whether `ty` is `T[]` / `Array<T>`.
    pub fn is_array(&self, ty: TypeId) -> bool {
        let Some(obj) = self.type_data(ty).as_object() else {
            return false;
        };
        obj.kind == ObjectKind::Reference && obj.symbol.is_some() && obj.symbol == self.array_symbol
    }

    pub fn is_class(&self, ty: TypeId) -> bool {
        self.object_kind(ty) == Some(ObjectKind::Class)
    }

    // ── Diagnostics ────────────────────────────────────────────────────

    pub fn render_errors(&self, source: &str, filename: &str, options: &DiagnosticOptions) -> Vec<String> {
        self.errors
            .iter()
            .map(|err| render_diagnostic(err, source, filename, options))
            .collect()
    }
}
