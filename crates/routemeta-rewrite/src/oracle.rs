//! The questions the rewriter asks about a checked program.
//!
//! Symbols, types and signatures are opaque handles compared by equality.
//! [`crate::frontend`] answers these from a `TypeckResult`; tests answer
//! them from hand-built tables.

use routemeta_parser::SyntaxNode;
use routemeta_typeck::ty::{SignatureId, SymbolId, TypeId};

/// Coarse classification of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoarseKind {
    Undefined,
    String,
    Number,
    Boolean,
    Object,
    /// Unions, literals, `any`, `void`, type parameters, ...
    Other,
}

/// Sub-kind of an object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    ClassOrInterface,
    /// Object literals and type literals.
    Anonymous,
    /// `T[]` / `Array<T>`.
    ArrayLike,
    /// Other generic instantiations, constructors and function types.
    Other,
}

pub trait TypeOracle {
    /// Symbol a NAME_REF or PROPERTY_ACCESS refers to, through `const`
    /// aliases.
    fn symbol_at(&self, node: &SyntaxNode) -> Option<SymbolId>;

    fn symbol_name(&self, sym: SymbolId) -> String;

    fn value_declaration(&self, sym: SymbolId) -> Option<SyntaxNode>;

    fn type_of_declaration(&self, decl: &SyntaxNode) -> TypeId;

    fn type_of_expression(&self, expr: &SyntaxNode) -> TypeId;

    fn type_of_symbol(&self, sym: SymbolId) -> TypeId;

    fn coarse_kind(&self, ty: TypeId) -> CoarseKind;

    /// `None` unless the coarse kind is [`CoarseKind::Object`].
    fn object_kind(&self, ty: TypeId) -> Option<ObjectKind>;

    /// Declared name of a class, interface or generic type.
    fn type_name(&self, ty: TypeId) -> Option<String>;

    fn is_class(&self, ty: TypeId) -> bool;

    fn property(&self, ty: TypeId, name: &str) -> Option<SymbolId>;

    /// Own properties in declaration order.
    fn properties(&self, ty: TypeId) -> Vec<SymbolId>;

    fn type_arguments(&self, ty: TypeId) -> Vec<TypeId>;

    fn call_signatures(&self, ty: TypeId) -> Vec<SignatureId>;

    fn parameters(&self, sig: SignatureId) -> Vec<SymbolId>;

    fn return_type(&self, sig: SignatureId) -> TypeId;

    /// Human-readable rendering for diagnostics.
    fn display_type(&self, ty: TypeId) -> String;
}
