//! Type representation: symbols, types, signatures and type mappers.
//!
//! Everything lives in arenas owned by the checker and is referred to by
//! `u32` newtype ids. Symbols are compared by id only.

use routemeta_parser::{SyntaxKind, SyntaxNode};
use rowan::TextRange;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignatureId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MapperId(pub u32);

impl TypeId {
    pub const ANY: TypeId = TypeId(0);
    pub const UNKNOWN: TypeId = TypeId(1);
    pub const NEVER: TypeId = TypeId(2);
    pub const VOID: TypeId = TypeId(3);
    pub const UNDEFINED: TypeId = TypeId(4);
    pub const NULL: TypeId = TypeId(5);
    pub const STRING: TypeId = TypeId(6);
    pub const NUMBER: TypeId = TypeId(7);
    pub const BOOLEAN: TypeId = TypeId(8);
}

/// The well-known types, in the order of their fixed ids.
pub(crate) const PRIMITIVES: [TypeData; 9] = [
    TypeData::Any,
    TypeData::Unknown,
    TypeData::Never,
    TypeData::Void,
    TypeData::Undefined,
    TypeData::Null,
    TypeData::String,
    TypeData::Number,
    TypeData::Boolean,
];

// ── Node keys ────────────────────────────────────────────────────────────

/// Which parsed file a node belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FileId {
    Prelude,
    Main,
}

/// Identity of a syntax node that survives re-rooting the tree: the same
/// green tree viewed through a fresh `SyntaxNode::new_root` yields the same
/// key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeKey {
    pub file: FileId,
    pub kind: SyntaxKind,
    pub range: TextRange,
}

impl NodeKey {
    pub fn new(file: FileId, node: &SyntaxNode) -> Self {
        NodeKey {
            file,
            kind: node.kind(),
            range: node.text_range(),
        }
    }
}

// ── Symbols ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Variable { is_const: bool },
    Function,
    Class,
    Interface,
    TypeAlias,
    TypeParam,
    Parameter,
    Property,
    Method,
}

impl SymbolKind {
    /// Whether the symbol names a value (as opposed to only a type).
    pub fn is_value(self) -> bool {
        !matches!(
            self,
            SymbolKind::Interface | SymbolKind::TypeAlias | SymbolKind::TypeParam
        )
    }
}

#[derive(Clone, Debug)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Declaring nodes in source order. Overloaded methods have several.
    pub decls: Vec<SyntaxNode>,
    pub is_optional: bool,
    /// For members and parameters of an instantiated type: the generic
    /// symbol this one was derived from, and the substitution applied.
    pub origin: Option<(SymbolId, MapperId)>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, decl: Option<SyntaxNode>) -> Self {
        Symbol {
            name: name.into(),
            kind,
            decls: decl.into_iter().collect(),
            is_optional: false,
            origin: None,
        }
    }
}

// ── Types ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Instance type of a class declaration.
    Class,
    Interface,
    /// Object literals, type literals and function types.
    Anonymous,
    /// The value side of a class: static members and a construct signature.
    Constructor,
    /// A generic class or interface applied to type arguments.
    Reference,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectType {
    pub kind: ObjectKind,
    /// The declaring class, interface or alias, if any.
    pub symbol: Option<SymbolId>,
    /// Property and method symbols in declaration order.
    pub members: Vec<SymbolId>,
    pub call_signatures: Vec<SignatureId>,
    pub construct_signatures: Vec<SignatureId>,
    pub string_index: Option<TypeId>,
    /// Type parameters of a generic class or interface.
    pub type_params: Vec<SymbolId>,
    /// For references: the generic declared type.
    pub target: Option<TypeId>,
    pub type_arguments: Vec<TypeId>,
    /// References fill `members` on first use.
    pub(crate) members_resolved: bool,
}

impl ObjectType {
    pub fn new(kind: ObjectKind, symbol: Option<SymbolId>) -> Self {
        ObjectType {
            kind,
            symbol,
            members: Vec::new(),
            call_signatures: Vec::new(),
            construct_signatures: Vec::new(),
            string_index: None,
            type_params: Vec::new(),
            target: None,
            type_arguments: Vec::new(),
            members_resolved: kind != ObjectKind::Reference,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Any,
    Unknown,
    Never,
    Void,
    Undefined,
    Null,
    String,
    Number,
    Boolean,
    StringLiteral(String),
    NumberLiteral(String),
    BooleanLiteral(bool),
    Union(Vec<TypeId>),
    Object(ObjectType),
    TypeParam(SymbolId),
}

impl TypeData {
    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            TypeData::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

// ── Signatures and mappers ───────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Signature {
    pub type_params: Vec<SymbolId>,
    pub params: Vec<SymbolId>,
    /// The function-like node this signature was read from.
    pub decl: Option<SyntaxNode>,
    /// Set on first request; see `Checker::return_type`.
    pub return_type: Option<TypeId>,
    /// An instantiated signature: the generic one and the substitution.
    pub(crate) target: Option<(SignatureId, MapperId)>,
    /// Construct signatures return the instance type of this class.
    pub(crate) constructs: Option<SymbolId>,
}

/// A substitution of type parameters by types.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Mapper {
    pub sources: Vec<SymbolId>,
    pub targets: Vec<TypeId>,
}

impl Mapper {
    pub fn get(&self, param: SymbolId) -> Option<TypeId> {
        self.sources
            .iter()
            .position(|&p| p == param)
            .map(|i| self.targets[i])
    }
}
