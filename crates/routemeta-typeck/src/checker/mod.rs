//! The checker: binding, lazily computed symbol and declared types, member
//! tables, signatures, and the final forcing pass.
//!
//! # Laziness
//!
//! Types of symbols, declared types of classes/interfaces/aliases and
//! signature return types are computed on first request and memoized.
//! A request that re-enters itself (circular initializers, self-referential
//! aliases) yields `any`. Member tables of generic references are filled on
//! first use. After the main file has been walked, [`Checker::finish`]
//! forces every pending computation so the resulting [`TypeckResult`] is
//! plain data that answers queries without mutation.

mod bind;
mod expr;
mod types;

use rustc_hash::{FxHashMap, FxHashSet};

use routemeta_parser::ast::expr::Expr;
use routemeta_parser::ast::item::{
    BindingElement, Block, ClassDecl, ClassMember, ExtendsClause, ReturnStmt, TypeAnnotation,
};
use routemeta_parser::ast::ty::{Type, TypeLiteral};
use routemeta_parser::ast::{child_node, is_async, AstNode};
use routemeta_parser::{SyntaxKind, SyntaxNode};
use rowan::TextRange;

use crate::error::TypeError;
use crate::scope::{Namespace, ScopeId, ScopeTree};
use crate::ty::{
    FileId, Mapper, MapperId, NodeKey, ObjectKind, ObjectType, Signature, SignatureId, Symbol,
    SymbolId, SymbolKind, TypeData, TypeId, PRIMITIVES,
};
use crate::TypeckResult;

use self::expr::PropertyLookup;

/// Upper bound on forcing rounds. Each round can expand one more level of
/// nested generic references (`Array<Array<T>>` from `concat`), so the
/// bound stops unbounded growth.
const MAX_FORCE_ROUNDS: usize = 16;

/// An error whose message needs a type rendered after checking finishes.
enum PendingError {
    Ready(TypeError),
    UnknownProperty {
        ty: TypeId,
        name: String,
        span: TextRange,
    },
    NotCallable {
        ty: TypeId,
        span: TextRange,
    },
    NotConstructable {
        ty: TypeId,
        span: TextRange,
    },
}

pub(crate) struct Checker {
    prelude: SyntaxNode,
    main: SyntaxNode,

    symbols: Vec<Symbol>,
    types: Vec<TypeData>,
    signatures: Vec<Signature>,
    mappers: Vec<Mapper>,

    interned: FxHashMap<TypeData, TypeId>,
    mapper_ids: FxHashMap<Mapper, MapperId>,
    references: FxHashMap<(TypeId, Vec<TypeId>), TypeId>,
    alias_instances: FxHashMap<(SymbolId, Vec<TypeId>), TypeId>,
    instantiations: FxHashMap<(TypeId, MapperId), TypeId>,
    transients: FxHashMap<(SymbolId, MapperId), SymbolId>,
    signature_instances: FxHashMap<(SignatureId, MapperId), SignatureId>,

    scopes: ScopeTree,
    /// Declaration node to the symbol it declares.
    declarations: FxHashMap<NodeKey, SymbolId>,
    decl_signatures: FxHashMap<NodeKey, SignatureId>,

    symbol_types: FxHashMap<SymbolId, TypeId>,
    declared_types: FxHashMap<SymbolId, TypeId>,
    resolving: FxHashSet<SymbolId>,
    resolving_declared: FxHashSet<SymbolId>,
    resolving_returns: FxHashSet<SignatureId>,

    node_types: FxHashMap<NodeKey, TypeId>,
    type_nodes: FxHashMap<NodeKey, TypeId>,
    /// NAME_REF and PROPERTY_ACCESS nodes to the symbol they refer to.
    resolutions: FxHashMap<NodeKey, SymbolId>,
    /// Contextual types of unannotated parameters, keyed by PARAM node.
    contextual: FxHashMap<NodeKey, TypeId>,
    /// Binding elements to the initializer member they were read from.
    binding_targets: FxHashMap<SymbolId, SymbolId>,

    array_symbol: Option<SymbolId>,
    string_symbol: Option<SymbolId>,
    promise_symbol: Option<SymbolId>,

    errors: Vec<PendingError>,
}

impl Checker {
    pub(crate) fn new(prelude: SyntaxNode, main: SyntaxNode) -> Self {
        let mut checker = Checker {
            prelude,
            main,
            symbols: Vec::new(),
            types: Vec::new(),
            signatures: Vec::new(),
            mappers: Vec::new(),
            interned: FxHashMap::default(),
            mapper_ids: FxHashMap::default(),
            references: FxHashMap::default(),
            alias_instances: FxHashMap::default(),
            instantiations: FxHashMap::default(),
            transients: FxHashMap::default(),
            signature_instances: FxHashMap::default(),
            scopes: ScopeTree::new(),
            declarations: FxHashMap::default(),
            decl_signatures: FxHashMap::default(),
            symbol_types: FxHashMap::default(),
            declared_types: FxHashMap::default(),
            resolving: FxHashSet::default(),
            resolving_declared: FxHashSet::default(),
            resolving_returns: FxHashSet::default(),
            node_types: FxHashMap::default(),
            type_nodes: FxHashMap::default(),
            resolutions: FxHashMap::default(),
            contextual: FxHashMap::default(),
            binding_targets: FxHashMap::default(),
            array_symbol: None,
            string_symbol: None,
            promise_symbol: None,
            errors: Vec::new(),
        };
        for data in PRIMITIVES {
            checker.intern(data);
        }
        checker
    }

    /// Bind both files, then check every expression of the main file.
    pub(crate) fn run(&mut self) {
        let prelude = self.prelude.clone();
        let main = self.main.clone();
        self.bind_file(FileId::Prelude, &prelude);
        self.bind_file(FileId::Main, &main);

        self.array_symbol = self.scopes.get_local(ScopeId::GLOBAL, Namespace::Type, "Array");
        self.string_symbol = self.scopes.get_local(ScopeId::GLOBAL, Namespace::Type, "String");
        self.promise_symbol = self.scopes.get_local(ScopeId::GLOBAL, Namespace::Type, "Promise");

        self.check_tree(&main);
    }

    // ── Node identity ──────────────────────────────────────────────────

    fn file_of(&self, node: &SyntaxNode) -> FileId {
        let root = node.ancestors().last().unwrap_or_else(|| node.clone());
        if std::ptr::eq(&*root.green(), &*self.prelude.green()) {
            FileId::Prelude
        } else {
            FileId::Main
        }
    }

    fn key(&self, node: &SyntaxNode) -> NodeKey {
        NodeKey::new(self.file_of(node), node)
    }

    fn error(&mut self, node: &SyntaxNode, error: PendingError) {
        if self.file_of(node) == FileId::Main {
            self.errors.push(error);
        }
    }

    // ── Arenas ─────────────────────────────────────────────────────────

    fn alloc_symbol(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    /// A fresh, never shared type (objects).
    fn alloc_type(&mut self, data: TypeData) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(data);
        id
    }

    /// A structurally shared type (primitives, literals, unions, type
    /// parameters).
    fn intern(&mut self, data: TypeData) -> TypeId {
        if let Some(&id) = self.interned.get(&data) {
            return id;
        }
        let id = self.alloc_type(data.clone());
        self.interned.insert(data, id);
        id
    }

    fn type_data(&self, id: TypeId) -> &TypeData {
        &self.types[id.0 as usize]
    }

    fn object(&self, id: TypeId) -> Option<&ObjectType> {
        self.type_data(id).as_object()
    }

    fn object_mut(&mut self, id: TypeId) -> Option<&mut ObjectType> {
        match &mut self.types[id.0 as usize] {
            TypeData::Object(obj) => Some(obj),
            _ => None,
        }
    }

    fn alloc_signature(&mut self, signature: Signature) -> SignatureId {
        let id = SignatureId(self.signatures.len() as u32);
        self.signatures.push(signature);
        id
    }

    fn signature(&self, id: SignatureId) -> &Signature {
        &self.signatures[id.0 as usize]
    }

    fn mapper(&mut self, sources: Vec<SymbolId>, targets: Vec<TypeId>) -> MapperId {
        let mapper = Mapper { sources, targets };
        if let Some(&id) = self.mapper_ids.get(&mapper) {
            return id;
        }
        let id = MapperId(self.mappers.len() as u32);
        self.mappers.push(mapper.clone());
        self.mapper_ids.insert(mapper, id);
        id
    }

    // ── Symbol types ───────────────────────────────────────────────────

    /// The type of a value symbol.
    pub(crate) fn type_of_symbol(&mut self, sym: SymbolId) -> TypeId {
        if let Some(&ty) = self.symbol_types.get(&sym) {
            return ty;
        }
        if !self.resolving.insert(sym) {
            return TypeId::ANY;
        }
        let ty = self.compute_symbol_type(sym);
        self.resolving.remove(&sym);
        *self.symbol_types.entry(sym).or_insert(ty)
    }

    fn compute_symbol_type(&mut self, sym: SymbolId) -> TypeId {
        let symbol = self.symbol(sym).clone();
        if let Some((origin, mapper)) = symbol.origin {
            let generic = self.type_of_symbol(origin);
            return self.instantiate(generic, mapper);
        }
        let Some(decl) = symbol.decls.first().cloned() else {
            return TypeId::ANY;
        };

        match symbol.kind {
            SymbolKind::Variable { .. } if decl.kind() == SyntaxKind::BINDING_ELEMENT => {
                self.binding_element_type(sym, &decl)
            }
            SymbolKind::Variable { .. } => {
                if let Some(ty) = self.annotated_type(&decl) {
                    return ty;
                }
                match child_node::<Expr>(&decl) {
                    Some(init) => self.check_expr(&init),
                    None => TypeId::ANY,
                }
            }
            SymbolKind::Parameter => self.parameter_type(&decl),
            SymbolKind::Function => self.function_object(&symbol.decls),
            SymbolKind::Class => self.constructor_type(sym),
            SymbolKind::Property => match decl.kind() {
                SyntaxKind::PROPERTY_ASSIGNMENT => match child_node::<Expr>(&decl) {
                    Some(value) => self.check_expr(&value),
                    None => TypeId::ANY,
                },
                SyntaxKind::SHORTHAND_PROPERTY => match child_node::<Expr>(&decl) {
                    Some(name_ref) => self.check_expr(&name_ref),
                    None => TypeId::ANY,
                },
                SyntaxKind::PARAM => self.parameter_type(&decl),
                _ => {
                    if let Some(ty) = self.annotated_type(&decl) {
                        return ty;
                    }
                    match child_node::<Expr>(&decl) {
                        Some(init) => self.check_expr(&init),
                        None => TypeId::ANY,
                    }
                }
            },
            SymbolKind::Method => self.function_object(&symbol.decls),
            SymbolKind::Interface | SymbolKind::TypeAlias | SymbolKind::TypeParam => TypeId::ANY,
        }
    }

    /// `const { key: name } = init`: the type of `init.key`. The member
    /// read is remembered so a `const` binding aliases it.
    fn binding_element_type(&mut self, sym: SymbolId, decl: &SyntaxNode) -> TypeId {
        let Some(element) = BindingElement::cast(decl.clone()) else {
            return TypeId::ANY;
        };
        let Some(declarator) = element.pattern().and_then(|p| p.declarator()) else {
            return TypeId::ANY;
        };
        let source = match self.annotated_type(declarator.syntax()) {
            Some(ty) => ty,
            None => match declarator.initializer() {
                Some(init) => self.check_expr(&init),
                None => return TypeId::ANY,
            },
        };

        let name = element.property_name();
        match self.property_type(source, &name) {
            PropertyLookup::Found(member, ty) => {
                if let Some(member) = member {
                    self.binding_targets.insert(sym, member);
                }
                ty
            }
            PropertyLookup::Lenient => TypeId::ANY,
            PropertyLookup::Missing => {
                let span = element
                    .key_token()
                    .map(|t| t.text_range())
                    .unwrap_or_else(|| decl.text_range());
                self.error(
                    decl,
                    PendingError::UnknownProperty {
                        ty: source,
                        name,
                        span,
                    },
                );
                TypeId::ANY
            }
        }
    }

    /// Type of the TYPE_ANNOTATION directly under `decl`.
    fn annotated_type(&mut self, decl: &SyntaxNode) -> Option<TypeId> {
        let ty = child_node::<TypeAnnotation>(decl)?.ty()?;
        Some(self.type_from_node(&ty))
    }

    fn parameter_type(&mut self, param: &SyntaxNode) -> TypeId {
        let is_rest = param
            .children_with_tokens()
            .any(|it| it.kind() == SyntaxKind::DOT_DOT_DOT);
        if let Some(ty) = self.annotated_type(param) {
            return ty;
        }
        if let Some(default) = child_node::<Expr>(param) {
            return self.check_expr(&default);
        }
        let key = self.key(param);
        if let Some(&ty) = self.contextual.get(&key) {
            return ty;
        }
        if is_rest {
            self.array_of(TypeId::ANY)
        } else {
            TypeId::ANY
        }
    }

    /// An anonymous object type with one call signature per declaration.
    fn function_object(&mut self, decls: &[SyntaxNode]) -> TypeId {
        let mut obj = ObjectType::new(ObjectKind::Anonymous, None);
        for decl in decls {
            let sig = self.signature_of(decl);
            obj.call_signatures.push(sig);
        }
        self.alloc_type(TypeData::Object(obj))
    }

    /// The value side of a class: static members and a construct signature
    /// producing the instance type.
    fn constructor_type(&mut self, class_sym: SymbolId) -> TypeId {
        let mut obj = ObjectType::new(ObjectKind::Constructor, Some(class_sym));
        let class = self.symbol(class_sym).decls.first().cloned().and_then(ClassDecl::cast);
        let Some(class) = class else {
            return TypeId::ANY;
        };
        let instance = self.declared_type(class_sym);
        let type_params = self
            .object(instance)
            .map(|o| o.type_params.clone())
            .unwrap_or_default();

        let mut ctor = None;
        for member in class.members() {
            match member {
                ClassMember::Property(p) if p.is_static() => {
                    let name = p.name().map(|n| n.text()).unwrap_or_default();
                    let sym = self.member_symbol(name, SymbolKind::Property, p.syntax(), p.is_optional());
                    push_member(&mut obj.members, &mut self.symbols, sym);
                }
                ClassMember::Method(m) if m.is_static() => {
                    let name = m.name().map(|n| n.text()).unwrap_or_default();
                    let sym = self.member_symbol(name, SymbolKind::Method, m.syntax(), false);
                    push_member(&mut obj.members, &mut self.symbols, sym);
                }
                ClassMember::Constructor(c) if ctor.is_none() => ctor = Some(c.syntax().clone()),
                _ => {}
            }
        }

        let sig = match ctor {
            Some(node) => self.signature_of(&node),
            None => self.alloc_signature(Signature {
                type_params: Vec::new(),
                params: Vec::new(),
                decl: None,
                return_type: None,
                target: None,
                constructs: None,
            }),
        };
        let signature = &mut self.signatures[sig.0 as usize];
        signature.type_params = type_params;
        signature.constructs = Some(class_sym);
        obj.construct_signatures.push(sig);
        self.alloc_type(TypeData::Object(obj))
    }

    fn member_symbol(
        &mut self,
        name: String,
        kind: SymbolKind,
        decl: &SyntaxNode,
        is_optional: bool,
    ) -> SymbolId {
        let mut symbol = Symbol::new(name, kind, Some(decl.clone()));
        symbol.is_optional = is_optional;
        let id = self.alloc_symbol(symbol);
        let key = self.key(decl);
        self.declarations.entry(key).or_insert(id);
        id
    }

    // ── Signatures ─────────────────────────────────────────────────────

    /// The signature declared by a function-like node. One per node.
    fn signature_of(&mut self, decl: &SyntaxNode) -> SignatureId {
        let key = self.key(decl);
        if let Some(&sig) = self.decl_signatures.get(&key) {
            return sig;
        }
        let mut type_params = Vec::new();
        let mut params = Vec::new();
        for child in decl.children() {
            match child.kind() {
                SyntaxKind::TYPE_PARAM_LIST => {
                    for tp in child.children() {
                        if let Some(&sym) = self.declarations.get(&self.key(&tp)) {
                            type_params.push(sym);
                        }
                    }
                }
                SyntaxKind::PARAM_LIST => {
                    for param in child.children() {
                        if let Some(&sym) = self.declarations.get(&self.key(&param)) {
                            params.push(sym);
                        }
                    }
                }
                _ => {}
            }
        }
        let sig = self.alloc_signature(Signature {
            type_params,
            params,
            decl: Some(decl.clone()),
            return_type: None,
            target: None,
            constructs: None,
        });
        self.decl_signatures.insert(key, sig);
        sig
    }

    pub(crate) fn return_type(&mut self, sig: SignatureId) -> TypeId {
        if let Some(ty) = self.signature(sig).return_type {
            return ty;
        }
        if !self.resolving_returns.insert(sig) {
            return TypeId::ANY;
        }
        let ty = self.compute_return_type(sig);
        self.resolving_returns.remove(&sig);
        let slot = &mut self.signatures[sig.0 as usize].return_type;
        *slot.get_or_insert(ty)
    }

    fn compute_return_type(&mut self, sig: SignatureId) -> TypeId {
        let signature = self.signature(sig).clone();
        if let Some((target, mapper)) = signature.target {
            let generic = self.return_type(target);
            return self.instantiate(generic, mapper);
        }
        if let Some(class) = signature.constructs {
            return self.declared_type(class);
        }
        let Some(decl) = signature.decl else {
            return TypeId::ANY;
        };

        match decl.kind() {
            SyntaxKind::FUNCTION_TYPE => match child_node::<Type>(&decl) {
                Some(ty) => self.type_from_node(&ty),
                None => TypeId::ANY,
            },
            SyntaxKind::CONSTRUCTOR_DECL => TypeId::VOID,
            _ => {
                if let Some(ty) = self.annotated_type(&decl) {
                    return ty;
                }
                let inferred = self.inferred_return_type(&decl);
                if is_async(&decl) {
                    return self.promise_of(inferred);
                }
                inferred
            }
        }
    }

    fn inferred_return_type(&mut self, decl: &SyntaxNode) -> TypeId {
        if let Some(block) = child_node::<Block>(decl) {
            return self.block_return_type(&block);
        }
        if decl.kind() == SyntaxKind::ARROW_FUNCTION {
            if let Some(body) = decl.children().last().and_then(Expr::cast) {
                return self.check_expr(&body);
            }
        }
        TypeId::ANY
    }

    /// `Promise<ty>`, the inferred return type of an `async` function.
    fn promise_of(&mut self, ty: TypeId) -> TypeId {
        match self.promise_symbol {
            Some(promise) => {
                let target = self.declared_type(promise);
                self.reference(target, vec![ty])
            }
            None => TypeId::ANY,
        }
    }

    /// Union of the `return` expressions of a body; `void` without any.
    fn block_return_type(&mut self, block: &Block) -> TypeId {
        let mut returns = Vec::new();
        collect_returns(block.syntax(), &mut returns);
        if returns.is_empty() {
            return TypeId::VOID;
        }
        let mut types = Vec::with_capacity(returns.len());
        for ret in returns {
            let ty = match ret.expr() {
                Some(expr) => self.check_expr(&expr),
                None => TypeId::UNDEFINED,
            };
            types.push(ty);
        }
        self.union(types)
    }

    // ── Declared types ─────────────────────────────────────────────────

    /// The type a class, interface, alias or type parameter names.
    pub(crate) fn declared_type(&mut self, sym: SymbolId) -> TypeId {
        if let Some(&ty) = self.declared_types.get(&sym) {
            return ty;
        }
        let kind = self.symbol(sym).kind;
        match kind {
            SymbolKind::TypeParam => {
                let ty = self.intern(TypeData::TypeParam(sym));
                self.declared_types.insert(sym, ty);
                ty
            }
            SymbolKind::Class | SymbolKind::Interface => {
                let object_kind = if kind == SymbolKind::Class {
                    ObjectKind::Class
                } else {
                    ObjectKind::Interface
                };
                let mut obj = ObjectType::new(object_kind, Some(sym));
                obj.type_params = self.declared_type_params(sym);
                let ty = self.alloc_type(TypeData::Object(obj));
                // Registered before members are read so self-references
                // inside the body resolve to this type.
                self.declared_types.insert(sym, ty);
                if kind == SymbolKind::Class {
                    self.fill_class_members(sym, ty);
                } else {
                    self.fill_interface_members(sym, ty);
                }
                ty
            }
            SymbolKind::TypeAlias => {
                if !self.resolving_declared.insert(sym) {
                    return TypeId::ANY;
                }
                let aliased = self
                    .symbol(sym)
                    .decls
                    .first()
                    .and_then(|decl| child_node::<Type>(decl));
                let ty = match aliased {
                    Some(ty) => self.type_from_node(&ty),
                    None => TypeId::ANY,
                };
                self.resolving_declared.remove(&sym);
                *self.declared_types.entry(sym).or_insert(ty)
            }
            _ => TypeId::ANY,
        }
    }

    /// Type parameter symbols of a generic declaration.
    fn declared_type_params(&self, sym: SymbolId) -> Vec<SymbolId> {
        let Some(decl) = self.symbol(sym).decls.first() else {
            return Vec::new();
        };
        decl.children()
            .filter(|n| n.kind() == SyntaxKind::TYPE_PARAM_LIST)
            .flat_map(|list| list.children())
            .filter_map(|tp| self.declarations.get(&self.key(&tp)).copied())
            .collect()
    }

    fn fill_class_members(&mut self, sym: SymbolId, ty: TypeId) {
        let decls = self.symbol(sym).decls.clone();
        let mut members: Vec<SymbolId> = Vec::new();
        let mut string_index = None;
        let mut base = None;

        for class in decls.into_iter().filter_map(ClassDecl::cast) {
            for member in class.members() {
                match member {
                    ClassMember::Property(p) if !p.is_static() => {
                        let name = p.name().map(|n| n.text()).unwrap_or_default();
                        let s = self.member_symbol(name, SymbolKind::Property, p.syntax(), p.is_optional());
                        push_member(&mut members, &mut self.symbols, s);
                    }
                    ClassMember::Method(m) if !m.is_static() => {
                        let name = m.name().map(|n| n.text()).unwrap_or_default();
                        let s = self.member_symbol(name, SymbolKind::Method, m.syntax(), false);
                        push_member(&mut members, &mut self.symbols, s);
                    }
                    ClassMember::Constructor(c) => {
                        let params = c.param_list().map(|l| l.params().collect::<Vec<_>>());
                        for param in params.unwrap_or_default() {
                            if !param.is_parameter_property() {
                                continue;
                            }
                            let name = param.name().map(|n| n.text()).unwrap_or_default();
                            let s = self.member_symbol(
                                name,
                                SymbolKind::Property,
                                param.syntax(),
                                param.is_optional(),
                            );
                            push_member(&mut members, &mut self.symbols, s);
                        }
                    }
                    ClassMember::Index(idx) => {
                        if let Some(value) = idx.annotation().and_then(|a| a.ty()) {
                            string_index = Some(self.type_from_node(&value));
                        }
                    }
                    _ => {}
                }
            }
            if base.is_none() {
                base = class.extends().and_then(|e| e.types().next());
            }
        }

        if let Some(base) = base {
            let base_ty = self.type_from_node(&base);
            self.inherit(base_ty, &mut members, &mut string_index);
        }
        if let Some(obj) = self.object_mut(ty) {
            obj.members = members;
            obj.string_index = string_index;
        }
    }

    fn fill_interface_members(&mut self, sym: SymbolId, ty: TypeId) {
        let decls = self.symbol(sym).decls.clone();
        let mut members: Vec<SymbolId> = Vec::new();
        let mut string_index = None;
        let mut bases = Vec::new();

        for decl in &decls {
            if let Some(body) = child_node::<TypeLiteral>(decl) {
                let body = self.type_from_node(&Type::Object(body));
                for member in self.members_of(body) {
                    push_member(&mut members, &mut self.symbols, member);
                }
                if string_index.is_none() {
                    string_index = self.object(body).and_then(|o| o.string_index);
                }
            }
            if let Some(extends) = child_node::<ExtendsClause>(decl) {
                bases.extend(extends.types());
            }
        }
        for base in bases {
            let base_ty = self.type_from_node(&base);
            self.inherit(base_ty, &mut members, &mut string_index);
        }
        if let Some(obj) = self.object_mut(ty) {
            obj.members = members;
            obj.string_index = string_index;
        }
    }

    /// Append base members not overridden by name.
    fn inherit(&mut self, base: TypeId, members: &mut Vec<SymbolId>, string_index: &mut Option<TypeId>) {
        for inherited in self.members_of(base) {
            let name = &self.symbol(inherited).name;
            if !members.iter().any(|&m| &self.symbol(m).name == name) {
                members.push(inherited);
            }
        }
        if string_index.is_none() {
            *string_index = self.object(base).and_then(|o| o.string_index);
        }
    }

    // ── Walking the main file ──────────────────────────────────────────

    /// Check every expression under `node`, outermost first, so a call is
    /// seen before the function literals passed to it.
    fn check_tree(&mut self, node: &SyntaxNode) {
        for child in node.children() {
            if let Some(ty) = Type::cast(child.clone()) {
                self.type_from_node(&ty);
                continue;
            }
            if let Some(expr) = Expr::cast(child.clone()) {
                self.check_expr(&expr);
            }
            self.check_tree(&child);
        }
    }

    // ── Finishing ──────────────────────────────────────────────────────

    /// Force all lazy computations and freeze the tables.
    pub(crate) fn finish(mut self) -> TypeckResult {
        for _ in 0..MAX_FORCE_ROUNDS {
            let before = (self.symbols.len(), self.types.len(), self.signatures.len());
            for i in 0..self.symbols.len() {
                let sym = SymbolId(i as u32);
                if self.symbol(sym).kind.is_value() {
                    self.type_of_symbol(sym);
                } else {
                    self.declared_type(sym);
                }
            }
            for i in 0..self.types.len() {
                self.members_of(TypeId(i as u32));
            }
            for i in 0..self.signatures.len() {
                self.return_type(SignatureId(i as u32));
            }
            let after = (self.symbols.len(), self.types.len(), self.signatures.len());
            if before == after {
                break;
            }
        }

        let aliases = self.const_aliases();
        let mut result = TypeckResult {
            symbols: self.symbols,
            types: self.types,
            signatures: self.signatures,
            errors: Vec::new(),
            symbol_types: self.symbol_types,
            node_types: self.node_types,
            resolutions: self.resolutions,
            declarations: self.declarations,
            aliases,
            array_symbol: self.array_symbol,
            prelude: self.prelude,
        };
        let errors = self
            .errors
            .into_iter()
            .map(|pending| match pending {
                PendingError::Ready(err) => err,
                PendingError::UnknownProperty { ty, name, span } => TypeError::UnknownProperty {
                    ty: result.display_type(ty),
                    name,
                    span,
                },
                PendingError::NotCallable { ty, span } => TypeError::NotCallable {
                    ty: result.display_type(ty),
                    span,
                },
                PendingError::NotConstructable { ty, span } => TypeError::NotConstructable {
                    ty: result.display_type(ty),
                    span,
                },
            })
            .collect();
        result.errors = errors;
        result
    }

    /// `const a = b` and `const a = b.c`: `a` stands for what the
    /// initializer refers to. `const { c } = b` aliases `c` to `b.c`.
    fn const_aliases(&self) -> FxHashMap<SymbolId, SymbolId> {
        let mut aliases = FxHashMap::default();
        for (i, symbol) in self.symbols.iter().enumerate() {
            if symbol.kind != (SymbolKind::Variable { is_const: true }) {
                continue;
            }
            let sym = SymbolId(i as u32);
            if let Some(&member) = self.binding_targets.get(&sym) {
                aliases.insert(sym, member);
                continue;
            }
            let Some(init) = symbol.decls.first().and_then(|d| child_node::<Expr>(d)) else {
                continue;
            };
            let init = init.skip_parens();
            if !matches!(init, Expr::NameRef(_) | Expr::PropertyAccess(_)) {
                continue;
            }
            if let Some(&target) = self.resolutions.get(&self.key(init.syntax())) {
                aliases.insert(sym, target);
            }
        }
        aliases
    }
}

/// Add `sym` to a member list; a method name seen before gains another
/// overload declaration instead.
fn push_member(members: &mut Vec<SymbolId>, symbols: &mut [Symbol], sym: SymbolId) {
    let new = &symbols[sym.0 as usize];
    let existing = members.iter().copied().find(|&m| {
        let old = &symbols[m.0 as usize];
        old.name == new.name && old.kind == SymbolKind::Method && new.kind == SymbolKind::Method
    });
    match existing {
        Some(old) => {
            let decls = symbols[sym.0 as usize].decls.clone();
            symbols[old.0 as usize].decls.extend(decls);
        }
        None => members.push(sym),
    }
}

/// RETURN_STMTs of a function body in source order, not descending into
/// nested functions or classes.
fn collect_returns(node: &SyntaxNode, out: &mut Vec<ReturnStmt>) {
    for child in node.children() {
        match child.kind() {
            SyntaxKind::RETURN_STMT => {
                if let Some(ret) = ReturnStmt::cast(child) {
                    out.push(ret);
                }
            }
            SyntaxKind::ARROW_FUNCTION
            | SyntaxKind::FUNCTION_EXPR
            | SyntaxKind::FUNCTION_DECL
            | SyntaxKind::CLASS_DECL => {}
            _ => collect_returns(&child, out),
        }
    }
}
