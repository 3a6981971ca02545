//! Type syntax to types, generic references and instantiation.

use routemeta_parser::ast::item::{unquote, TypeParam};
use routemeta_parser::ast::ty::{Type, TypeMember, TypeRef};
use routemeta_parser::ast::AstNode;
use routemeta_parser::{SyntaxKind, SyntaxNode};
use rowan::TextRange;

use crate::error::TypeError;
use crate::prelude::builtin_type;
use crate::scope::Namespace;
use crate::ty::{
    MapperId, NodeKey, ObjectKind, ObjectType, Signature, SignatureId, Symbol, SymbolId, SymbolKind,
    TypeData, TypeId,
};

use super::{push_member, Checker, PendingError};

impl Checker {
    /// Resolve `name` in namespace `ns` from the scope enclosing `node`.
    pub(super) fn lookup(&self, node: &SyntaxNode, ns: Namespace, name: &str) -> Option<SymbolId> {
        let file = self.file_of(node);
        let scope = node
            .ancestors()
            .find_map(|anc| self.scopes.owned_by(&NodeKey::new(file, &anc)))?;
        self.scopes.lookup(scope, ns, name)
    }

    pub(super) fn type_from_node(&mut self, ty: &Type) -> TypeId {
        let key = self.key(ty.syntax());
        if let Some(&cached) = self.type_nodes.get(&key) {
            return cached;
        }
        let result = match ty {
            Type::Ref(r) => self.type_from_ref(r),
            Type::Array(a) => {
                let elem = match a.element() {
                    Some(elem) => self.type_from_node(&elem),
                    None => TypeId::ANY,
                };
                self.array_of(elem)
            }
            Type::Union(u) => {
                let members: Vec<Type> = u.members().collect();
                let types = members.iter().map(|m| self.type_from_node(m)).collect();
                self.union(types)
            }
            Type::Object(lit) => {
                let mut obj = ObjectType::new(ObjectKind::Anonymous, None);
                for member in lit.members() {
                    match member {
                        TypeMember::Property(p) => {
                            let name = p.name().map(|n| n.text()).unwrap_or_default();
                            let sym = self.member_symbol(name, SymbolKind::Property, p.syntax(), p.is_optional());
                            push_member(&mut obj.members, &mut self.symbols, sym);
                        }
                        TypeMember::Method(m) => {
                            let name = m.name().map(|n| n.text()).unwrap_or_default();
                            let optional = m
                                .syntax()
                                .children_with_tokens()
                                .any(|it| it.kind() == SyntaxKind::QUESTION);
                            let sym = self.member_symbol(name, SymbolKind::Method, m.syntax(), optional);
                            push_member(&mut obj.members, &mut self.symbols, sym);
                        }
                        TypeMember::Index(idx) => {
                            if let Some(value) = idx.annotation().and_then(|a| a.ty()) {
                                obj.string_index = Some(self.type_from_node(&value));
                            }
                        }
                    }
                }
                self.alloc_type(TypeData::Object(obj))
            }
            Type::Function(f) => {
                let sig = self.signature_of(f.syntax());
                let mut obj = ObjectType::new(ObjectKind::Anonymous, None);
                obj.call_signatures.push(sig);
                self.alloc_type(TypeData::Object(obj))
            }
            Type::Paren(p) => match p.ty() {
                Some(inner) => self.type_from_node(&inner),
                None => TypeId::ANY,
            },
            Type::This(this) => self.this_type(this.syntax()),
            Type::Literal(lit) => match lit.token() {
                Some(token) => match token.kind() {
                    SyntaxKind::STRING_LITERAL => {
                        self.intern(TypeData::StringLiteral(unquote(token.text()).to_string()))
                    }
                    SyntaxKind::NUMBER_LITERAL => {
                        self.intern(TypeData::NumberLiteral(token.text().to_string()))
                    }
                    SyntaxKind::TRUE_KW => self.intern(TypeData::BooleanLiteral(true)),
                    SyntaxKind::FALSE_KW => self.intern(TypeData::BooleanLiteral(false)),
                    _ => TypeId::ANY,
                },
                None => TypeId::ANY,
            },
            Type::Predefined(p) => match p.keyword() {
                Some(SyntaxKind::VOID_KW) => TypeId::VOID,
                Some(SyntaxKind::NULL_KW) => TypeId::NULL,
                _ => TypeId::ANY,
            },
        };
        self.type_nodes.insert(key, result);
        result
    }

    fn type_from_ref(&mut self, r: &TypeRef) -> TypeId {
        let name = r.name();
        let arg_nodes = r.type_args();
        if arg_nodes.is_empty() {
            if let Some(builtin) = builtin_type(&name) {
                return builtin;
            }
        }
        let span = r
            .name_ref()
            .map(|n| n.syntax().text_range())
            .unwrap_or_else(|| r.syntax().text_range());

        let Some(sym) = self.lookup(r.syntax(), Namespace::Type, &name) else {
            self.error(r.syntax(), PendingError::Ready(TypeError::UnresolvedType { name, span }));
            return TypeId::ANY;
        };
        let args: Vec<TypeId> = arg_nodes.iter().map(|a| self.type_from_node(a)).collect();

        match self.symbol(sym).kind {
            SymbolKind::TypeParam => self.declared_type(sym),
            SymbolKind::Class | SymbolKind::Interface => {
                let declared = self.declared_type(sym);
                let params = self.declared_type_params(sym);
                if params.is_empty() {
                    self.check_arg_count(r.syntax(), &name, &params, args.len(), span);
                    return declared;
                }
                let args = self.fill_type_args(r.syntax(), &name, &params, args, span);
                self.reference(declared, args)
            }
            SymbolKind::TypeAlias => {
                let params = self.declared_type_params(sym);
                if params.is_empty() {
                    self.check_arg_count(r.syntax(), &name, &params, args.len(), span);
                    return self.declared_type(sym);
                }
                let args = self.fill_type_args(r.syntax(), &name, &params, args, span);
                if let Some(&cached) = self.alias_instances.get(&(sym, args.clone())) {
                    return cached;
                }
                let generic = self.declared_type(sym);
                let mapper = self.mapper(params, args.clone());
                let ty = self.instantiate(generic, mapper);
                self.alias_instances.insert((sym, args), ty);
                ty
            }
            _ => TypeId::ANY,
        }
    }

    /// Type parameters without a default.
    fn required_params(&self, params: &[SymbolId]) -> usize {
        params
            .iter()
            .filter(|&&p| {
                self.symbol(p)
                    .decls
                    .first()
                    .map_or(true, |d| !d.children_with_tokens().any(|it| it.kind() == SyntaxKind::EQ))
            })
            .count()
    }

    fn check_arg_count(
        &mut self,
        node: &SyntaxNode,
        name: &str,
        params: &[SymbolId],
        found: usize,
        span: TextRange,
    ) {
        let required = self.required_params(params);
        if found > params.len() || found < required {
            self.error(
                node,
                PendingError::Ready(TypeError::TypeArgumentCount {
                    name: name.to_string(),
                    expected: params.len(),
                    found,
                    span,
                }),
            );
        }
    }

    /// Explicit type arguments, truncated to the parameter count and padded
    /// with defaults (or `any`).
    fn fill_type_args(
        &mut self,
        node: &SyntaxNode,
        name: &str,
        params: &[SymbolId],
        mut args: Vec<TypeId>,
        span: TextRange,
    ) -> Vec<TypeId> {
        self.check_arg_count(node, name, params, args.len(), span);
        args.truncate(params.len());
        for &param in &params[args.len()..] {
            let default = self
                .symbol(param)
                .decls
                .first()
                .cloned()
                .and_then(TypeParam::cast)
                .and_then(|tp| tp.default_type());
            let ty = match default {
                Some(default) => self.type_from_node(&default),
                None => TypeId::ANY,
            };
            args.push(ty);
        }
        args
    }

    /// `this` in a type position: the enclosing class or interface.
    fn this_type(&mut self, node: &SyntaxNode) -> TypeId {
        let owner = node
            .ancestors()
            .find(|a| matches!(a.kind(), SyntaxKind::CLASS_DECL | SyntaxKind::INTERFACE_DECL));
        let Some(owner) = owner else {
            return TypeId::ANY;
        };
        match self.declarations.get(&self.key(&owner)).copied() {
            Some(sym) => self.declared_type(sym),
            None => TypeId::ANY,
        }
    }

    // ── Constructors of types ──────────────────────────────────────────

    /// Flattened, de-duplicated union in first-seen order.
    pub(super) fn union(&mut self, types: Vec<TypeId>) -> TypeId {
        let mut flat: Vec<TypeId> = Vec::with_capacity(types.len());
        for ty in types {
            let parts = match self.type_data(ty) {
                TypeData::Union(members) => members.clone(),
                TypeData::Never => Vec::new(),
                _ => vec![ty],
            };
            for part in parts {
                if part == TypeId::ANY {
                    return TypeId::ANY;
                }
                if !flat.contains(&part) {
                    flat.push(part);
                }
            }
        }
        match flat.len() {
            0 => TypeId::NEVER,
            1 => flat[0],
            _ => self.intern(TypeData::Union(flat)),
        }
    }

    /// `elem[]`, as a reference to the prelude's `Array<T>`.
    pub(super) fn array_of(&mut self, elem: TypeId) -> TypeId {
        match self.array_symbol {
            Some(array) => {
                let target = self.declared_type(array);
                self.reference(target, vec![elem])
            }
            None => TypeId::ANY,
        }
    }

    /// A generic class or interface applied to `args`. Applying the
    /// declaration's own type parameters gives the declared type back.
    pub(super) fn reference(&mut self, target: TypeId, args: Vec<TypeId>) -> TypeId {
        let Some(obj) = self.object(target) else {
            return target;
        };
        let params = obj.type_params.clone();
        let symbol = obj.symbol;
        if params.is_empty() {
            return target;
        }
        let own: Vec<TypeId> = params
            .iter()
            .map(|&p| self.intern(TypeData::TypeParam(p)))
            .collect();
        if own == args {
            return target;
        }
        if let Some(&cached) = self.references.get(&(target, args.clone())) {
            return cached;
        }
        let mut reference = ObjectType::new(ObjectKind::Reference, symbol);
        reference.target = Some(target);
        reference.type_arguments = args.clone();
        let ty = self.alloc_type(TypeData::Object(reference));
        self.references.insert((target, args), ty);
        ty
    }

    /// Member symbols of a type, resolving a reference's members on first
    /// use.
    pub(crate) fn members_of(&mut self, ty: TypeId) -> Vec<SymbolId> {
        let Some(obj) = self.object(ty) else {
            return Vec::new();
        };
        if obj.members_resolved {
            return obj.members.clone();
        }
        let (Some(target), args) = (obj.target, obj.type_arguments.clone()) else {
            return Vec::new();
        };
        if let Some(obj) = self.object_mut(ty) {
            obj.members_resolved = true;
        }

        let params = self
            .object(target)
            .map(|o| o.type_params.clone())
            .unwrap_or_default();
        let mapper = self.mapper(params, args);
        let generic_members = self.members_of(target);
        let members: Vec<SymbolId> = generic_members
            .into_iter()
            .map(|m| self.transient(m, mapper))
            .collect();
        let string_index = match self.object(target).and_then(|o| o.string_index) {
            Some(index) => Some(self.instantiate(index, mapper)),
            None => None,
        };
        if let Some(obj) = self.object_mut(ty) {
            obj.members = members.clone();
            obj.string_index = string_index;
        }
        members
    }

    /// A copy of `sym` whose type is instantiated through `mapper`.
    fn transient(&mut self, sym: SymbolId, mapper: MapperId) -> SymbolId {
        if let Some(&cached) = self.transients.get(&(sym, mapper)) {
            return cached;
        }
        let original = self.symbol(sym);
        let copy = Symbol {
            name: original.name.clone(),
            kind: original.kind,
            decls: original.decls.clone(),
            is_optional: original.is_optional,
            origin: Some((sym, mapper)),
        };
        let id = self.alloc_symbol(copy);
        self.transients.insert((sym, mapper), id);
        id
    }

    pub(super) fn instantiate(&mut self, ty: TypeId, mapper: MapperId) -> TypeId {
        if let Some(&cached) = self.instantiations.get(&(ty, mapper)) {
            return cached;
        }
        let result = match self.type_data(ty).clone() {
            TypeData::TypeParam(param) => self.mappers[mapper.0 as usize].get(param).unwrap_or(ty),
            TypeData::Union(members) => {
                let mapped = members.into_iter().map(|m| self.instantiate(m, mapper)).collect();
                self.union(mapped)
            }
            TypeData::Object(obj) => match obj.kind {
                ObjectKind::Reference => {
                    let args: Vec<TypeId> = obj
                        .type_arguments
                        .iter()
                        .map(|&a| self.instantiate(a, mapper))
                        .collect();
                    match obj.target {
                        Some(target) if args != obj.type_arguments => self.reference(target, args),
                        _ => ty,
                    }
                }
                ObjectKind::Class | ObjectKind::Interface => {
                    if obj.type_params.is_empty() {
                        ty
                    } else {
                        let args = obj
                            .type_params
                            .iter()
                            .map(|&p| {
                                let param = self.intern(TypeData::TypeParam(p));
                                self.instantiate(param, mapper)
                            })
                            .collect();
                        self.reference(ty, args)
                    }
                }
                ObjectKind::Anonymous | ObjectKind::Constructor => {
                    self.instantiate_object(ty, obj, mapper)
                }
            },
            _ => ty,
        };
        self.instantiations.insert((ty, mapper), result);
        result
    }

    fn instantiate_object(&mut self, ty: TypeId, obj: ObjectType, mapper: MapperId) -> TypeId {
        let placeholder = ObjectType::new(obj.kind, obj.symbol);
        let copy = self.alloc_type(TypeData::Object(placeholder));
        // Registered first so a member mentioning the object itself ends
        // up at the copy.
        self.instantiations.insert((ty, mapper), copy);

        let members = obj.members.iter().map(|&m| self.transient(m, mapper)).collect();
        let call_signatures = obj
            .call_signatures
            .iter()
            .map(|&s| self.instantiate_signature(s, mapper))
            .collect();
        let construct_signatures = obj
            .construct_signatures
            .iter()
            .map(|&s| self.instantiate_signature(s, mapper))
            .collect();
        let string_index = obj.string_index.map(|i| self.instantiate(i, mapper));
        if let Some(target) = self.object_mut(copy) {
            target.members = members;
            target.call_signatures = call_signatures;
            target.construct_signatures = construct_signatures;
            target.string_index = string_index;
            target.type_params = obj.type_params;
        }
        copy
    }

    pub(super) fn instantiate_signature(&mut self, sig: SignatureId, mapper: MapperId) -> SignatureId {
        if let Some(&cached) = self.signature_instances.get(&(sig, mapper)) {
            return cached;
        }
        let original = self.signature(sig).clone();
        let sources = self.mappers[mapper.0 as usize].sources.clone();
        let params = original
            .params
            .iter()
            .map(|&p| self.transient(p, mapper))
            .collect();
        let instance = self.alloc_signature(Signature {
            type_params: original
                .type_params
                .into_iter()
                .filter(|p| !sources.contains(p))
                .collect(),
            params,
            decl: original.decl,
            return_type: None,
            target: Some((sig, mapper)),
            constructs: original.constructs,
        });
        self.signature_instances.insert((sig, mapper), instance);
        instance
    }
}
