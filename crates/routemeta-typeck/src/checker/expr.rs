//! Expression checking.
//!
//! Every expression type is memoized by node. Literals widen to their
//! primitive (`"a"` is `string`), so object literals get the property types a
//! declaration-site annotation would spell out. Calls apply explicit type
//! arguments, defaulting missing ones to `any`, and give unannotated
//! parameters of function arguments the parameter types of the expected
//! callback.

use routemeta_parser::ast::expr::{
    CallExpr, Element, Expr, LiteralKind, NewExpr, ObjectMember, PropertyAccess,
};
use routemeta_parser::ast::item::Param;
use routemeta_parser::ast::ty::Type;
use routemeta_parser::ast::AstNode;
use routemeta_parser::{SyntaxKind, SyntaxNode};

use crate::error::TypeError;
use crate::scope::Namespace;
use crate::ty::{ObjectKind, ObjectType, SignatureId, SymbolId, SymbolKind, TypeData, TypeId};

use super::{Checker, PendingError};

impl Checker {
    pub(crate) fn check_expr(&mut self, expr: &Expr) -> TypeId {
        let key = self.key(expr.syntax());
        if let Some(&ty) = self.node_types.get(&key) {
            return ty;
        }
        let ty = self.compute_expr(expr);
        *self.node_types.entry(key).or_insert(ty)
    }

    fn compute_expr(&mut self, expr: &Expr) -> TypeId {
        match expr {
            Expr::Literal(lit) => match lit.kind() {
                Some(LiteralKind::Number) => TypeId::NUMBER,
                Some(LiteralKind::String) => TypeId::STRING,
                Some(LiteralKind::True | LiteralKind::False) => TypeId::BOOLEAN,
                Some(LiteralKind::Null) => TypeId::NULL,
                None => TypeId::ANY,
            },
            Expr::NameRef(name_ref) => {
                let name = name_ref.text();
                match self.lookup(name_ref.syntax(), Namespace::Value, &name) {
                    Some(sym) => {
                        let key = self.key(name_ref.syntax());
                        self.resolutions.insert(key, sym);
                        self.type_of_symbol(sym)
                    }
                    None => match name.as_str() {
                        "undefined" => TypeId::UNDEFINED,
                        "NaN" | "Infinity" => TypeId::NUMBER,
                        _ => {
                            let span = name_ref.syntax().text_range();
                            self.error(
                                name_ref.syntax(),
                                PendingError::Ready(TypeError::UnresolvedName { name, span }),
                            );
                            TypeId::ANY
                        }
                    },
                }
            }
            Expr::This(this) => self.this_value(this.syntax()),
            Expr::Paren(paren) => match paren.expr() {
                Some(inner) => self.check_expr(&inner),
                None => TypeId::ANY,
            },
            Expr::Object(object) => {
                let mut obj = ObjectType::new(ObjectKind::Anonymous, None);
                for member in object.members() {
                    match member {
                        ObjectMember::Property(prop) => {
                            let name = prop.name().map(|n| n.text()).unwrap_or_default();
                            let sym = self.member_symbol(name, SymbolKind::Property, prop.syntax(), false);
                            self.set_member(&mut obj.members, sym);
                        }
                        ObjectMember::Shorthand(short) => {
                            let name = short.name_ref().map(|n| n.text()).unwrap_or_default();
                            let sym = self.member_symbol(name, SymbolKind::Property, short.syntax(), false);
                            self.set_member(&mut obj.members, sym);
                        }
                        ObjectMember::Spread(spread) => {
                            let spread_ty = match spread.expr() {
                                Some(inner) => self.check_expr(&inner),
                                None => TypeId::ANY,
                            };
                            for sym in self.members_of(spread_ty) {
                                self.set_member(&mut obj.members, sym);
                            }
                        }
                    }
                }
                self.alloc_type(TypeData::Object(obj))
            }
            Expr::Array(array) => {
                let mut elems = Vec::new();
                for element in array.elements() {
                    let ty = match element {
                        Element::Expr(e) => self.check_expr(&e),
                        Element::Spread(spread) => {
                            let spread_ty = match spread.expr() {
                                Some(inner) => self.check_expr(&inner),
                                None => TypeId::ANY,
                            };
                            self.array_element(spread_ty).unwrap_or(TypeId::ANY)
                        }
                    };
                    elems.push(ty);
                }
                let elem = if elems.is_empty() {
                    TypeId::ANY
                } else {
                    self.union(elems)
                };
                self.array_of(elem)
            }
            Expr::Arrow(arrow) => self.function_object(&[arrow.syntax().clone()]),
            Expr::Function(func) => self.function_object(&[func.syntax().clone()]),
            Expr::Call(call) => self.check_call(call),
            Expr::New(new) => self.check_new(new),
            Expr::PropertyAccess(access) => self.check_property_access(access),
            Expr::Index(index) => {
                let receiver = match index.receiver() {
                    Some(r) => self.check_expr(&r),
                    None => TypeId::ANY,
                };
                if let Some(i) = index.index() {
                    self.check_expr(&i);
                }
                if receiver == TypeId::STRING {
                    return TypeId::STRING;
                }
                if let Some(elem) = self.array_element(receiver) {
                    return elem;
                }
                self.members_of(receiver);
                self.object(receiver)
                    .and_then(|o| o.string_index)
                    .unwrap_or(TypeId::ANY)
            }
            Expr::Prefix(prefix) => {
                if let Some(operand) = prefix.operand() {
                    self.check_expr(&operand);
                }
                match prefix.op() {
                    Some(SyntaxKind::BANG) => TypeId::BOOLEAN,
                    Some(SyntaxKind::MINUS | SyntaxKind::PLUS) => TypeId::NUMBER,
                    Some(SyntaxKind::TYPEOF_KW) => TypeId::STRING,
                    Some(SyntaxKind::VOID_KW) => TypeId::UNDEFINED,
                    _ => TypeId::ANY,
                }
            }
            Expr::Binary(binary) => {
                let lhs = match binary.lhs() {
                    Some(e) => self.check_expr(&e),
                    None => TypeId::ANY,
                };
                let rhs = match binary.rhs() {
                    Some(e) => self.check_expr(&e),
                    None => TypeId::ANY,
                };
                match binary.op() {
                    Some(SyntaxKind::PLUS) => {
                        if lhs == TypeId::STRING || rhs == TypeId::STRING {
                            TypeId::STRING
                        } else if lhs == TypeId::NUMBER && rhs == TypeId::NUMBER {
                            TypeId::NUMBER
                        } else {
                            TypeId::ANY
                        }
                    }
                    Some(SyntaxKind::MINUS | SyntaxKind::STAR | SyntaxKind::SLASH | SyntaxKind::PERCENT) => {
                        TypeId::NUMBER
                    }
                    Some(
                        SyntaxKind::EQ_EQ
                        | SyntaxKind::EQ_EQ_EQ
                        | SyntaxKind::NOT_EQ
                        | SyntaxKind::NOT_EQ_EQ
                        | SyntaxKind::LT
                        | SyntaxKind::GT
                        | SyntaxKind::LT_EQ
                        | SyntaxKind::GT_EQ,
                    ) => TypeId::BOOLEAN,
                    Some(SyntaxKind::AMP_AMP) => rhs,
                    Some(SyntaxKind::PIPE_PIPE | SyntaxKind::QUESTION_QUESTION) => {
                        self.union(vec![lhs, rhs])
                    }
                    _ => TypeId::ANY,
                }
            }
            Expr::Conditional(cond) => {
                if let Some(c) = cond.condition() {
                    self.check_expr(&c);
                }
                let then_ty = match cond.then_branch() {
                    Some(e) => self.check_expr(&e),
                    None => TypeId::ANY,
                };
                let else_ty = match cond.else_branch() {
                    Some(e) => self.check_expr(&e),
                    None => TypeId::ANY,
                };
                self.union(vec![then_ty, else_ty])
            }
            Expr::Assign(assign) => {
                if let Some(lhs) = assign.lhs() {
                    self.check_expr(&lhs);
                }
                match assign.rhs() {
                    Some(rhs) => self.check_expr(&rhs),
                    None => TypeId::ANY,
                }
            }
            Expr::As(as_expr) => {
                if let Some(inner) = as_expr.expr() {
                    self.check_expr(&inner);
                }
                match as_expr.ty() {
                    Some(ty) => self.type_from_node(&ty),
                    None => TypeId::ANY,
                }
            }
        }
    }

    /// Add `sym` to an object literal's members; a later property with the
    /// same name replaces the earlier one in place.
    fn set_member(&mut self, members: &mut Vec<SymbolId>, sym: SymbolId) {
        let name = &self.symbol(sym).name;
        match members.iter().position(|&m| &self.symbol(m).name == name) {
            Some(i) => members[i] = sym,
            None => members.push(sym),
        }
    }

    /// `T` for `T[]`.
    fn array_element(&self, ty: TypeId) -> Option<TypeId> {
        let obj = self.object(ty)?;
        let target = obj.target?;
        let array = self.array_symbol?;
        if self.object(target).and_then(|t| t.symbol) == Some(array) {
            obj.type_arguments.first().copied()
        } else {
            None
        }
    }

    /// `this` in an expression: the instance type of the enclosing class,
    /// looking through arrow functions.
    fn this_value(&mut self, node: &SyntaxNode) -> TypeId {
        for ancestor in node.ancestors().skip(1) {
            match ancestor.kind() {
                SyntaxKind::FUNCTION_EXPR | SyntaxKind::FUNCTION_DECL => return TypeId::ANY,
                SyntaxKind::CLASS_DECL => {
                    let key = self.key(&ancestor);
                    return match self.declarations.get(&key).copied() {
                        Some(sym) => self.declared_type(sym),
                        None => TypeId::ANY,
                    };
                }
                _ => {}
            }
        }
        TypeId::ANY
    }

    // ── Calls ──────────────────────────────────────────────────────────

    fn check_call(&mut self, call: &CallExpr) -> TypeId {
        let callee_ty = match call.callee() {
            Some(callee) => self.check_expr(&callee),
            None => TypeId::ANY,
        };
        let args = call.args();
        let explicit: Vec<Type> = call
            .type_arg_list()
            .map(|list| list.types().collect())
            .unwrap_or_default();

        let sig = self.call_signatures(callee_ty).first().copied();
        let Some(sig) = sig else {
            self.check_args(&args);
            if !matches!(callee_ty, TypeId::ANY | TypeId::UNKNOWN) && !self.is_type_param(callee_ty) {
                let span = call
                    .callee()
                    .map(|c| c.syntax().text_range())
                    .unwrap_or_else(|| call.syntax().text_range());
                self.error(call.syntax(), PendingError::NotCallable { ty: callee_ty, span });
            }
            return TypeId::ANY;
        };

        let sig = self.apply_type_args(sig, &explicit);
        self.contextually_type_args(sig, &args);
        self.check_args(&args);
        self.return_type(sig)
    }

    fn check_new(&mut self, new: &NewExpr) -> TypeId {
        let callee = new.callee();
        let callee_ty = match &callee {
            Some(callee) => self.check_expr(callee),
            None => TypeId::ANY,
        };
        let args: Vec<Element> = new
            .arg_list()
            .map(|list| list.args().collect())
            .unwrap_or_default();
        let explicit: Vec<Type> = new
            .type_arg_list()
            .map(|list| list.types().collect())
            .unwrap_or_default();

        let sig = self
            .object(callee_ty)
            .and_then(|o| o.construct_signatures.first().copied());
        if let Some(sig) = sig {
            let sig = self.apply_type_args(sig, &explicit);
            self.contextually_type_args(sig, &args);
            self.check_args(&args);
            return self.return_type(sig);
        }
        self.check_args(&args);

        // `new Array<T>()` and friends: a value without construct
        // signatures whose name also names a generic type.
        if let Some(Expr::NameRef(name_ref)) = &callee {
            if let Some(sym) = self.lookup(name_ref.syntax(), Namespace::Type, &name_ref.text()) {
                if matches!(self.symbol(sym).kind, SymbolKind::Class | SymbolKind::Interface) {
                    let declared = self.declared_type(sym);
                    let params = self.declared_type_params(sym);
                    let mut targs: Vec<TypeId> =
                        explicit.iter().map(|t| self.type_from_node(t)).collect();
                    targs.resize(params.len(), TypeId::ANY);
                    return self.reference(declared, targs);
                }
            }
        }
        if callee_ty != TypeId::ANY {
            let span = callee
                .map(|c| c.syntax().text_range())
                .unwrap_or_else(|| new.syntax().text_range());
            self.error(new.syntax(), PendingError::NotConstructable { ty: callee_ty, span });
        }
        TypeId::ANY
    }

    pub(super) fn call_signatures(&mut self, ty: TypeId) -> Vec<SignatureId> {
        self.members_of(ty);
        self.object(ty)
            .map(|o| o.call_signatures.clone())
            .unwrap_or_default()
    }

    fn is_type_param(&self, ty: TypeId) -> bool {
        matches!(self.type_data(ty), TypeData::TypeParam(_))
    }

    /// Substitute a generic signature's type parameters by the explicit
    /// type arguments, `any` for those not given.
    fn apply_type_args(&mut self, sig: SignatureId, explicit: &[Type]) -> SignatureId {
        let params = self.signature(sig).type_params.clone();
        if params.is_empty() {
            return sig;
        }
        let mut args: Vec<TypeId> = explicit.iter().map(|t| self.type_from_node(t)).collect();
        args.resize(params.len(), TypeId::ANY);
        let mapper = self.mapper(params, args);
        self.instantiate_signature(sig, mapper)
    }

    /// Unannotated parameters of function literals passed as arguments take
    /// their types from the matching callback parameter.
    fn contextually_type_args(&mut self, sig: SignatureId, args: &[Element]) {
        let params = self.signature(sig).params.clone();
        for (arg, &param) in args.iter().zip(params.iter()) {
            let Element::Expr(arg) = arg else {
                continue;
            };
            let function = arg.clone().skip_parens();
            if !matches!(function, Expr::Arrow(_) | Expr::Function(_)) {
                continue;
            }
            let expected = self.type_of_symbol(param);
            let Some(&callback) = self.call_signatures(expected).first() else {
                continue;
            };
            let callback_params = self.signature(callback).params.clone();
            let literal_params: Vec<Param> = function
                .syntax()
                .children()
                .filter(|n| n.kind() == SyntaxKind::PARAM_LIST)
                .flat_map(|list| list.children())
                .filter_map(Param::cast)
                .collect();
            for (literal, &expected_param) in literal_params.iter().zip(callback_params.iter()) {
                if literal.annotation().is_some() || literal.default_value().is_some() {
                    continue;
                }
                let key = self.key(literal.syntax());
                if self.contextual.contains_key(&key) {
                    continue;
                }
                let ty = self.type_of_symbol(expected_param);
                self.contextual.insert(key, ty);
            }
        }
    }

    fn check_args(&mut self, args: &[Element]) {
        for arg in args {
            match arg {
                Element::Expr(e) => {
                    self.check_expr(e);
                }
                Element::Spread(spread) => {
                    if let Some(inner) = spread.expr() {
                        self.check_expr(&inner);
                    }
                }
            }
        }
    }

    // ── Property access ────────────────────────────────────────────────

    fn check_property_access(&mut self, access: &PropertyAccess) -> TypeId {
        let receiver = match access.receiver() {
            Some(r) => self.check_expr(&r),
            None => TypeId::ANY,
        };
        let Some(name) = access.name() else {
            return TypeId::ANY;
        };
        match self.property_type(receiver, &name) {
            PropertyLookup::Found(sym, ty) => {
                if let Some(sym) = sym {
                    let key = self.key(access.syntax());
                    self.resolutions.insert(key, sym);
                }
                ty
            }
            PropertyLookup::Lenient => TypeId::ANY,
            PropertyLookup::Missing => {
                let span = access
                    .name_token()
                    .map(|t| t.text_range())
                    .unwrap_or_else(|| access.syntax().text_range());
                self.error(
                    access.syntax(),
                    PendingError::UnknownProperty {
                        ty: receiver,
                        name,
                        span,
                    },
                );
                TypeId::ANY
            }
        }
    }

    pub(super) fn property_type(&mut self, receiver: TypeId, name: &str) -> PropertyLookup {
        let apparent = match self.type_data(receiver) {
            TypeData::String | TypeData::StringLiteral(_) => match self.string_symbol {
                Some(string) => self.declared_type(string),
                None => return PropertyLookup::Lenient,
            },
            TypeData::Union(members) => {
                let members = members.clone();
                let mut types = Vec::with_capacity(members.len());
                for member in members {
                    match self.property_type(member, name) {
                        PropertyLookup::Found(_, ty) => types.push(ty),
                        PropertyLookup::Lenient => types.push(TypeId::ANY),
                        PropertyLookup::Missing => return PropertyLookup::Missing,
                    }
                }
                let ty = self.union(types);
                return PropertyLookup::Found(None, ty);
            }
            TypeData::Object(_) => receiver,
            _ => return PropertyLookup::Lenient,
        };

        let members = self.members_of(apparent);
        if let Some(sym) = members.into_iter().find(|&m| self.symbol(m).name == name) {
            let ty = self.type_of_symbol(sym);
            return PropertyLookup::Found(Some(sym), ty);
        }
        match self.object(apparent).and_then(|o| o.string_index) {
            Some(index) => PropertyLookup::Found(None, index),
            None => PropertyLookup::Missing,
        }
    }
}

pub(super) enum PropertyLookup {
    /// The member symbol (absent for index signatures and unions) and the
    /// property's type.
    Found(Option<SymbolId>, TypeId),
    /// The receiver has no known member table; the access is `any`.
    Lenient,
    Missing,
}
