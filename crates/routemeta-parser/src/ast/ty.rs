//! Typed AST nodes for type syntax.

use crate::ast::item::{Name, NameRef, Param, ParamList, TypeAnnotation, TypeParamList};
use crate::ast::{child_node, child_nodes, child_token, has_modifier};
use crate::cst::SyntaxToken;
use crate::syntax_kind::SyntaxKind;

ast_enum! {
    /// Any type expression.
    Type {
        Ref(TypeRef) = TYPE_REF,
        Array(ArrayType) = ARRAY_TYPE,
        Union(UnionType) = UNION_TYPE,
        Object(TypeLiteral) = TYPE_LITERAL,
        Function(FunctionType) = FUNCTION_TYPE,
        Paren(ParenType) = PAREN_TYPE,
        This(ThisType) = THIS_TYPE,
        Literal(LiteralType) = LITERAL_TYPE,
        Predefined(PredefinedType) = PREDEFINED_TYPE,
    }
}

ast_node!(TypeRef, TYPE_REF);

impl TypeRef {
    pub fn name_ref(&self) -> Option<NameRef> {
        child_node(&self.syntax)
    }

    pub fn name(&self) -> String {
        self.name_ref().map(|n| n.text()).unwrap_or_default()
    }

    pub fn type_arg_list(&self) -> Option<TypeArgList> {
        child_node(&self.syntax)
    }

    pub fn type_args(&self) -> Vec<Type> {
        self.type_arg_list()
            .map(|list| list.types().collect())
            .unwrap_or_default()
    }
}

ast_node!(TypeArgList, TYPE_ARG_LIST);

impl TypeArgList {
    pub fn types(&self) -> impl Iterator<Item = Type> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(ArrayType, ARRAY_TYPE);

impl ArrayType {
    pub fn element(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

ast_node!(UnionType, UNION_TYPE);

impl UnionType {
    pub fn members(&self) -> impl Iterator<Item = Type> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(ParenType, PAREN_TYPE);

impl ParenType {
    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

ast_node!(ThisType, THIS_TYPE);

ast_node!(LiteralType, LITERAL_TYPE);

impl LiteralType {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| !t.kind().is_trivia())
    }
}

ast_node!(PredefinedType, PREDEFINED_TYPE);

impl PredefinedType {
    /// `VOID_KW` or `NULL_KW`.
    pub fn keyword(&self) -> Option<SyntaxKind> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .map(|t| t.kind())
            .find(|k| k.is_keyword())
    }
}

ast_node!(FunctionType, FUNCTION_TYPE);

impl FunctionType {
    pub fn type_param_list(&self) -> Option<TypeParamList> {
        child_node(&self.syntax)
    }

    pub fn param_list(&self) -> Option<ParamList> {
        child_node(&self.syntax)
    }

    /// The type after `=>`.
    pub fn return_type(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

// ── Object Type Literals ─────────────────────────────────────────────────

ast_node!(TypeLiteral, TYPE_LITERAL);

impl TypeLiteral {
    pub fn members(&self) -> impl Iterator<Item = TypeMember> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_enum! {
    TypeMember {
        Property(PropertySignature) = PROPERTY_SIGNATURE,
        Method(MethodSignature) = METHOD_SIGNATURE,
        Index(IndexSignature) = INDEX_SIGNATURE,
    }
}

ast_node!(PropertySignature, PROPERTY_SIGNATURE);

impl PropertySignature {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn is_optional(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::QUESTION).is_some()
    }

    pub fn is_readonly(&self) -> bool {
        has_modifier(&self.syntax, SyntaxKind::READONLY_KW)
    }

    pub fn annotation(&self) -> Option<TypeAnnotation> {
        child_node(&self.syntax)
    }
}

ast_node!(MethodSignature, METHOD_SIGNATURE);

impl MethodSignature {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn type_param_list(&self) -> Option<TypeParamList> {
        child_node(&self.syntax)
    }

    pub fn param_list(&self) -> Option<ParamList> {
        child_node(&self.syntax)
    }

    pub fn return_type(&self) -> Option<TypeAnnotation> {
        child_node(&self.syntax)
    }
}

ast_node!(IndexSignature, INDEX_SIGNATURE);

impl IndexSignature {
    /// The `key: string` part between the brackets.
    pub fn key(&self) -> Option<Param> {
        child_node(&self.syntax)
    }

    /// The value type after the brackets.
    pub fn annotation(&self) -> Option<TypeAnnotation> {
        child_node(&self.syntax)
    }
}
