//! Typed AST nodes for statements, declarations and class members.
//!
//! Covers: SourceFile, Stmt, TypeAliasDecl, InterfaceDecl, ClassDecl,
//! ClassMember, FunctionDecl, VarStmt, VarDeclarator, ObjectBindingPattern,
//! BindingElement, ExportDefault, Block, ReturnStmt, IfStmt, ExprStmt, and
//! the shared Name, NameRef, ParamList, Param, TypeAnnotation and
//! TypeParamList pieces.

use crate::ast::expr::Expr;
use crate::ast::ty::{IndexSignature, Type, TypeLiteral};
use crate::ast::{child_node, child_nodes, child_token, has_modifier, AstNode};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

// ── Source File ──────────────────────────────────────────────────────────

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    /// Wrap a parse root. `parse()` always produces a SOURCE_FILE root.
    pub(crate) fn cast_root(node: SyntaxNode) -> Self {
        debug_assert_eq!(node.kind(), SyntaxKind::SOURCE_FILE);
        Self { syntax: node }
    }

    /// Top-level statements in source order.
    pub fn stmts(&self) -> impl Iterator<Item = Stmt> {
        self.syntax
            .children()
            .filter(|n| n.kind() == SyntaxKind::STMT_LIST)
            .flat_map(|list| list.children())
            .filter_map(Stmt::cast)
    }
}

ast_enum! {
    /// Anything in statement position.
    Stmt {
        TypeAlias(TypeAliasDecl) = TYPE_ALIAS_DECL,
        Interface(InterfaceDecl) = INTERFACE_DECL,
        Class(ClassDecl) = CLASS_DECL,
        Function(FunctionDecl) = FUNCTION_DECL,
        Var(VarStmt) = VAR_STMT,
        ExportDefault(ExportDefault) = EXPORT_DEFAULT,
        Expr(ExprStmt) = EXPR_STMT,
        Return(ReturnStmt) = RETURN_STMT,
        If(IfStmt) = IF_STMT,
        Block(Block) = BLOCK,
        Empty(EmptyStmt) = EMPTY_STMT,
    }
}

// ── Names ────────────────────────────────────────────────────────────────

ast_node!(Name, NAME);

impl Name {
    /// The name token: identifier, keyword, string or number.
    pub fn token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| !t.kind().is_trivia())
    }

    /// The name as written; string-literal keys lose their quotes.
    pub fn text(&self) -> String {
        match self.token() {
            Some(t) if t.kind() == SyntaxKind::STRING_LITERAL => unquote(t.text()).to_string(),
            Some(t) => t.text().to_string(),
            None => String::new(),
        }
    }
}

ast_node!(NameRef, NAME_REF);

impl NameRef {
    pub fn ident(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::IDENT)
    }

    pub fn text(&self) -> String {
        self.ident().map(|t| t.text().to_string()).unwrap_or_default()
    }
}

/// Strip one pair of matching quotes from a string literal's text.
pub fn unquote(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && matches!(first, b'"' | b'\'' | b'`') {
            return &text[1..text.len() - 1];
        }
    }
    text
}

// ── Type Aliases and Interfaces ──────────────────────────────────────────

ast_node!(TypeAliasDecl, TYPE_ALIAS_DECL);

impl TypeAliasDecl {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn type_param_list(&self) -> Option<TypeParamList> {
        child_node(&self.syntax)
    }

    /// The aliased type on the right of `=`.
    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

ast_node!(InterfaceDecl, INTERFACE_DECL);

impl InterfaceDecl {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn type_param_list(&self) -> Option<TypeParamList> {
        child_node(&self.syntax)
    }

    pub fn extends(&self) -> Option<ExtendsClause> {
        child_node(&self.syntax)
    }

    pub fn body(&self) -> Option<TypeLiteral> {
        child_node(&self.syntax)
    }
}

ast_node!(ExtendsClause, EXTENDS_CLAUSE);

impl ExtendsClause {
    pub fn types(&self) -> impl Iterator<Item = Type> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(ImplementsClause, IMPLEMENTS_CLAUSE);

// ── Classes ──────────────────────────────────────────────────────────────

ast_node!(ClassDecl, CLASS_DECL);

impl ClassDecl {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn type_param_list(&self) -> Option<TypeParamList> {
        child_node(&self.syntax)
    }

    pub fn extends(&self) -> Option<ExtendsClause> {
        child_node(&self.syntax)
    }

    pub fn body(&self) -> Option<ClassBody> {
        child_node(&self.syntax)
    }

    /// Members in declaration order; empty when the body is missing.
    pub fn members(&self) -> Vec<ClassMember> {
        self.body()
            .map(|b| child_nodes(&b.syntax).collect())
            .unwrap_or_default()
    }

    pub fn is_declare(&self) -> bool {
        has_modifier(&self.syntax, SyntaxKind::DECLARE_KW)
    }
}

ast_node!(ClassBody, CLASS_BODY);

ast_enum! {
    ClassMember {
        Property(PropertyDecl) = PROPERTY_DECL,
        Method(MethodDecl) = METHOD_DECL,
        Constructor(ConstructorDecl) = CONSTRUCTOR_DECL,
        Index(IndexSignature) = INDEX_SIGNATURE,
    }
}

ast_node!(PropertyDecl, PROPERTY_DECL);

impl PropertyDecl {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn is_static(&self) -> bool {
        has_modifier(&self.syntax, SyntaxKind::STATIC_KW)
    }

    pub fn is_optional(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::QUESTION).is_some()
    }

    pub fn annotation(&self) -> Option<TypeAnnotation> {
        child_node(&self.syntax)
    }

    pub fn initializer(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(MethodDecl, METHOD_DECL);

impl MethodDecl {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn is_static(&self) -> bool {
        has_modifier(&self.syntax, SyntaxKind::STATIC_KW)
    }

    pub fn type_param_list(&self) -> Option<TypeParamList> {
        child_node(&self.syntax)
    }

    pub fn param_list(&self) -> Option<ParamList> {
        child_node(&self.syntax)
    }

    /// The declared return type.
    pub fn return_type(&self) -> Option<TypeAnnotation> {
        child_node(&self.syntax)
    }

    pub fn body(&self) -> Option<Block> {
        child_node(&self.syntax)
    }
}

ast_node!(ConstructorDecl, CONSTRUCTOR_DECL);

impl ConstructorDecl {
    pub fn param_list(&self) -> Option<ParamList> {
        child_node(&self.syntax)
    }

    pub fn body(&self) -> Option<Block> {
        child_node(&self.syntax)
    }
}

// ── Functions and Variables ──────────────────────────────────────────────

ast_node!(FunctionDecl, FUNCTION_DECL);

impl FunctionDecl {
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

    /// `None` for `declare function f(): T;`.
    pub fn body(&self) -> Option<Block> {
        child_node(&self.syntax)
    }
}

ast_node!(VarStmt, VAR_STMT);

impl VarStmt {
    pub fn is_const(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::CONST_KW).is_some()
    }

    pub fn is_declare(&self) -> bool {
        has_modifier(&self.syntax, SyntaxKind::DECLARE_KW)
    }

    pub fn declarators(&self) -> impl Iterator<Item = VarDeclarator> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(VarDeclarator, VAR_DECLARATOR);

impl VarDeclarator {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn annotation(&self) -> Option<TypeAnnotation> {
        child_node(&self.syntax)
    }

    /// `{ a, b: c }` in place of a name.
    pub fn pattern(&self) -> Option<ObjectBindingPattern> {
        child_node(&self.syntax)
    }

    pub fn initializer(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    /// The enclosing VAR_STMT.
    pub fn stmt(&self) -> Option<VarStmt> {
        self.syntax.parent().and_then(VarStmt::cast)
    }
}

ast_node!(ObjectBindingPattern, OBJECT_BINDING_PATTERN);

impl ObjectBindingPattern {
    pub fn elements(&self) -> impl Iterator<Item = BindingElement> + '_ {
        child_nodes(&self.syntax)
    }

    pub fn declarator(&self) -> Option<VarDeclarator> {
        self.syntax.parent().and_then(VarDeclarator::cast)
    }
}

ast_node!(BindingElement, BINDING_ELEMENT);

impl BindingElement {
    /// The local binding: `b` in both `{ b }` and `{ a: b }`.
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    /// The explicit key of `{ a: b }`, if written.
    pub fn key_token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| !t.kind().is_trivia() && t.kind() != SyntaxKind::COLON)
    }

    /// The property read from the initializer.
    pub fn property_name(&self) -> String {
        match self.key_token() {
            Some(key) => key.text().to_string(),
            None => self.name().map(|n| n.text()).unwrap_or_default(),
        }
    }

    pub fn pattern(&self) -> Option<ObjectBindingPattern> {
        self.syntax.parent().and_then(ObjectBindingPattern::cast)
    }
}

ast_node!(ExportDefault, EXPORT_DEFAULT);

impl ExportDefault {
    pub fn expr(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

// ── Statements ───────────────────────────────────────────────────────────

ast_node!(ExprStmt, EXPR_STMT);

impl ExprStmt {
    pub fn expr(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(ReturnStmt, RETURN_STMT);

impl ReturnStmt {
    pub fn expr(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(IfStmt, IF_STMT);

impl IfStmt {
    pub fn condition(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    /// The `then` branch followed by the optional `else` branch.
    pub fn branches(&self) -> impl Iterator<Item = Stmt> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(Block, BLOCK);

impl Block {
    pub fn stmts(&self) -> impl Iterator<Item = Stmt> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(EmptyStmt, EMPTY_STMT);

// ── Parameters and Annotations ───────────────────────────────────────────

ast_node!(ParamList, PARAM_LIST);

impl ParamList {
    pub fn params(&self) -> impl Iterator<Item = Param> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(Param, PARAM);

impl Param {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn annotation(&self) -> Option<TypeAnnotation> {
        child_node(&self.syntax)
    }

    pub fn default_value(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn is_optional(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::QUESTION).is_some()
    }

    pub fn is_rest(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::DOT_DOT_DOT).is_some()
    }

    /// `public`/`private`/`protected`/`readonly` on a constructor parameter
    /// turns it into a property.
    pub fn is_parameter_property(&self) -> bool {
        [
            SyntaxKind::PUBLIC_KW,
            SyntaxKind::PRIVATE_KW,
            SyntaxKind::PROTECTED_KW,
            SyntaxKind::READONLY_KW,
        ]
        .into_iter()
        .any(|m| has_modifier(&self.syntax, m))
    }
}

ast_node!(TypeAnnotation, TYPE_ANNOTATION);

impl TypeAnnotation {
    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

ast_node!(TypeParamList, TYPE_PARAM_LIST);

impl TypeParamList {
    pub fn params(&self) -> impl Iterator<Item = TypeParam> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(TypeParam, TYPE_PARAM);

impl TypeParam {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    /// The `= Default` type, which follows the optional `extends` bound.
    pub fn default_type(&self) -> Option<Type> {
        let has_default = child_token(&self.syntax, SyntaxKind::EQ).is_some();
        if !has_default {
            return None;
        }
        self.syntax.children().filter_map(Type::cast).last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquote_strips_matching_quotes() {
        assert_eq!(unquote("\"a b\""), "a b");
        assert_eq!(unquote("'x'"), "x");
        assert_eq!(unquote("`t`"), "t");
        assert_eq!(unquote("\"mismatch'"), "\"mismatch'");
        assert_eq!(unquote("\""), "\"");
    }
}
