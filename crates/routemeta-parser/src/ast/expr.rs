//! Typed AST nodes for expressions.

use crate::ast::item::{Block, Name, NameRef, ParamList, TypeAnnotation, TypeParamList};
use crate::ast::ty::{Type, TypeArgList};
use crate::ast::{child_node, child_nodes, child_token, is_async, AstNode};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

ast_enum! {
    /// Any expression.
    Expr {
        Literal(Literal) = LITERAL,
        NameRef(NameRef) = NAME_REF,
        This(ThisExpr) = THIS_EXPR,
        Paren(ParenExpr) = PAREN_EXPR,
        Object(ObjectLiteral) = OBJECT_LITERAL,
        Array(ArrayLiteral) = ARRAY_LITERAL,
        Arrow(ArrowFunction) = ARROW_FUNCTION,
        Function(FunctionExpr) = FUNCTION_EXPR,
        Call(CallExpr) = CALL_EXPR,
        New(NewExpr) = NEW_EXPR,
        PropertyAccess(PropertyAccess) = PROPERTY_ACCESS,
        Index(IndexExpr) = INDEX_EXPR,
        Prefix(PrefixExpr) = PREFIX_EXPR,
        Binary(BinaryExpr) = BINARY_EXPR,
        Conditional(ConditionalExpr) = CONDITIONAL_EXPR,
        Assign(AssignExpr) = ASSIGN_EXPR,
        As(AsExpr) = AS_EXPR,
    }
}

impl Expr {
    /// Strip any number of enclosing parentheses.
    pub fn skip_parens(self) -> Expr {
        let mut expr = self;
        while let Expr::Paren(paren) = &expr {
            match paren.expr() {
                Some(inner) => expr = inner,
                None => break,
            }
        }
        expr
    }
}

/// First significant token directly under `node`.
fn first_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| !t.kind().is_trivia())
}

// ── Atoms ────────────────────────────────────────────────────────────────

ast_node!(Literal, LITERAL);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Number,
    String,
    True,
    False,
    Null,
}

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        first_token(&self.syntax)
    }

    pub fn kind(&self) -> Option<LiteralKind> {
        let kind = match self.token()?.kind() {
            SyntaxKind::NUMBER_LITERAL => LiteralKind::Number,
            SyntaxKind::STRING_LITERAL => LiteralKind::String,
            SyntaxKind::TRUE_KW => LiteralKind::True,
            SyntaxKind::FALSE_KW => LiteralKind::False,
            SyntaxKind::NULL_KW => LiteralKind::Null,
            _ => return None,
        };
        Some(kind)
    }
}

ast_node!(ThisExpr, THIS_EXPR);

ast_node!(ParenExpr, PAREN_EXPR);

impl ParenExpr {
    pub fn expr(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

// ── Object and Array Literals ────────────────────────────────────────────

ast_node!(ObjectLiteral, OBJECT_LITERAL);

impl ObjectLiteral {
    pub fn members(&self) -> impl Iterator<Item = ObjectMember> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_enum! {
    ObjectMember {
        Property(PropertyAssignment) = PROPERTY_ASSIGNMENT,
        Shorthand(ShorthandProperty) = SHORTHAND_PROPERTY,
        Spread(SpreadElement) = SPREAD_ELEMENT,
    }
}

ast_node!(PropertyAssignment, PROPERTY_ASSIGNMENT);

impl PropertyAssignment {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn value(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(ShorthandProperty, SHORTHAND_PROPERTY);

impl ShorthandProperty {
    pub fn name_ref(&self) -> Option<NameRef> {
        child_node(&self.syntax)
    }
}

ast_node!(SpreadElement, SPREAD_ELEMENT);

impl SpreadElement {
    pub fn expr(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

/// An array element or call argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Element {
    Expr(Expr),
    Spread(SpreadElement),
}

impl Element {
    fn cast(node: SyntaxNode) -> Option<Self> {
        if node.kind() == SyntaxKind::SPREAD_ELEMENT {
            return SpreadElement::cast(node).map(Element::Spread);
        }
        Expr::cast(node).map(Element::Expr)
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Element::Expr(e) => e.syntax(),
            Element::Spread(s) => s.syntax(),
        }
    }
}

ast_node!(ArrayLiteral, ARRAY_LITERAL);

impl ArrayLiteral {
    pub fn elements(&self) -> impl Iterator<Item = Element> + '_ {
        self.syntax.children().filter_map(Element::cast)
    }
}

// ── Functions ────────────────────────────────────────────────────────────

/// Body of an arrow function: a block or a bare expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrowBody {
    Block(Block),
    Expr(Expr),
}

ast_node!(ArrowFunction, ARROW_FUNCTION);

impl ArrowFunction {
    pub fn is_async(&self) -> bool {
        is_async(&self.syntax)
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

    pub fn body(&self) -> Option<ArrowBody> {
        let last = self.syntax.children().last()?;
        if let Some(block) = Block::cast(last.clone()) {
            return Some(ArrowBody::Block(block));
        }
        Expr::cast(last).map(ArrowBody::Expr)
    }
}

ast_node!(FunctionExpr, FUNCTION_EXPR);

impl FunctionExpr {
    pub fn is_async(&self) -> bool {
        is_async(&self.syntax)
    }

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

    pub fn body(&self) -> Option<Block> {
        child_node(&self.syntax)
    }
}

// ── Calls and Member Access ──────────────────────────────────────────────

ast_node!(CallExpr, CALL_EXPR);

impl CallExpr {
    pub fn callee(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    /// Explicit type arguments: `f<A, B>(...)`.
    pub fn type_arg_list(&self) -> Option<TypeArgList> {
        child_node(&self.syntax)
    }

    pub fn arg_list(&self) -> Option<ArgList> {
        child_node(&self.syntax)
    }

    pub fn args(&self) -> Vec<Element> {
        self.arg_list()
            .map(|list| list.args().collect())
            .unwrap_or_default()
    }
}

ast_node!(ArgList, ARG_LIST);

impl ArgList {
    pub fn args(&self) -> impl Iterator<Item = Element> + '_ {
        self.syntax.children().filter_map(Element::cast)
    }

    pub fn l_paren(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::L_PAREN)
    }

    pub fn r_paren(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::R_PAREN)
    }
}

ast_node!(NewExpr, NEW_EXPR);

impl NewExpr {
    pub fn callee(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn type_arg_list(&self) -> Option<TypeArgList> {
        child_node(&self.syntax)
    }

    pub fn arg_list(&self) -> Option<ArgList> {
        child_node(&self.syntax)
    }
}

ast_node!(PropertyAccess, PROPERTY_ACCESS);

impl PropertyAccess {
    pub fn receiver(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    /// The member name token after `.`; keywords are allowed.
    pub fn name_token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| t.kind() == SyntaxKind::IDENT || t.kind().is_keyword())
            .last()
    }

    pub fn name(&self) -> Option<String> {
        self.name_token().map(|t| t.text().to_string())
    }

    pub fn is_optional(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::QUESTION_DOT).is_some()
    }
}

ast_node!(IndexExpr, INDEX_EXPR);

impl IndexExpr {
    pub fn receiver(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn index(&self) -> Option<Expr> {
        child_nodes(&self.syntax).nth(1)
    }
}

// ── Operators ────────────────────────────────────────────────────────────

ast_node!(PrefixExpr, PREFIX_EXPR);

impl PrefixExpr {
    pub fn op(&self) -> Option<SyntaxKind> {
        first_token(&self.syntax).map(|t| t.kind())
    }

    pub fn operand(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(BinaryExpr, BINARY_EXPR);

impl BinaryExpr {
    pub fn lhs(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn rhs(&self) -> Option<Expr> {
        child_nodes(&self.syntax).nth(1)
    }

    /// The operator: the only significant token directly under the node.
    pub fn op(&self) -> Option<SyntaxKind> {
        first_token(&self.syntax).map(|t| t.kind())
    }
}

ast_node!(ConditionalExpr, CONDITIONAL_EXPR);

impl ConditionalExpr {
    pub fn condition(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn then_branch(&self) -> Option<Expr> {
        child_nodes(&self.syntax).nth(1)
    }

    pub fn else_branch(&self) -> Option<Expr> {
        child_nodes(&self.syntax).nth(2)
    }
}

ast_node!(AssignExpr, ASSIGN_EXPR);

impl AssignExpr {
    pub fn lhs(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn rhs(&self) -> Option<Expr> {
        child_nodes(&self.syntax).nth(1)
    }
}

ast_node!(AsExpr, AS_EXPR);

impl AsExpr {
    pub fn expr(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}
