//! Statement and declaration parsers.
//!
//! Covers type aliases, interfaces, classes and their members, functions,
//! variable statements, `export default`, control flow and blocks, plus the
//! parameter and type-parameter lists shared with expressions and types.
//! Semicolons are optional everywhere a statement ends.

use routemeta_common::span::Span;

use crate::syntax_kind::SyntaxKind;

use super::{expressions, types, MarkOpened, Parser};

// ── Statements ───────────────────────────────────────────────────────────

pub(crate) fn stmt(p: &mut Parser) {
    match p.current() {
        SyntaxKind::EXPORT_KW if p.nth(1) == SyntaxKind::DEFAULT_KW => export_default(p),
        SyntaxKind::EXPORT_KW | SyntaxKind::DECLARE_KW => {
            let m = p.open();
            modifiers(p, &[SyntaxKind::EXPORT_KW, SyntaxKind::DECLARE_KW]);
            declaration(p, m);
        }
        SyntaxKind::TYPE_KW
        | SyntaxKind::INTERFACE_KW
        | SyntaxKind::CLASS_KW
        | SyntaxKind::CONST_KW
        | SyntaxKind::LET_KW
        | SyntaxKind::VAR_KW => {
            let m = p.open();
            declaration(p, m);
        }
        SyntaxKind::FUNCTION_KW if p.nth(1) == SyntaxKind::IDENT => {
            let m = p.open();
            declaration(p, m);
        }
        SyntaxKind::RETURN_KW => return_stmt(p),
        SyntaxKind::IF_KW => if_stmt(p),
        SyntaxKind::L_BRACE => block(p),
        SyntaxKind::SEMICOLON => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::EMPTY_STMT);
        }
        _ => expr_stmt(p),
    }
}

/// The declaration keyword after any modifiers; `m` already wraps them.
fn declaration(p: &mut Parser, m: MarkOpened) {
    match p.current() {
        SyntaxKind::TYPE_KW => type_alias(p, m),
        SyntaxKind::INTERFACE_KW => interface(p, m),
        SyntaxKind::CLASS_KW => class(p, m),
        SyntaxKind::FUNCTION_KW => function_decl(p, m),
        SyntaxKind::CONST_KW | SyntaxKind::LET_KW | SyntaxKind::VAR_KW => var_stmt(p, m),
        _ => {
            p.error("expected a declaration");
            p.close(m, SyntaxKind::ERROR_NODE);
        }
    }
}

/// `export default expr;`
fn export_default(p: &mut Parser) {
    let m = p.open();
    p.advance(); // export
    p.advance(); // default
    expressions::expr(p);
    p.eat(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::EXPORT_DEFAULT);
}

fn expr_stmt(p: &mut Parser) {
    let m = p.open();
    expressions::expr(p);
    p.eat(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::EXPR_STMT);
}

fn return_stmt(p: &mut Parser) {
    let m = p.open();
    p.advance(); // return
    if !p.at_any(&[SyntaxKind::SEMICOLON, SyntaxKind::R_BRACE, SyntaxKind::EOF]) {
        expressions::expr(p);
    }
    p.eat(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::RETURN_STMT);
}

fn if_stmt(p: &mut Parser) {
    let m = p.open();
    p.advance(); // if
    p.expect(SyntaxKind::L_PAREN);
    expressions::expr(p);
    p.expect(SyntaxKind::R_PAREN);
    if !p.has_error() {
        stmt(p);
    }
    if !p.has_error() && p.eat(SyntaxKind::ELSE_KW) {
        stmt(p);
    }
    p.close(m, SyntaxKind::IF_STMT);
}

/// `{ stmt* }`
pub(crate) fn block(p: &mut Parser) {
    let m = p.open();
    let open_span = p.current_span();
    p.expect(SyntaxKind::L_BRACE);
    while !p.at_any(&[SyntaxKind::R_BRACE, SyntaxKind::EOF]) && !p.has_error() {
        stmt(p);
    }
    close_brace(p, open_span, "block opened here");
    p.close(m, SyntaxKind::BLOCK);
}

/// Expect the `}` matching an opening brace at `open_span`.
pub(crate) fn close_brace(p: &mut Parser, open_span: Span, what: &str) {
    if p.has_error() {
        return;
    }
    if !p.eat(SyntaxKind::R_BRACE) {
        p.error_with_related("expected `}`", open_span, what);
    }
}

// ── Declarations ─────────────────────────────────────────────────────────

/// `type Name<T> = Type;`
fn type_alias(p: &mut Parser, m: MarkOpened) {
    p.advance(); // type
    name(p);
    if p.at(SyntaxKind::LT) {
        type_param_list(p);
    }
    p.expect(SyntaxKind::EQ);
    if !p.has_error() {
        types::ty(p);
    }
    p.eat(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::TYPE_ALIAS_DECL);
}

/// `interface Name<T> extends A, B { members }`
fn interface(p: &mut Parser, m: MarkOpened) {
    p.advance(); // interface
    name(p);
    if p.at(SyntaxKind::LT) {
        type_param_list(p);
    }
    if p.at(SyntaxKind::EXTENDS_KW) {
        heritage_clause(p, SyntaxKind::EXTENDS_CLAUSE);
    }
    if !p.has_error() {
        types::type_literal(p);
    }
    p.close(m, SyntaxKind::INTERFACE_DECL);
}

/// `class Name<T> extends Base implements I { members }`
fn class(p: &mut Parser, m: MarkOpened) {
    p.advance(); // class
    name(p);
    if p.at(SyntaxKind::LT) {
        type_param_list(p);
    }
    if p.at(SyntaxKind::EXTENDS_KW) {
        heritage_clause(p, SyntaxKind::EXTENDS_CLAUSE);
    }
    if p.at(SyntaxKind::IMPLEMENTS_KW) {
        heritage_clause(p, SyntaxKind::IMPLEMENTS_CLAUSE);
    }
    if !p.has_error() {
        class_body(p);
    }
    p.close(m, SyntaxKind::CLASS_DECL);
}

/// `extends A, B` / `implements I`
fn heritage_clause(p: &mut Parser, kind: SyntaxKind) {
    let m = p.open();
    p.advance(); // extends / implements
    loop {
        types::ty(p);
        if p.has_error() || !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.close(m, kind);
}

fn class_body(p: &mut Parser) {
    let m = p.open();
    let open_span = p.current_span();
    p.expect(SyntaxKind::L_BRACE);
    while !p.at_any(&[SyntaxKind::R_BRACE, SyntaxKind::EOF]) && !p.has_error() {
        if !p.eat(SyntaxKind::SEMICOLON) {
            class_member(p);
        }
    }
    close_brace(p, open_span, "class body opened here");
    p.close(m, SyntaxKind::CLASS_BODY);
}

const MEMBER_MODIFIERS: &[SyntaxKind] = &[
    SyntaxKind::PUBLIC_KW,
    SyntaxKind::PRIVATE_KW,
    SyntaxKind::PROTECTED_KW,
    SyntaxKind::STATIC_KW,
    SyntaxKind::READONLY_KW,
    SyntaxKind::DECLARE_KW,
];

fn class_member(p: &mut Parser) {
    let m = p.open();
    member_modifiers(p, MEMBER_MODIFIERS);

    if p.at_contextual("constructor") && p.nth(1) == SyntaxKind::L_PAREN {
        p.advance(); // constructor
        param_list(p);
        if !p.has_error() && !p.eat(SyntaxKind::SEMICOLON) {
            block(p);
        }
        p.close(m, SyntaxKind::CONSTRUCTOR_DECL);
        return;
    }

    if p.at(SyntaxKind::L_BRACKET) {
        types::index_signature(p, m);
        return;
    }

    property_name(p);
    if !p.eat(SyntaxKind::QUESTION) {
        p.eat(SyntaxKind::BANG);
    }

    if p.at_any(&[SyntaxKind::L_PAREN, SyntaxKind::LT]) {
        if p.at(SyntaxKind::LT) {
            type_param_list(p);
        }
        param_list(p);
        if p.at(SyntaxKind::COLON) {
            type_annotation(p);
        }
        if !p.has_error() && !p.eat(SyntaxKind::SEMICOLON) {
            block(p);
        }
        p.close(m, SyntaxKind::METHOD_DECL);
        return;
    }

    if p.at(SyntaxKind::COLON) {
        type_annotation(p);
    }
    if p.eat(SyntaxKind::EQ) {
        expressions::expr(p);
    }
    p.eat(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::PROPERTY_DECL);
}

/// `function name<T>(params): R { body }`, body-less under `declare`.
fn function_decl(p: &mut Parser, m: MarkOpened) {
    p.advance(); // function
    name(p);
    if p.at(SyntaxKind::LT) {
        type_param_list(p);
    }
    param_list(p);
    if p.at(SyntaxKind::COLON) {
        type_annotation(p);
    }
    if !p.has_error() && !p.eat(SyntaxKind::SEMICOLON) {
        block(p);
    }
    p.close(m, SyntaxKind::FUNCTION_DECL);
}

/// `const a: T = init, b = init;`
fn var_stmt(p: &mut Parser, m: MarkOpened) {
    p.advance(); // const / let / var
    loop {
        let decl = p.open();
        if p.at(SyntaxKind::L_BRACE) {
            object_binding_pattern(p);
        } else {
            name(p);
        }
        if p.at(SyntaxKind::COLON) {
            type_annotation(p);
        }
        if p.eat(SyntaxKind::EQ) {
            expressions::expr(p);
        }
        p.close(decl, SyntaxKind::VAR_DECLARATOR);
        if p.has_error() || !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.eat(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::VAR_STMT);
}

// ── Shared pieces ────────────────────────────────────────────────────────

/// MODIFIER_LIST of the given keywords, if any is present.
/// `{ a, key: b }`. Keys are kept as bare tokens; only the bound
/// identifier is a NAME.
fn object_binding_pattern(p: &mut Parser) {
    let m = p.open();
    let open_span = p.current_span();
    p.advance(); // {
    while !p.at_any(&[SyntaxKind::R_BRACE, SyntaxKind::EOF]) && !p.has_error() {
        binding_element(p);
        if !p.at(SyntaxKind::R_BRACE) {
            p.expect(SyntaxKind::COMMA);
        }
    }
    close_brace(p, open_span, "binding pattern opened here");
    p.close(m, SyntaxKind::OBJECT_BINDING_PATTERN);
}

fn binding_element(p: &mut Parser) {
    let m = p.open();
    if p.nth(1) == SyntaxKind::COLON && (p.at(SyntaxKind::IDENT) || p.current().is_keyword()) {
        p.advance();
        p.advance(); // :
    }
    name(p);
    p.close(m, SyntaxKind::BINDING_ELEMENT);
}

fn modifiers(p: &mut Parser, allowed: &[SyntaxKind]) {
    if !p.at_any(allowed) {
        return;
    }
    let m = p.open();
    while p.at_any(allowed) {
        p.advance();
    }
    p.close(m, SyntaxKind::MODIFIER_LIST);
}

/// Like [`modifiers`], but a modifier keyword directly followed by member
/// punctuation is the member's name (`readonly: boolean`, `static() {}`).
pub(crate) fn member_modifiers(p: &mut Parser, allowed: &[SyntaxKind]) {
    if !at_modifier(p, allowed) {
        return;
    }
    let m = p.open();
    while at_modifier(p, allowed) {
        p.advance();
    }
    p.close(m, SyntaxKind::MODIFIER_LIST);
}

fn at_modifier(p: &Parser, allowed: &[SyntaxKind]) -> bool {
    p.at_any(allowed)
        && !matches!(
            p.nth(1),
            SyntaxKind::COLON
                | SyntaxKind::QUESTION
                | SyntaxKind::L_PAREN
                | SyntaxKind::LT
                | SyntaxKind::EQ
                | SyntaxKind::SEMICOLON
                | SyntaxKind::COMMA
                | SyntaxKind::R_PAREN
                | SyntaxKind::R_BRACE
        )
}

/// NAME around a binding identifier.
pub(crate) fn name(p: &mut Parser) {
    if p.at(SyntaxKind::IDENT) {
        let m = p.open();
        p.advance();
        p.close(m, SyntaxKind::NAME);
    } else {
        p.error("expected identifier");
    }
}

/// NAME around a property key: identifier, keyword, string or number.
pub(crate) fn property_name(p: &mut Parser) {
    let current = p.current();
    if current == SyntaxKind::IDENT
        || current.is_keyword()
        || current == SyntaxKind::STRING_LITERAL
        || current == SyntaxKind::NUMBER_LITERAL
    {
        let m = p.open();
        p.advance();
        p.close(m, SyntaxKind::NAME);
    } else {
        p.error("expected property name");
    }
}

/// `: Type`
pub(crate) fn type_annotation(p: &mut Parser) {
    let m = p.open();
    p.advance(); // :
    types::ty(p);
    p.close(m, SyntaxKind::TYPE_ANNOTATION);
}

/// `(a: T, b?: U = init, ...rest: V[])`
pub(crate) fn param_list(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::L_PAREN);
    while !p.at_any(&[SyntaxKind::R_PAREN, SyntaxKind::EOF]) && !p.has_error() {
        param(p);
        if !p.at(SyntaxKind::R_PAREN) {
            p.expect(SyntaxKind::COMMA);
        }
    }
    p.expect(SyntaxKind::R_PAREN);
    p.close(m, SyntaxKind::PARAM_LIST);
}

const PARAM_MODIFIERS: &[SyntaxKind] = &[
    SyntaxKind::PUBLIC_KW,
    SyntaxKind::PRIVATE_KW,
    SyntaxKind::PROTECTED_KW,
    SyntaxKind::READONLY_KW,
];

fn param(p: &mut Parser) {
    let m = p.open();
    member_modifiers(p, PARAM_MODIFIERS);
    p.eat(SyntaxKind::DOT_DOT_DOT);
    if p.at(SyntaxKind::THIS_KW) {
        let n = p.open();
        p.advance();
        p.close(n, SyntaxKind::NAME);
    } else {
        name(p);
    }
    p.eat(SyntaxKind::QUESTION);
    if p.at(SyntaxKind::COLON) {
        type_annotation(p);
    }
    if p.eat(SyntaxKind::EQ) {
        expressions::expr(p);
    }
    p.close(m, SyntaxKind::PARAM);
}

/// A lone `x` of `x => body`, shaped like a one-entry PARAM_LIST.
pub(crate) fn bare_param_list(p: &mut Parser) {
    let list = p.open();
    let param = p.open();
    name(p);
    p.close(param, SyntaxKind::PARAM);
    p.close(list, SyntaxKind::PARAM_LIST);
}

/// `<T extends Bound = Default, U>`
pub(crate) fn type_param_list(p: &mut Parser) {
    let m = p.open();
    p.advance(); // <
    while !p.at_any(&[SyntaxKind::GT, SyntaxKind::EOF]) && !p.has_error() {
        let tp = p.open();
        name(p);
        if p.eat(SyntaxKind::EXTENDS_KW) {
            types::ty(p);
        }
        if p.eat(SyntaxKind::EQ) {
            types::ty(p);
        }
        p.close(tp, SyntaxKind::TYPE_PARAM);
        if !p.at(SyntaxKind::GT) {
            p.expect(SyntaxKind::COMMA);
        }
    }
    p.expect(SyntaxKind::GT);
    p.close(m, SyntaxKind::TYPE_PARAM_LIST);
}
