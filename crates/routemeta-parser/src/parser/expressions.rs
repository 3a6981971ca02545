//! Pratt expression parser.
//!
//! Assignment and the conditional operator sit above the binding-power
//! loop; calls, member access and indexing are postfix operations that bind
//! tighter than every prefix and infix operator. Arrow functions and
//! explicit call type arguments are recognized with bounded token scans
//! before committing to a parse.

use crate::syntax_kind::SyntaxKind;

use super::{items, types, MarkClosed, Parser};

// ── Binding Power Tables ───────────────────────────────────────────────

/// (left_bp, right_bp) of an infix operator; left < right is
/// left-associative.
fn infix_binding_power(op: SyntaxKind) -> Option<(u8, u8)> {
    let bp = match op {
        SyntaxKind::QUESTION_QUESTION => (3, 4),
        SyntaxKind::PIPE_PIPE => (5, 6),
        SyntaxKind::AMP_AMP => (7, 8),
        SyntaxKind::EQ_EQ | SyntaxKind::EQ_EQ_EQ | SyntaxKind::NOT_EQ | SyntaxKind::NOT_EQ_EQ => {
            (9, 10)
        }
        SyntaxKind::LT | SyntaxKind::GT | SyntaxKind::LT_EQ | SyntaxKind::GT_EQ => (11, 12),
        SyntaxKind::PLUS | SyntaxKind::MINUS => (13, 14),
        SyntaxKind::STAR | SyntaxKind::SLASH | SyntaxKind::PERCENT => (15, 16),
        _ => return None,
    };
    Some(bp)
}

/// `expr as Type` binds like a relational operator.
const AS_BP: u8 = 11;

fn prefix_binding_power(op: SyntaxKind) -> Option<u8> {
    match op {
        SyntaxKind::BANG
        | SyntaxKind::MINUS
        | SyntaxKind::PLUS
        | SyntaxKind::TYPEOF_KW
        | SyntaxKind::VOID_KW => Some(17),
        _ => None,
    }
}

const POSTFIX_BP: u8 = 19;

// ── Entry Points ───────────────────────────────────────────────────────

/// Parse an assignment expression (the loosest expression form).
pub(crate) fn expr(p: &mut Parser) -> Option<MarkClosed> {
    if arrow_ahead(p) {
        return Some(arrow_function(p));
    }
    let lhs = conditional(p)?;
    if p.at(SyntaxKind::EQ) {
        let m = p.open_before(lhs);
        p.advance(); // =
        expr(p);
        return Some(p.close(m, SyntaxKind::ASSIGN_EXPR));
    }
    Some(lhs)
}

/// `cond ? then : else`
fn conditional(p: &mut Parser) -> Option<MarkClosed> {
    let cond = expr_bp(p, 0)?;
    if !p.at(SyntaxKind::QUESTION) {
        return Some(cond);
    }
    let m = p.open_before(cond);
    p.advance(); // ?
    expr(p);
    p.expect(SyntaxKind::COLON);
    if !p.has_error() {
        expr(p);
    }
    Some(p.close(m, SyntaxKind::CONDITIONAL_EXPR))
}

fn expr_bp(p: &mut Parser, min_bp: u8) -> Option<MarkClosed> {
    let mut lhs = lhs(p)?;

    loop {
        if p.has_error() {
            break;
        }
        let current = p.current();

        if POSTFIX_BP >= min_bp {
            if let Some(done) = postfix(p, lhs, current) {
                lhs = done;
                continue;
            }
        }

        if current == SyntaxKind::AS_KW {
            if AS_BP < min_bp {
                break;
            }
            let m = p.open_before(lhs);
            p.advance(); // as
            types::ty(p);
            lhs = p.close(m, SyntaxKind::AS_EXPR);
            continue;
        }

        if let Some((l_bp, r_bp)) = infix_binding_power(current) {
            if l_bp < min_bp {
                break;
            }
            let m = p.open_before(lhs);
            p.advance(); // operator
            expr_bp(p, r_bp);
            lhs = p.close(m, SyntaxKind::BINARY_EXPR);
            continue;
        }

        break;
    }

    Some(lhs)
}

/// Calls, property access and indexing applied to `lhs`.
fn postfix(p: &mut Parser, lhs: MarkClosed, current: SyntaxKind) -> Option<MarkClosed> {
    match current {
        SyntaxKind::L_PAREN => {
            let m = p.open_before(lhs);
            arg_list(p);
            Some(p.close(m, SyntaxKind::CALL_EXPR))
        }
        SyntaxKind::LT if type_args_ahead(p) => {
            let m = p.open_before(lhs);
            types::type_arg_list(p);
            arg_list(p);
            Some(p.close(m, SyntaxKind::CALL_EXPR))
        }
        SyntaxKind::DOT | SyntaxKind::QUESTION_DOT => Some(property_access(p, lhs)),
        SyntaxKind::L_BRACKET => {
            let m = p.open_before(lhs);
            p.advance(); // [
            expr(p);
            p.expect(SyntaxKind::R_BRACKET);
            Some(p.close(m, SyntaxKind::INDEX_EXPR))
        }
        _ => None,
    }
}

/// `.name` / `?.name`; keywords are valid property names.
fn property_access(p: &mut Parser, lhs: MarkClosed) -> MarkClosed {
    let m = p.open_before(lhs);
    p.advance(); // . or ?.
    if p.at(SyntaxKind::IDENT) || p.current().is_keyword() {
        p.advance();
    } else {
        p.error("expected property name after `.`");
    }
    p.close(m, SyntaxKind::PROPERTY_ACCESS)
}

// ── Atoms and Prefix Operators ─────────────────────────────────────────

fn lhs(p: &mut Parser) -> Option<MarkClosed> {
    let current = p.current();

    if let Some(r_bp) = prefix_binding_power(current) {
        let m = p.open();
        p.advance(); // operator
        expr_bp(p, r_bp);
        return Some(p.close(m, SyntaxKind::PREFIX_EXPR));
    }

    let kind = match current {
        SyntaxKind::NUMBER_LITERAL
        | SyntaxKind::STRING_LITERAL
        | SyntaxKind::TRUE_KW
        | SyntaxKind::FALSE_KW
        | SyntaxKind::NULL_KW => SyntaxKind::LITERAL,
        SyntaxKind::IDENT if p.at_contextual("async") && p.nth(1) == SyntaxKind::FUNCTION_KW => {
            return Some(function_expr(p));
        }
        SyntaxKind::IDENT => SyntaxKind::NAME_REF,
        SyntaxKind::THIS_KW => SyntaxKind::THIS_EXPR,
        SyntaxKind::L_PAREN => return Some(paren_expr(p)),
        SyntaxKind::L_BRACKET => return Some(array_literal(p)),
        SyntaxKind::L_BRACE => return Some(object_literal(p)),
        SyntaxKind::FUNCTION_KW => return Some(function_expr(p)),
        SyntaxKind::NEW_KW => return Some(new_expr(p)),
        _ => {
            p.error("expected expression");
            return None;
        }
    };
    let m = p.open();
    p.advance();
    Some(p.close(m, kind))
}

fn paren_expr(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // (
    expr(p);
    p.expect(SyntaxKind::R_PAREN);
    p.close(m, SyntaxKind::PAREN_EXPR)
}

/// `[a, ...rest, b,]`
fn array_literal(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // [
    while !p.at_any(&[SyntaxKind::R_BRACKET, SyntaxKind::EOF]) && !p.has_error() {
        element(p);
        if !p.at(SyntaxKind::R_BRACKET) {
            p.expect(SyntaxKind::COMMA);
        }
    }
    p.expect(SyntaxKind::R_BRACKET);
    p.close(m, SyntaxKind::ARRAY_LITERAL)
}

/// An array element or call argument: an expression or `...spread`.
fn element(p: &mut Parser) {
    if p.at(SyntaxKind::DOT_DOT_DOT) {
        let m = p.open();
        p.advance(); // ...
        expr(p);
        p.close(m, SyntaxKind::SPREAD_ELEMENT);
    } else {
        expr(p);
    }
}

/// `{ key: value, short, ...spread }`
fn object_literal(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    let open_span = p.current_span();
    p.advance(); // {
    while !p.at_any(&[SyntaxKind::R_BRACE, SyntaxKind::EOF]) && !p.has_error() {
        object_member(p);
        if !p.at(SyntaxKind::R_BRACE) {
            p.expect(SyntaxKind::COMMA);
        }
    }
    items::close_brace(p, open_span, "object literal opened here");
    p.close(m, SyntaxKind::OBJECT_LITERAL)
}

fn object_member(p: &mut Parser) {
    if p.at(SyntaxKind::DOT_DOT_DOT) {
        element(p);
        return;
    }
    if p.at(SyntaxKind::IDENT) && matches!(p.nth(1), SyntaxKind::COMMA | SyntaxKind::R_BRACE) {
        let m = p.open();
        let name = p.open();
        p.advance();
        p.close(name, SyntaxKind::NAME_REF);
        p.close(m, SyntaxKind::SHORTHAND_PROPERTY);
        return;
    }
    let m = p.open();
    items::property_name(p);
    p.expect(SyntaxKind::COLON);
    if !p.has_error() {
        expr(p);
    }
    p.close(m, SyntaxKind::PROPERTY_ASSIGNMENT);
}

/// `async function name<T>(params): R { body }` in expression position.
fn function_expr(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    async_modifier(p);
    p.expect(SyntaxKind::FUNCTION_KW);
    if p.at(SyntaxKind::IDENT) {
        items::name(p);
    }
    if p.at(SyntaxKind::LT) {
        items::type_param_list(p);
    }
    items::param_list(p);
    if p.at(SyntaxKind::COLON) {
        items::type_annotation(p);
    }
    if !p.has_error() {
        items::block(p);
    }
    p.close(m, SyntaxKind::FUNCTION_EXPR)
}

/// `new Callee.path<T>(args)`; the argument list is optional.
fn new_expr(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // new
    if let Some(mut callee) = lhs(p) {
        while p.at(SyntaxKind::DOT) && !p.has_error() {
            callee = property_access(p, callee);
        }
    }
    if p.at(SyntaxKind::LT) && type_args_ahead(p) {
        types::type_arg_list(p);
    }
    if p.at(SyntaxKind::L_PAREN) {
        arg_list(p);
    }
    p.close(m, SyntaxKind::NEW_EXPR)
}

/// `(a, b, ...rest)`
fn arg_list(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::L_PAREN);
    while !p.at_any(&[SyntaxKind::R_PAREN, SyntaxKind::EOF]) && !p.has_error() {
        element(p);
        if !p.at(SyntaxKind::R_PAREN) {
            p.expect(SyntaxKind::COMMA);
        }
    }
    p.expect(SyntaxKind::R_PAREN);
    p.close(m, SyntaxKind::ARG_LIST);
}

// ── Arrow Functions ────────────────────────────────────────────────────

/// `async` before a function expression or arrow, wrapped in a
/// MODIFIER_LIST. It is a contextual keyword and stays an IDENT token;
/// `async => 1` is an arrow with a parameter named `async`.
fn async_modifier(p: &mut Parser) {
    if p.at_contextual("async") && p.nth(1) != SyntaxKind::FAT_ARROW {
        let m = p.open();
        p.advance(); // async
        p.close(m, SyntaxKind::MODIFIER_LIST);
    }
}

/// Whether an arrow function starts here: `x =>`, `<T>(`, `(...) =>` or
/// `(...): Type =>`, each optionally preceded by `async`.
fn arrow_ahead(p: &Parser) -> bool {
    let skip = usize::from(
        p.at_contextual("async") && matches!(p.nth(1), SyntaxKind::IDENT | SyntaxKind::L_PAREN),
    );
    match p.nth(skip) {
        SyntaxKind::IDENT => p.nth(skip + 1) == SyntaxKind::FAT_ARROW,
        SyntaxKind::LT => skip == 0,
        SyntaxKind::L_PAREN => {
            let Some(past) = p.offset_past_parens(skip) else {
                return false;
            };
            match p.nth(past) {
                SyntaxKind::FAT_ARROW => true,
                SyntaxKind::COLON => return_type_then_arrow(p, past + 1),
                _ => false,
            }
        }
        _ => false,
    }
}

/// Scan a return type annotation starting `skip` tokens ahead; true when it
/// is followed by `=>` at nesting depth zero.
fn return_type_then_arrow(p: &Parser, skip: usize) -> bool {
    let mut depth = 0usize;
    for kind in p.lookahead().skip(skip) {
        match kind {
            SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE | SyntaxKind::LT => {
                depth += 1
            }
            SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE | SyntaxKind::GT => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            SyntaxKind::FAT_ARROW if depth == 0 => return true,
            SyntaxKind::SEMICOLON | SyntaxKind::EQ | SyntaxKind::COMMA | SyntaxKind::EOF
                if depth == 0 =>
            {
                return false
            }
            SyntaxKind::EOF => return false,
            _ => {}
        }
    }
    false
}

/// ARROW_FUNCTION(MODIFIER_LIST?, TYPE_PARAM_LIST?, PARAM_LIST, TYPE_ANNOTATION?, =>, body)
/// where body is a BLOCK or an expression.
fn arrow_function(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    async_modifier(p);
    if p.at(SyntaxKind::LT) {
        items::type_param_list(p);
    }
    if p.at(SyntaxKind::IDENT) {
        items::bare_param_list(p);
    } else {
        items::param_list(p);
    }
    if p.at(SyntaxKind::COLON) {
        items::type_annotation(p);
    }
    p.expect(SyntaxKind::FAT_ARROW);
    if !p.has_error() {
        if p.at(SyntaxKind::L_BRACE) {
            items::block(p);
        } else {
            expr(p);
        }
    }
    p.close(m, SyntaxKind::ARROW_FUNCTION)
}

// ── Call Type Arguments ────────────────────────────────────────────────

/// Whether the `<` at the current position opens type arguments of a call:
/// only type-shaped tokens until the matching `>`, which must be followed
/// by `(`. Otherwise `<` is the less-than operator.
fn type_args_ahead(p: &Parser) -> bool {
    let mut depth = 0usize;
    let mut tokens = p.lookahead();
    while let Some(kind) = tokens.next() {
        match kind {
            SyntaxKind::LT => depth += 1,
            SyntaxKind::GT => {
                depth -= 1;
                if depth == 0 {
                    return tokens.next() == Some(SyntaxKind::L_PAREN);
                }
            }
            SyntaxKind::IDENT
            | SyntaxKind::COMMA
            | SyntaxKind::DOT
            | SyntaxKind::L_BRACKET
            | SyntaxKind::R_BRACKET
            | SyntaxKind::L_BRACE
            | SyntaxKind::R_BRACE
            | SyntaxKind::L_PAREN
            | SyntaxKind::R_PAREN
            | SyntaxKind::COLON
            | SyntaxKind::SEMICOLON
            | SyntaxKind::QUESTION
            | SyntaxKind::BAR
            | SyntaxKind::FAT_ARROW
            | SyntaxKind::STRING_LITERAL
            | SyntaxKind::NUMBER_LITERAL
            | SyntaxKind::THIS_KW
            | SyntaxKind::VOID_KW
            | SyntaxKind::NULL_KW
            | SyntaxKind::TRUE_KW
            | SyntaxKind::FALSE_KW
            | SyntaxKind::READONLY_KW => {}
            _ => return false,
        }
    }
    false
}
