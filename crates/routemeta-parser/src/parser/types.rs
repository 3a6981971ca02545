//! Type parsers: references, arrays, unions, object type literals, function
//! types, and the literal/keyword types.

use crate::syntax_kind::SyntaxKind;

use super::{items, MarkClosed, MarkOpened, Parser};

/// Parse a type. A union is flattened into one UNION_TYPE node; a leading
/// `|` is allowed.
pub(crate) fn ty(p: &mut Parser) -> Option<MarkClosed> {
    if p.at(SyntaxKind::BAR) {
        let m = p.open();
        while p.eat(SyntaxKind::BAR) && !p.has_error() {
            postfix_type(p);
        }
        return Some(p.close(m, SyntaxKind::UNION_TYPE));
    }

    let first = postfix_type(p)?;
    if !p.at(SyntaxKind::BAR) {
        return Some(first);
    }
    let m = p.open_before(first);
    while p.eat(SyntaxKind::BAR) && !p.has_error() {
        postfix_type(p);
    }
    Some(p.close(m, SyntaxKind::UNION_TYPE))
}

/// `T[]`, `T[][]`
fn postfix_type(p: &mut Parser) -> Option<MarkClosed> {
    let mut ty = primary_type(p)?;
    while p.at(SyntaxKind::L_BRACKET) && p.nth(1) == SyntaxKind::R_BRACKET {
        let m = p.open_before(ty);
        p.advance(); // [
        p.advance(); // ]
        ty = p.close(m, SyntaxKind::ARRAY_TYPE);
    }
    Some(ty)
}

fn primary_type(p: &mut Parser) -> Option<MarkClosed> {
    let kind = match p.current() {
        SyntaxKind::IDENT => return Some(type_ref(p)),
        SyntaxKind::L_BRACE => return Some(type_literal(p)),
        SyntaxKind::LT => return Some(function_type(p)),
        SyntaxKind::L_PAREN => {
            let is_function = p
                .offset_past_parens(0)
                .is_some_and(|past| p.nth(past) == SyntaxKind::FAT_ARROW);
            return Some(if is_function {
                function_type(p)
            } else {
                paren_type(p)
            });
        }
        SyntaxKind::THIS_KW => SyntaxKind::THIS_TYPE,
        SyntaxKind::VOID_KW | SyntaxKind::NULL_KW => SyntaxKind::PREDEFINED_TYPE,
        SyntaxKind::STRING_LITERAL
        | SyntaxKind::NUMBER_LITERAL
        | SyntaxKind::TRUE_KW
        | SyntaxKind::FALSE_KW => SyntaxKind::LITERAL_TYPE,
        _ => {
            p.error("expected type");
            return None;
        }
    };
    let m = p.open();
    p.advance();
    Some(p.close(m, kind))
}

/// TYPE_REF(NAME_REF, TYPE_ARG_LIST?)
fn type_ref(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    let name = p.open();
    p.advance();
    p.close(name, SyntaxKind::NAME_REF);
    if p.at(SyntaxKind::LT) {
        type_arg_list(p);
    }
    p.close(m, SyntaxKind::TYPE_REF)
}

fn paren_type(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // (
    ty(p);
    p.expect(SyntaxKind::R_PAREN);
    p.close(m, SyntaxKind::PAREN_TYPE)
}

/// FUNCTION_TYPE(TYPE_PARAM_LIST?, PARAM_LIST, =>, return type)
fn function_type(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    if p.at(SyntaxKind::LT) {
        items::type_param_list(p);
    }
    items::param_list(p);
    p.expect(SyntaxKind::FAT_ARROW);
    if !p.has_error() {
        ty(p);
    }
    p.close(m, SyntaxKind::FUNCTION_TYPE)
}

/// `<A, B>`
pub(crate) fn type_arg_list(p: &mut Parser) {
    let m = p.open();
    p.advance(); // <
    while !p.at_any(&[SyntaxKind::GT, SyntaxKind::EOF]) && !p.has_error() {
        ty(p);
        if !p.at(SyntaxKind::GT) {
            p.expect(SyntaxKind::COMMA);
        }
    }
    p.expect(SyntaxKind::GT);
    p.close(m, SyntaxKind::TYPE_ARG_LIST);
}

/// `{ member; member, ... }`; also the body of an interface.
pub(crate) fn type_literal(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    let open_span = p.current_span();
    p.expect(SyntaxKind::L_BRACE);
    while !p.at_any(&[SyntaxKind::R_BRACE, SyntaxKind::EOF]) && !p.has_error() {
        type_member(p);
    }
    items::close_brace(p, open_span, "type literal opened here");
    p.close(m, SyntaxKind::TYPE_LITERAL)
}

fn type_member(p: &mut Parser) {
    let m = p.open();
    items::member_modifiers(p, &[SyntaxKind::READONLY_KW]);

    if p.at(SyntaxKind::L_BRACKET) {
        index_signature(p, m);
        return;
    }

    items::property_name(p);
    p.eat(SyntaxKind::QUESTION);
    let kind = if p.at_any(&[SyntaxKind::L_PAREN, SyntaxKind::LT]) {
        if p.at(SyntaxKind::LT) {
            items::type_param_list(p);
        }
        items::param_list(p);
        SyntaxKind::METHOD_SIGNATURE
    } else {
        SyntaxKind::PROPERTY_SIGNATURE
    };
    if p.at(SyntaxKind::COLON) {
        items::type_annotation(p);
    }
    member_separator(p);
    p.close(m, kind);
}

/// `[key: string]: T`; `m` already covers any modifiers.
pub(crate) fn index_signature(p: &mut Parser, m: MarkOpened) {
    p.advance(); // [
    let param = p.open();
    items::name(p);
    if p.at(SyntaxKind::COLON) {
        items::type_annotation(p);
    } else {
        p.error("expected `:` in index signature");
    }
    p.close(param, SyntaxKind::PARAM);
    p.expect(SyntaxKind::R_BRACKET);
    if p.at(SyntaxKind::COLON) {
        items::type_annotation(p);
    } else {
        p.error("index signature needs a value type");
    }
    member_separator(p);
    p.close(m, SyntaxKind::INDEX_SIGNATURE);
}

fn member_separator(p: &mut Parser) {
    if !p.eat(SyntaxKind::SEMICOLON) {
        p.eat(SyntaxKind::COMMA);
    }
}
