//! Node factory.
//!
//! Builds detached green nodes for code inserted by a rewrite. Output is
//! shaped exactly like parser output for the same text, so a printed and
//! re-parsed tree has the same structure.

use rowan::{GreenNode, GreenToken, NodeOrToken};

use crate::cst::SyntaxNode;
use crate::syntax_kind::SyntaxKind;

pub type GreenElement = NodeOrToken<GreenNode, GreenToken>;

fn raw(kind: SyntaxKind) -> rowan::SyntaxKind {
    rowan::SyntaxKind(kind as u16)
}

pub fn token(kind: SyntaxKind, text: &str) -> GreenToken {
    GreenToken::new(raw(kind), text)
}

pub fn node(kind: SyntaxKind, children: Vec<GreenElement>) -> GreenNode {
    GreenNode::new(raw(kind), children)
}

pub fn whitespace(text: &str) -> GreenToken {
    token(SyntaxKind::WHITESPACE, text)
}

pub fn comma() -> GreenToken {
    token(SyntaxKind::COMMA, ",")
}

/// LITERAL(NUMBER_LITERAL)
pub fn number_literal(value: u64) -> GreenNode {
    let text = value.to_string();
    node(
        SyntaxKind::LITERAL,
        vec![NodeOrToken::Token(token(SyntaxKind::NUMBER_LITERAL, &text))],
    )
}

/// LITERAL(STRING_LITERAL), double-quoted.
pub fn string_literal(value: &str) -> GreenNode {
    let text = quote(value);
    node(
        SyntaxKind::LITERAL,
        vec![NodeOrToken::Token(token(SyntaxKind::STRING_LITERAL, &text))],
    )
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Whether `text` can be written as a bare property key.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// NAME around an identifier, or around a string literal when `text` is
/// not a valid identifier.
pub fn property_name(text: &str) -> GreenNode {
    let tok = if is_identifier(text) {
        let kind = routemeta_common::token::keyword_from_str(text)
            .map(SyntaxKind::from)
            .unwrap_or(SyntaxKind::IDENT);
        token(kind, text)
    } else {
        token(SyntaxKind::STRING_LITERAL, &quote(text))
    };
    node(SyntaxKind::NAME, vec![NodeOrToken::Token(tok)])
}

/// PROPERTY_ASSIGNMENT: `name: value`
pub fn property_assignment(name: &str, value: GreenNode) -> GreenNode {
    node(
        SyntaxKind::PROPERTY_ASSIGNMENT,
        vec![
            NodeOrToken::Node(property_name(name)),
            NodeOrToken::Token(token(SyntaxKind::COLON, ":")),
            NodeOrToken::Token(whitespace(" ")),
            NodeOrToken::Node(value),
        ],
    )
}

/// OBJECT_LITERAL on one line: `{ a: 1, b: 2 }`, or `{}` when empty.
pub fn object_literal(members: Vec<GreenNode>) -> GreenNode {
    let mut children = vec![NodeOrToken::Token(token(SyntaxKind::L_BRACE, "{"))];
    let count = members.len();
    for (i, member) in members.into_iter().enumerate() {
        children.push(NodeOrToken::Token(whitespace(" ")));
        children.push(NodeOrToken::Node(member));
        if i + 1 < count {
            children.push(NodeOrToken::Token(comma()));
        }
    }
    if count > 0 {
        children.push(NodeOrToken::Token(whitespace(" ")));
    }
    children.push(NodeOrToken::Token(token(SyntaxKind::R_BRACE, "}")));
    node(SyntaxKind::OBJECT_LITERAL, children)
}

/// Source text of a green node.
pub fn print(green: &GreenNode) -> String {
    SyntaxNode::new_root(green.clone()).text().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_literal_prints_on_one_line() {
        let obj = object_literal(vec![
            property_assignment("paramsTypeId", number_literal(0)),
            property_assignment("returnTypeId", number_literal(1)),
        ]);
        assert_eq!(print(&obj), "{ paramsTypeId: 0, returnTypeId: 1 }");
        assert_eq!(print(&object_literal(vec![])), "{}");
    }

    #[test]
    fn factory_output_matches_parser_shape() {
        let obj = object_literal(vec![
            property_assignment("a", number_literal(7)),
            property_assignment("b", string_literal("x")),
        ]);
        let text = format!("f({});", print(&obj));
        let parsed = crate::parse(&text);
        assert!(parsed.ok());
        let from_parser = parsed
            .syntax()
            .descendants()
            .find(|n| n.kind() == SyntaxKind::OBJECT_LITERAL)
            .map(|n| crate::debug_tree(&SyntaxNode::new_root(n.green().into_owned())));
        assert_eq!(from_parser, Some(crate::debug_tree(&SyntaxNode::new_root(obj))));
    }

    #[test]
    fn non_identifier_keys_are_quoted() {
        let prop = property_assignment("route-id", number_literal(3));
        assert_eq!(print(&prop), "\"route-id\": 3");
        assert!(is_identifier("$ok_1"));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn string_literal_escapes_quotes() {
        assert_eq!(print(&string_literal("say \"hi\"")), "\"say \\\"hi\\\"\"");
    }
}
