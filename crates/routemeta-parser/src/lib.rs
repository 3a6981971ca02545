//! routemeta parser: TypeScript subset to a lossless rowan CST.
//!
//! Transforms the token stream from `routemeta-lexer` into a concrete syntax
//! tree that keeps every token, whitespace and comments included, so a
//! rewritten tree prints back to exactly the original text outside the
//! rewritten spots. The typed [`ast`] layer wraps the CST and [`make`]
//! builds replacement nodes.

pub mod ast;
pub mod cst;
pub mod error;
pub mod make;
mod parser;
pub mod syntax_kind;

pub use cst::{SyntaxElement, SyntaxNode, SyntaxToken, TsLanguage};
pub use error::ParseError;
pub use syntax_kind::SyntaxKind;

use routemeta_lexer::Lexer;

/// Result of parsing one source file.
///
/// With the first-error-only strategy `errors` holds at most one entry; the
/// tree is still complete and lossless (unparsed input sits in an
/// ERROR_NODE).
#[derive(Debug, Clone)]
pub struct Parse {
    green: rowan::GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn green(&self) -> &rowan::GreenNode {
        &self.green
    }

    /// Typed root.
    pub fn tree(&self) -> ast::item::SourceFile {
        ast::item::SourceFile::cast_root(self.syntax())
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Lex and parse a source file.
pub fn parse(source: &str) -> Parse {
    let tokens = Lexer::tokenize(source);
    let mut p = parser::Parser::new(tokens, source);
    parser::parse_source_file(&mut p);
    let (green, errors) = p.build_tree();
    Parse { green, errors }
}

/// Render a tree as an indented kind/range listing, one element per line.
/// Tokens show their text, so losslessness is visible.
pub fn debug_tree(node: &SyntaxNode) -> String {
    let mut out = String::new();
    let mut depth = 0usize;
    for event in node.preorder_with_tokens() {
        match event {
            rowan::WalkEvent::Enter(rowan::NodeOrToken::Node(n)) => {
                out.push_str(&format!("{}{:?}@{:?}\n", "  ".repeat(depth), n.kind(), n.text_range()));
                depth += 1;
            }
            rowan::WalkEvent::Enter(rowan::NodeOrToken::Token(t)) => {
                out.push_str(&format!(
                    "{}{:?}@{:?} {:?}\n",
                    "  ".repeat(depth),
                    t.kind(),
                    t.text_range(),
                    t.text()
                ));
            }
            rowan::WalkEvent::Leave(rowan::NodeOrToken::Node(_)) => depth -= 1,
            rowan::WalkEvent::Leave(rowan::NodeOrToken::Token(_)) => {}
        }
    }
    out
}
