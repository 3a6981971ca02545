//! Tree rewriting with per-kind handlers.
//!
//! A [`Visitor`] walks the CST in pre-order and produces a new green tree.
//! Each visitor type owns a [`DispatchTable`] from node kind to handler,
//! built once in a `OnceLock` static. A handler either returns a
//! replacement node or calls [`Visitor::visit_each_child`] to keep
//! descending. Kinds without a handler are rebuilt from their visited
//! children, and subtrees nothing touched keep their original green node.

use rowan::{GreenNode, GreenNodeData, NodeOrToken};

use routemeta_parser::make::{self, GreenElement};
use routemeta_parser::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

use crate::error::{Result, RewriteError};

/// Handlers indexed by node kind.
///
/// `H` is normally a function pointer such as
/// `for<'a> fn(&mut MyVisitor<'a>, &SyntaxNode) -> Result<GreenNode>`.
pub struct DispatchTable<H> {
    handlers: Vec<Option<H>>,
}

impl<H: Copy> DispatchTable<H> {
    pub fn new() -> Self {
        DispatchTable {
            handlers: vec![None; SyntaxKind::COUNT],
        }
    }

    pub fn on(mut self, kind: SyntaxKind, handler: H) -> Self {
        self.handlers[kind as usize] = Some(handler);
        self
    }

    pub fn get(&self, kind: SyntaxKind) -> Option<H> {
        self.handlers.get(kind as usize).copied().flatten()
    }
}

impl<H: Copy> Default for DispatchTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

pub trait Visitor {
    type Handler: Copy + 'static;

    fn dispatch_table() -> &'static DispatchTable<Self::Handler>;

    /// Run one handler from the table on `node`.
    fn invoke(&mut self, handler: Self::Handler, node: &SyntaxNode) -> Result<GreenNode>;

    fn visit_node(&mut self, node: &SyntaxNode) -> Result<GreenNode> {
        match Self::dispatch_table().get(node.kind()) {
            Some(handler) => self.invoke(handler, node),
            None => self.visit_each_child(node),
        }
    }

    /// Visit every child node and rebuild `node` around the results.
    fn visit_each_child(&mut self, node: &SyntaxNode) -> Result<GreenNode> {
        let mut changed = false;
        let mut children = Vec::new();
        for child in node.children_with_tokens() {
            match child {
                NodeOrToken::Node(child) => {
                    let old = child.green();
                    let new = self.visit_node(&child)?;
                    changed |= !std::ptr::eq::<GreenNodeData>(&*new, &*old);
                    children.push(NodeOrToken::Node(new));
                }
                NodeOrToken::Token(token) => {
                    children.push(NodeOrToken::Token(token.green().to_owned()));
                }
            }
        }
        if !changed {
            return Ok(node.green().into_owned());
        }
        Ok(make::node(node.kind(), children))
    }
}

// ── Shape helpers ────────────────────────────────────────────────────────

fn malformed(node: &SyntaxNode, expected: String) -> RewriteError {
    RewriteError::MalformedNode {
        node: format!("{:?}", node.kind()),
        expected,
        span: Some(node.text_range()),
    }
}

/// Children of `node` that are not whitespace or comments.
pub fn significant_children(node: &SyntaxNode) -> Vec<SyntaxElement> {
    node.children_with_tokens()
        .filter(|it| !it.kind().is_trivia())
        .collect()
}

/// First child node of `kind`.
pub fn expect_child(node: &SyntaxNode, kind: SyntaxKind) -> Result<SyntaxNode> {
    node.children()
        .find(|child| child.kind() == kind)
        .ok_or_else(|| malformed(node, format!("a {:?} child", kind)))
}

/// First direct token of `kind`.
pub fn expect_token(node: &SyntaxNode, kind: SyntaxKind) -> Result<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|token| token.kind() == kind)
        .ok_or_else(|| malformed(node, format!("a {:?} token", kind)))
}

/// An element of a red tree as a detached green element.
pub fn green_element(element: &SyntaxElement) -> GreenElement {
    match element {
        NodeOrToken::Node(node) => NodeOrToken::Node(node.green().into_owned()),
        NodeOrToken::Token(token) => NodeOrToken::Token(token.green().to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;

    use super::*;

    /// Renames every `old` reference to `new`, counting visited nodes.
    struct Renamer {
        visited: usize,
    }

    type RenamerHandler = fn(&mut Renamer, &SyntaxNode) -> Result<GreenNode>;

    fn rename_ref(renamer: &mut Renamer, node: &SyntaxNode) -> Result<GreenNode> {
        renamer.visited += 1;
        let ident = expect_token(node, SyntaxKind::IDENT)?;
        if ident.text() != "old" {
            return Ok(node.green().into_owned());
        }
        Ok(make::node(
            SyntaxKind::NAME_REF,
            vec![NodeOrToken::Token(make::token(SyntaxKind::IDENT, "new"))],
        ))
    }

    /// Leaves arrow functions untouched without descending.
    fn skip_arrow(_: &mut Renamer, node: &SyntaxNode) -> Result<GreenNode> {
        Ok(node.green().into_owned())
    }

    impl Visitor for Renamer {
        type Handler = RenamerHandler;

        fn dispatch_table() -> &'static DispatchTable<RenamerHandler> {
            static TABLE: OnceLock<DispatchTable<RenamerHandler>> = OnceLock::new();
            TABLE.get_or_init(|| {
                DispatchTable::new()
                    .on(SyntaxKind::NAME_REF, rename_ref as RenamerHandler)
                    .on(SyntaxKind::ARROW_FUNCTION, skip_arrow)
            })
        }

        fn invoke(&mut self, handler: RenamerHandler, node: &SyntaxNode) -> Result<GreenNode> {
            handler(self, node)
        }
    }

    fn rename(src: &str) -> (String, usize) {
        let parse = routemeta_parser::parse(src);
        assert!(parse.ok(), "{:?}", parse.errors());
        let mut renamer = Renamer { visited: 0 };
        let green = renamer.visit_node(&parse.syntax()).unwrap();
        (make::print(&green), renamer.visited)
    }

    #[test]
    fn handlers_replace_nodes_and_keep_trivia() {
        let (text, visited) = rename("f(old, other) ; // old\nold.x = 1;");
        assert_eq!(text, "f(new, other) ; // old\nnew.x = 1;");
        assert_eq!(visited, 4);
    }

    #[test]
    fn handlers_can_stop_descent() {
        let (text, visited) = rename("const g = () => old;\nold;");
        assert_eq!(text, "const g = () => old;\nnew;");
        assert_eq!(visited, 1);
    }

    #[test]
    fn untouched_trees_reuse_the_original_green_node() {
        let parse = routemeta_parser::parse("const a = { b: [1, 2] };");
        let mut renamer = Renamer { visited: 0 };
        let green = renamer.visit_node(&parse.syntax()).unwrap();
        assert!(std::ptr::eq::<GreenNodeData>(&*green, &**parse.green()));
    }

    #[test]
    fn table_lookup_is_per_kind() {
        let table = Renamer::dispatch_table();
        assert!(table.get(SyntaxKind::NAME_REF).is_some());
        assert!(table.get(SyntaxKind::CALL_EXPR).is_none());
        assert!(std::ptr::eq(table, Renamer::dispatch_table()));
    }

    #[test]
    fn shape_helpers_fail_loudly() {
        let parse = routemeta_parser::parse("f(1);");
        let call = parse
            .syntax()
            .descendants()
            .find(|n| n.kind() == SyntaxKind::CALL_EXPR)
            .unwrap();
        assert!(expect_child(&call, SyntaxKind::ARG_LIST).is_ok());
        let err = expect_child(&call, SyntaxKind::TYPE_ARG_LIST).unwrap_err();
        assert_eq!(err.to_string(), "malformed CALL_EXPR: expected a TYPE_ARG_LIST child");
        assert!(matches!(
            expect_token(&call, SyntaxKind::SEMICOLON),
            Err(RewriteError::MalformedNode { .. })
        ));

        let args = expect_child(&call, SyntaxKind::ARG_LIST).unwrap();
        let kinds: Vec<_> = significant_children(&args).iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            [SyntaxKind::L_PAREN, SyntaxKind::LITERAL, SyntaxKind::R_PAREN]
        );
    }
}
