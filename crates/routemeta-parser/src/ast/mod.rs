//! Typed AST layer on top of the rowan CST.
//!
//! Each wrapper is a newtype around `SyntaxNode` with accessors that walk
//! the tree on demand, in the rust-analyzer style. `cast()` is a single kind
//! check. Enums such as [`expr::Expr`] group the node kinds that may appear
//! in one syntactic position.

use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

/// A typed view of a `SyntaxNode`.
pub trait AstNode: Sized {
    fn cast(node: SyntaxNode) -> Option<Self>;

    fn syntax(&self) -> &SyntaxNode;
}

/// Declare a newtype wrapper for one node kind.
macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            pub(crate) syntax: $crate::cst::SyntaxNode,
        }

        impl $crate::ast::AstNode for $name {
            fn cast(node: $crate::cst::SyntaxNode) -> Option<Self> {
                if node.kind() == $crate::SyntaxKind::$kind {
                    Some(Self { syntax: node })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &$crate::cst::SyntaxNode {
                &self.syntax
            }
        }
    };
}

/// Declare an enum over several wrappers, dispatching `cast` on the kind.
macro_rules! ast_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident($wrapper:ident) = $kind:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant($wrapper)),+
        }

        impl $crate::ast::AstNode for $name {
            fn cast(node: $crate::cst::SyntaxNode) -> Option<Self> {
                match node.kind() {
                    $($crate::SyntaxKind::$kind => Some($name::$variant($wrapper { syntax: node })),)+
                    _ => None,
                }
            }

            fn syntax(&self) -> &$crate::cst::SyntaxNode {
                match self {
                    $($name::$variant(it) => &it.syntax,)+
                }
            }
        }
    };
}

pub mod expr;
pub mod item;
pub mod ty;

pub fn child_node<N: AstNode>(parent: &SyntaxNode) -> Option<N> {
    parent.children().find_map(N::cast)
}

pub fn child_nodes<'a, N: AstNode + 'a>(parent: &'a SyntaxNode) -> impl Iterator<Item = N> + 'a {
    parent.children().filter_map(N::cast)
}

pub fn child_token(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|it| it.kind() == kind)
}

/// Whether a MODIFIER_LIST child of `parent` carries `modifier`.
pub fn has_modifier(parent: &SyntaxNode, modifier: SyntaxKind) -> bool {
    parent
        .children()
        .filter(|n| n.kind() == SyntaxKind::MODIFIER_LIST)
        .any(|list| child_token(&list, modifier).is_some())
}

/// Whether `parent` is marked `async`. The contextual keyword is an IDENT
/// inside the MODIFIER_LIST.
pub fn is_async(parent: &SyntaxNode) -> bool {
    parent
        .children()
        .filter(|n| n.kind() == SyntaxKind::MODIFIER_LIST)
        .flat_map(|list| list.children_with_tokens().filter_map(|it| it.into_token()))
        .any(|token| token.kind() == SyntaxKind::IDENT && token.text() == "async")
}
