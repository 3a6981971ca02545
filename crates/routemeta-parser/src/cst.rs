//! Rowan-based concrete syntax tree types.
//!
//! `TsLanguage` connects [`SyntaxKind`] to rowan's generic tree
//! infrastructure.

use crate::syntax_kind::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TsLanguage {}

impl rowan::Language for TsLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < SyntaxKind::__LAST as u16, "raw kind {} out of range", raw.0);
        // SAFETY: SyntaxKind is #[repr(u16)] with contiguous discriminants
        // starting at 0, and the assertion above keeps `raw` in range.
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

pub type SyntaxNode = rowan::SyntaxNode<TsLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<TsLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<TsLanguage>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<TsLanguage>;
