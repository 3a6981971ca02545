use serde::Serialize;

use crate::span::Span;

/// A token produced by the routemeta lexer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, start: u32, end: u32) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }
}

/// Every kind of token in the TypeScript subset the rewriter reads.
///
/// The lexer is lossless: whitespace and comments are tokens too, so the
/// concatenated text of all tokens reproduces the input exactly. Primitive
/// type names (`string`, `number`, `any`, ...) are contextual and lex as
/// [`TokenKind::Ident`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // ── Keywords (28) ──────────────────────────────────────────────────
    As,
    Class,
    Const,
    Declare,
    Default,
    Else,
    Export,
    Extends,
    False,
    Function,
    If,
    Implements,
    Interface,
    Let,
    New,
    Null,
    Private,
    Protected,
    Public,
    Readonly,
    Return,
    Static,
    This,
    True,
    Type,
    Typeof,
    Var,
    Void,

    // ── Operators (25) ─────────────────────────────────────────────────
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `=`
    Eq,
    /// `==`
    EqEq,
    /// `===`
    EqEqEq,
    /// `!=`
    NotEq,
    /// `!==`
    NotEqEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    LtEq,
    /// `>=`
    GtEq,
    /// `&&`
    AmpAmp,
    /// `||`
    PipePipe,
    /// `??`
    QuestionQuestion,
    /// `!`
    Bang,
    /// `?`
    Question,
    /// `?.`
    QuestionDot,
    /// `|`
    Bar,
    /// `&`
    Amp,
    /// `=>`
    FatArrow,
    /// `.`
    Dot,
    /// `...`
    DotDotDot,

    // ── Delimiters (6) ─────────────────────────────────────────────────
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    // ── Punctuation (3) ────────────────────────────────────────────────
    Comma,
    Colon,
    Semicolon,

    // ── Literals and names (3) ─────────────────────────────────────────
    /// Decimal, hex or exponent number, e.g. `100`, `0xff`, `1.5e3`.
    NumberLiteral,
    /// A whole single- or double-quoted string including its quotes.
    StringLiteral,
    Ident,

    // ── Trivia (3) ─────────────────────────────────────────────────────
    Whitespace,
    /// `// ...` up to (not including) the newline.
    LineComment,
    /// `/* ... */`, including doc comments.
    BlockComment,

    // ── Special (2) ────────────────────────────────────────────────────
    Eof,
    /// Invalid or unterminated input.
    Error,
}

impl TokenKind {
    /// Whitespace and comments. The parser skips these when looking ahead
    /// but still attaches them to the tree.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }

    /// Whether this is a reserved word. Keywords are still valid property
    /// names after a `.` and inside object literals.
    pub fn is_keyword(self) -> bool {
        (self as u8) <= (TokenKind::Void as u8)
    }
}

/// Look up a keyword from its string representation.
///
/// The lexer calls this after scanning an identifier-shaped word.
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    let kind = match s {
        "as" => TokenKind::As,
        "class" => TokenKind::Class,
        "const" => TokenKind::Const,
        "declare" => TokenKind::Declare,
        "default" => TokenKind::Default,
        "else" => TokenKind::Else,
        "export" => TokenKind::Export,
        "extends" => TokenKind::Extends,
        "false" => TokenKind::False,
        "function" => TokenKind::Function,
        "if" => TokenKind::If,
        "implements" => TokenKind::Implements,
        "interface" => TokenKind::Interface,
        "let" => TokenKind::Let,
        "new" => TokenKind::New,
        "null" => TokenKind::Null,
        "private" => TokenKind::Private,
        "protected" => TokenKind::Protected,
        "public" => TokenKind::Public,
        "readonly" => TokenKind::Readonly,
        "return" => TokenKind::Return,
        "static" => TokenKind::Static,
        "this" => TokenKind::This,
        "true" => TokenKind::True,
        "type" => TokenKind::Type,
        "typeof" => TokenKind::Typeof,
        "var" => TokenKind::Var,
        "void" => TokenKind::Void,
        _ => return None,
    };
    Some(kind)
}
