//! SyntaxKind enum for the routemeta CST.
//!
//! A superset of `TokenKind` (mapped to SCREAMING_SNAKE_CASE) plus the
//! composite node kinds produced by the parser.

use routemeta_common::token::TokenKind;

/// Every kind of syntax element in the CST.
///
/// Token kinds (leaves) map 1:1 from [`TokenKind`]. The first two values are
/// sentinels used by the event-based parser. `__LAST` must stay the final
/// variant; it sizes per-kind tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // ── Sentinels ──────────────────────────────────────────────────────
    /// Placeholder kind for events that were opened but later abandoned.
    TOMBSTONE = 0,
    /// Wrapper for tokens the parser could not place.
    ERROR_NODE = 1,

    // ── Keywords ───────────────────────────────────────────────────────
    AS_KW,
    CLASS_KW,
    CONST_KW,
    DECLARE_KW,
    DEFAULT_KW,
    ELSE_KW,
    EXPORT_KW,
    EXTENDS_KW,
    FALSE_KW,
    FUNCTION_KW,
    IF_KW,
    IMPLEMENTS_KW,
    INTERFACE_KW,
    LET_KW,
    NEW_KW,
    NULL_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    PUBLIC_KW,
    READONLY_KW,
    RETURN_KW,
    STATIC_KW,
    THIS_KW,
    TRUE_KW,
    TYPE_KW,
    TYPEOF_KW,
    VAR_KW,
    VOID_KW,

    // ── Operators ──────────────────────────────────────────────────────
    PLUS,
    MINUS,
    STAR,
    SLASH,
    PERCENT,
    EQ,
    EQ_EQ,
    EQ_EQ_EQ,
    NOT_EQ,
    NOT_EQ_EQ,
    LT,
    GT,
    LT_EQ,
    GT_EQ,
    AMP_AMP,
    PIPE_PIPE,
    QUESTION_QUESTION,
    BANG,
    QUESTION,
    QUESTION_DOT,
    BAR,
    AMP,
    FAT_ARROW,
    DOT,
    DOT_DOT_DOT,

    // ── Delimiters and punctuation ─────────────────────────────────────
    L_PAREN,
    R_PAREN,
    L_BRACKET,
    R_BRACKET,
    L_BRACE,
    R_BRACE,
    COMMA,
    COLON,
    SEMICOLON,

    // ── Literals, names, trivia, special ───────────────────────────────
    NUMBER_LITERAL,
    STRING_LITERAL,
    IDENT,
    WHITESPACE,
    LINE_COMMENT,
    BLOCK_COMMENT,
    EOF,
    ERROR,

    // ── Structure ──────────────────────────────────────────────────────
    SOURCE_FILE,
    /// Ordered statements of a source file.
    STMT_LIST,
    /// `export`, `declare`, `public`, `static`, `readonly`, ...
    MODIFIER_LIST,

    // ── Declarations ───────────────────────────────────────────────────
    /// `type Name<T> = Type;`
    TYPE_ALIAS_DECL,
    /// `interface Name<T> extends A { ... }`
    INTERFACE_DECL,
    /// `class Name<T> extends Base { ... }`
    CLASS_DECL,
    /// `{ members }` of a class.
    CLASS_BODY,
    /// `function name(params): R { ... }`
    FUNCTION_DECL,
    /// `const a = 1, b: T = f();`
    VAR_STMT,
    /// One `name: T = init` inside a VAR_STMT.
    VAR_DECLARATOR,
    /// `{ a, b: c }` in place of a declarator name.
    OBJECT_BINDING_PATTERN,
    /// `a` or `key: a` inside an OBJECT_BINDING_PATTERN.
    BINDING_ELEMENT,
    /// `export default expr;`
    EXPORT_DEFAULT,
    /// `extends A, B`
    EXTENDS_CLAUSE,
    /// `implements I, J`
    IMPLEMENTS_CLAUSE,

    // ── Statements ─────────────────────────────────────────────────────
    EXPR_STMT,
    RETURN_STMT,
    IF_STMT,
    /// `{ stmts }`
    BLOCK,
    /// A lone `;`.
    EMPTY_STMT,

    // ── Members ────────────────────────────────────────────────────────
    /// Class field: `name?: T = init;`
    PROPERTY_DECL,
    /// Class method: `name<T>(params): R { ... }`
    METHOD_DECL,
    /// `constructor(params) { ... }`
    CONSTRUCTOR_DECL,
    /// Type literal / interface member `name?: T`.
    PROPERTY_SIGNATURE,
    /// Type literal / interface member `name(params): R`.
    METHOD_SIGNATURE,
    /// `[key: string]: T`
    INDEX_SIGNATURE,

    // ── Names, parameters, generics ────────────────────────────────────
    /// Declared name (binding site).
    NAME,
    /// Referenced name (use site).
    NAME_REF,
    PARAM_LIST,
    PARAM,
    /// `: Type`
    TYPE_ANNOTATION,
    TYPE_PARAM_LIST,
    /// `T extends Bound = Default`
    TYPE_PARAM,
    TYPE_ARG_LIST,

    // ── Expressions ────────────────────────────────────────────────────
    /// Number, string, `true`, `false`, `null`.
    LITERAL,
    THIS_EXPR,
    PAREN_EXPR,
    OBJECT_LITERAL,
    /// `key: value` inside an object literal.
    PROPERTY_ASSIGNMENT,
    /// `key` inside an object literal (short for `key: key`).
    SHORTHAND_PROPERTY,
    /// `...expr` in array/object literals and argument lists.
    SPREAD_ELEMENT,
    ARRAY_LITERAL,
    /// `(params): R => body` or `x => body`
    ARROW_FUNCTION,
    /// `function (params): R { ... }`
    FUNCTION_EXPR,
    /// `callee<T>(args)`
    CALL_EXPR,
    /// `(args)` of a call or `new`.
    ARG_LIST,
    /// `new Callee<T>(args)`
    NEW_EXPR,
    /// `object.name` or `object?.name`
    PROPERTY_ACCESS,
    /// `object[index]`
    INDEX_EXPR,
    /// `!x`, `-x`, `typeof x`, ...
    PREFIX_EXPR,
    BINARY_EXPR,
    /// `cond ? a : b`
    CONDITIONAL_EXPR,
    /// `target = value`
    ASSIGN_EXPR,
    /// `expr as Type`
    AS_EXPR,

    // ── Types ──────────────────────────────────────────────────────────
    /// `Name` or `Name<Args>`; primitive names are references too.
    TYPE_REF,
    /// `T[]`
    ARRAY_TYPE,
    /// `A | B`
    UNION_TYPE,
    /// `{ members }`, also the body of an interface.
    TYPE_LITERAL,
    /// `(params) => R`
    FUNCTION_TYPE,
    /// `(T)`
    PAREN_TYPE,
    /// `this` in type position.
    THIS_TYPE,
    /// `"GET"`, `1`, `true` in type position.
    LITERAL_TYPE,
    /// `void` or `null` in type position.
    PREDEFINED_TYPE,

    /// Number of kinds. Not a real kind.
    __LAST,
}

impl SyntaxKind {
    /// Whitespace and comments.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::WHITESPACE | SyntaxKind::LINE_COMMENT | SyntaxKind::BLOCK_COMMENT
        )
    }

    /// Keyword tokens. These may still appear as property names.
    pub fn is_keyword(self) -> bool {
        (SyntaxKind::AS_KW..=SyntaxKind::VOID_KW).contains(&self)
    }

    /// Total number of kinds, for dense per-kind tables.
    pub const COUNT: usize = SyntaxKind::__LAST as usize;
}

impl From<TokenKind> for SyntaxKind {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::As => SyntaxKind::AS_KW,
            TokenKind::Class => SyntaxKind::CLASS_KW,
            TokenKind::Const => SyntaxKind::CONST_KW,
            TokenKind::Declare => SyntaxKind::DECLARE_KW,
            TokenKind::Default => SyntaxKind::DEFAULT_KW,
            TokenKind::Else => SyntaxKind::ELSE_KW,
            TokenKind::Export => SyntaxKind::EXPORT_KW,
            TokenKind::Extends => SyntaxKind::EXTENDS_KW,
            TokenKind::False => SyntaxKind::FALSE_KW,
            TokenKind::Function => SyntaxKind::FUNCTION_KW,
            TokenKind::If => SyntaxKind::IF_KW,
            TokenKind::Implements => SyntaxKind::IMPLEMENTS_KW,
            TokenKind::Interface => SyntaxKind::INTERFACE_KW,
            TokenKind::Let => SyntaxKind::LET_KW,
            TokenKind::New => SyntaxKind::NEW_KW,
            TokenKind::Null => SyntaxKind::NULL_KW,
            TokenKind::Private => SyntaxKind::PRIVATE_KW,
            TokenKind::Protected => SyntaxKind::PROTECTED_KW,
            TokenKind::Public => SyntaxKind::PUBLIC_KW,
            TokenKind::Readonly => SyntaxKind::READONLY_KW,
            TokenKind::Return => SyntaxKind::RETURN_KW,
            TokenKind::Static => SyntaxKind::STATIC_KW,
            TokenKind::This => SyntaxKind::THIS_KW,
            TokenKind::True => SyntaxKind::TRUE_KW,
            TokenKind::Type => SyntaxKind::TYPE_KW,
            TokenKind::Typeof => SyntaxKind::TYPEOF_KW,
            TokenKind::Var => SyntaxKind::VAR_KW,
            TokenKind::Void => SyntaxKind::VOID_KW,

            TokenKind::Plus => SyntaxKind::PLUS,
            TokenKind::Minus => SyntaxKind::MINUS,
            TokenKind::Star => SyntaxKind::STAR,
            TokenKind::Slash => SyntaxKind::SLASH,
            TokenKind::Percent => SyntaxKind::PERCENT,
            TokenKind::Eq => SyntaxKind::EQ,
            TokenKind::EqEq => SyntaxKind::EQ_EQ,
            TokenKind::EqEqEq => SyntaxKind::EQ_EQ_EQ,
            TokenKind::NotEq => SyntaxKind::NOT_EQ,
            TokenKind::NotEqEq => SyntaxKind::NOT_EQ_EQ,
            TokenKind::Lt => SyntaxKind::LT,
            TokenKind::Gt => SyntaxKind::GT,
            TokenKind::LtEq => SyntaxKind::LT_EQ,
            TokenKind::GtEq => SyntaxKind::GT_EQ,
            TokenKind::AmpAmp => SyntaxKind::AMP_AMP,
            TokenKind::PipePipe => SyntaxKind::PIPE_PIPE,
            TokenKind::QuestionQuestion => SyntaxKind::QUESTION_QUESTION,
            TokenKind::Bang => SyntaxKind::BANG,
            TokenKind::Question => SyntaxKind::QUESTION,
            TokenKind::QuestionDot => SyntaxKind::QUESTION_DOT,
            TokenKind::Bar => SyntaxKind::BAR,
            TokenKind::Amp => SyntaxKind::AMP,
            TokenKind::FatArrow => SyntaxKind::FAT_ARROW,
            TokenKind::Dot => SyntaxKind::DOT,
            TokenKind::DotDotDot => SyntaxKind::DOT_DOT_DOT,

            TokenKind::LParen => SyntaxKind::L_PAREN,
            TokenKind::RParen => SyntaxKind::R_PAREN,
            TokenKind::LBracket => SyntaxKind::L_BRACKET,
            TokenKind::RBracket => SyntaxKind::R_BRACKET,
            TokenKind::LBrace => SyntaxKind::L_BRACE,
            TokenKind::RBrace => SyntaxKind::R_BRACE,
            TokenKind::Comma => SyntaxKind::COMMA,
            TokenKind::Colon => SyntaxKind::COLON,
            TokenKind::Semicolon => SyntaxKind::SEMICOLON,

            TokenKind::NumberLiteral => SyntaxKind::NUMBER_LITERAL,
            TokenKind::StringLiteral => SyntaxKind::STRING_LITERAL,
            TokenKind::Ident => SyntaxKind::IDENT,
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::LineComment => SyntaxKind::LINE_COMMENT,
            TokenKind::BlockComment => SyntaxKind::BLOCK_COMMENT,
            TokenKind::Eof => SyntaxKind::EOF,
            TokenKind::Error => SyntaxKind::ERROR,
        }
    }
}
