//! Event-based parser.
//!
//! Parse functions call `open()` to start a node, `advance()` to consume
//! tokens and `close()` to finish a node with its real kind. Events collect
//! in a flat `Vec<Event>` and `build_tree()` replays them into a rowan
//! `GreenNode`. `open_before()` wraps an already completed node (turning
//! `callee` into `CALL_EXPR(callee, ARG_LIST)`) through a forward-parent
//! link instead of inserting into the event list.
//!
//! # Trivia
//!
//! Lookahead (`current`, `nth`, `lookahead`) skips whitespace and comments.
//! `advance()` emits the skipped trivia right before the significant token,
//! and `open()` flushes pending trivia first, so every node starts at a
//! significant token and leading comments belong to the enclosing node.

pub(crate) mod expressions;
pub(crate) mod items;
pub(crate) mod types;

use routemeta_common::span::Span;
use routemeta_common::token::Token;

use crate::error::ParseError;
use crate::syntax_kind::SyntaxKind;

#[derive(Debug)]
enum Event {
    /// Start a node. `kind` stays TOMBSTONE until `close()` patches it.
    Open {
        kind: SyntaxKind,
        forward_parent: Option<usize>,
    },
    Close,
    /// Consume the next raw token (trivia included).
    Advance,
}

/// A started but not yet closed node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkOpened {
    index: usize,
}

/// A completed node, usable with [`Parser::open_before`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkClosed {
    index: usize,
}

pub(crate) struct Parser<'src> {
    /// All tokens from the lexer, trivia included, ending with `Eof`.
    tokens: Vec<Token>,
    /// Index of the next raw token to consume.
    pos: usize,
    events: Vec<Event>,
    source: &'src str,
    errors: Vec<ParseError>,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(tokens: Vec<Token>, source: &'src str) -> Self {
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
            source,
            errors: Vec::new(),
        }
    }

    // ── Lookahead ──────────────────────────────────────────────────────

    pub(crate) fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Kind of the `n`th significant token ahead; `EOF` past the end.
    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        self.lookahead().nth(n).unwrap_or(SyntaxKind::EOF)
    }

    /// Significant token kinds from the current position onwards. Used by
    /// the bounded scans that disambiguate arrows and type arguments.
    pub(crate) fn lookahead(&self) -> impl Iterator<Item = SyntaxKind> + '_ {
        self.tokens[self.pos..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .map(|t| SyntaxKind::from(t.kind))
    }

    pub(crate) fn current_text(&self) -> &'src str {
        let pos = self.skip_trivia(self.pos);
        match self.tokens.get(pos) {
            Some(token) => &self.source[token.span.to_range()],
            None => "",
        }
    }

    pub(crate) fn current_span(&self) -> Span {
        let pos = self.skip_trivia(self.pos);
        match self.tokens.get(pos) {
            Some(token) => token.span,
            None => {
                let end = self.source.len() as u32;
                Span::new(end, end)
            }
        }
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current())
    }

    /// At an identifier whose text is `word` (contextual keywords such as
    /// `constructor`).
    pub(crate) fn at_contextual(&self, word: &str) -> bool {
        self.at(SyntaxKind::IDENT) && self.current_text() == word
    }

    /// Significant-token offset just past the `)` that matches the `(`
    /// `skip` tokens ahead, or `None` if input ends first.
    pub(crate) fn offset_past_parens(&self, skip: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, kind) in self.lookahead().enumerate().skip(skip) {
            match kind {
                SyntaxKind::L_PAREN => depth += 1,
                SyntaxKind::R_PAREN => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(i + 1);
                    }
                }
                SyntaxKind::EOF => return None,
                _ => {}
            }
        }
        None
    }

    // ── Node management ────────────────────────────────────────────────

    /// Start a node at the next significant token.
    pub(crate) fn open(&mut self) -> MarkOpened {
        // The root node has to wrap everything, so only inner nodes flush.
        if !self.events.is_empty() {
            self.flush_trivia();
        }
        let mark = MarkOpened {
            index: self.events.len(),
        };
        self.events.push(Event::Open {
            kind: SyntaxKind::TOMBSTONE,
            forward_parent: None,
        });
        mark
    }

    /// Start a node that will become the parent of `completed`.
    pub(crate) fn open_before(&mut self, completed: MarkClosed) -> MarkOpened {
        let mark = MarkOpened {
            index: self.events.len(),
        };
        self.events.push(Event::Open {
            kind: SyntaxKind::TOMBSTONE,
            forward_parent: None,
        });
        if let Event::Open { forward_parent, .. } = &mut self.events[completed.index] {
            *forward_parent = Some(mark.index);
        }
        mark
    }

    pub(crate) fn close(&mut self, m: MarkOpened, kind: SyntaxKind) -> MarkClosed {
        if let Event::Open { kind: slot, .. } = &mut self.events[m.index] {
            *slot = kind;
        }
        self.events.push(Event::Close);
        MarkClosed { index: m.index }
    }

    // ── Token consumption ──────────────────────────────────────────────

    /// Consume pending trivia and then the current significant token.
    pub(crate) fn advance(&mut self) {
        self.flush_trivia();
        if self.pos < self.tokens.len() {
            self.events.push(Event::Advance);
            self.pos += 1;
        }
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error(&format!("expected {}", describe(kind)));
        false
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn flush_trivia(&mut self) {
        while self.pos < self.tokens.len() && self.tokens[self.pos].kind.is_trivia() {
            self.events.push(Event::Advance);
            self.pos += 1;
        }
    }

    fn skip_trivia(&self, mut pos: usize) -> usize {
        while pos < self.tokens.len() && self.tokens[pos].kind.is_trivia() {
            pos += 1;
        }
        pos
    }

    // ── Error reporting ────────────────────────────────────────────────

    /// Record an error at the current token. Only the first error is kept;
    /// once it is set, parse functions unwind without consuming input.
    pub(crate) fn error(&mut self, message: &str) {
        if self.errors.is_empty() {
            let span = self.current_span();
            self.errors.push(ParseError::new(message, span));
        }
    }

    pub(crate) fn error_with_related(&mut self, message: &str, related_span: Span, related: &str) {
        if self.errors.is_empty() {
            let span = self.current_span();
            self.errors
                .push(ParseError::with_related(message, span, related, related_span));
        }
    }

    pub(crate) fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }

    // ── Tree building ──────────────────────────────────────────────────

    /// Replay the events into a green tree.
    ///
    /// An Open event with a forward parent starts the chain of wrappers it
    /// points to, outermost first; the wrapper events are then tombstoned
    /// so they are skipped when the replay reaches them.
    pub(crate) fn build_tree(mut self) -> (rowan::GreenNode, Vec<ParseError>) {
        let mut builder = rowan::GreenNodeBuilder::new();
        let tokens = std::mem::take(&mut self.tokens);
        let mut tokens = tokens.iter();
        let mut chain: Vec<SyntaxKind> = Vec::new();

        for i in 0..self.events.len() {
            match self.events[i] {
                Event::Open {
                    kind,
                    forward_parent: None,
                } => {
                    if kind != SyntaxKind::TOMBSTONE {
                        builder.start_node(rowan::SyntaxKind(kind as u16));
                    }
                }
                Event::Open {
                    kind,
                    forward_parent: Some(_),
                } => {
                    chain.clear();
                    chain.push(kind);
                    let mut next = self.take_forward_parent(i);
                    while let Some(parent) = next {
                        if let Event::Open { kind, .. } = self.events[parent] {
                            chain.push(kind);
                        }
                        next = self.take_forward_parent(parent);
                        if let Event::Open { kind, .. } = &mut self.events[parent] {
                            *kind = SyntaxKind::TOMBSTONE;
                        }
                    }
                    for &kind in chain.iter().rev() {
                        if kind != SyntaxKind::TOMBSTONE {
                            builder.start_node(rowan::SyntaxKind(kind as u16));
                        }
                    }
                }
                Event::Close => builder.finish_node(),
                Event::Advance => {
                    if let Some(token) = tokens.next() {
                        let kind = SyntaxKind::from(token.kind);
                        builder.token(
                            rowan::SyntaxKind(kind as u16),
                            &self.source[token.span.to_range()],
                        );
                    }
                }
            }
        }

        (builder.finish(), self.errors)
    }

    fn take_forward_parent(&mut self, index: usize) -> Option<usize> {
        match &mut self.events[index] {
            Event::Open { forward_parent, .. } => forward_parent.take(),
            _ => None,
        }
    }
}

/// Human-readable token name for "expected ..." messages.
pub(crate) fn describe(kind: SyntaxKind) -> String {
    let text = match kind {
        SyntaxKind::L_PAREN => "(",
        SyntaxKind::R_PAREN => ")",
        SyntaxKind::L_BRACKET => "[",
        SyntaxKind::R_BRACKET => "]",
        SyntaxKind::L_BRACE => "{",
        SyntaxKind::R_BRACE => "}",
        SyntaxKind::COMMA => ",",
        SyntaxKind::COLON => ":",
        SyntaxKind::SEMICOLON => ";",
        SyntaxKind::EQ => "=",
        SyntaxKind::GT => ">",
        SyntaxKind::FAT_ARROW => "=>",
        SyntaxKind::IDENT => return "identifier".to_string(),
        SyntaxKind::EOF => return "end of file".to_string(),
        other => {
            let name = format!("{other:?}");
            return match name.strip_suffix("_KW") {
                Some(kw) => format!("`{}`", kw.to_ascii_lowercase()),
                None => name,
            };
        }
    };
    format!("`{text}`")
}

// ── Top-level parsing ──────────────────────────────────────────────────

/// SOURCE_FILE(STMT_LIST(stmt*), EOF).
///
/// After the first error the remaining input is swept into an ERROR_NODE so
/// the tree stays lossless.
pub(crate) fn parse_source_file(p: &mut Parser) {
    let root = p.open();

    let list = p.open();
    while !p.at(SyntaxKind::EOF) && !p.has_error() {
        items::stmt(p);
    }
    if !p.at(SyntaxKind::EOF) {
        let err = p.open();
        while !p.at(SyntaxKind::EOF) {
            p.advance();
        }
        p.close(err, SyntaxKind::ERROR_NODE);
    }
    p.close(list, SyntaxKind::STMT_LIST);

    p.advance(); // EOF, with any trailing trivia before it
    p.close(root, SyntaxKind::SOURCE_FILE);
}
