// routemeta lexer: TypeScript source text to a lossless token stream.

mod cursor;

use cursor::Cursor;
use routemeta_common::token::{keyword_from_str, Token, TokenKind};

/// Converts source text into tokens, trivia included.
///
/// Implements `Iterator<Item = Token>`; the final item is always a single
/// zero-width `Eof`. Concatenating the text of every token reproduces the
/// source byte for byte.
///
/// Regular expression literals are not recognized (`/` is always an
/// operator). Template literals lex as one `StringLiteral` token.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    emitted_eof: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            emitted_eof: false,
        }
    }

    /// Tokenize the whole source, including the final `Eof`.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source).collect()
    }

    fn next_token(&mut self) -> Token {
        let start = self.cursor.pos();
        let Some(c) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, start, start);
        };

        let kind = match c {
            c if c.is_whitespace() => {
                self.cursor.eat_while(char::is_whitespace);
                TokenKind::Whitespace
            }
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            ',' => self.single(TokenKind::Comma),
            ':' => self.single(TokenKind::Colon),
            ';' => self.single(TokenKind::Semicolon),
            '+' => self.single(TokenKind::Plus),
            '-' => self.single(TokenKind::Minus),
            '*' => self.single(TokenKind::Star),
            '%' => self.single(TokenKind::Percent),
            '/' => self.lex_slash(),
            '=' => self.lex_eq(),
            '!' => self.lex_bang(),
            '<' => self.with_optional_eq(TokenKind::Lt, TokenKind::LtEq),
            '>' => self.with_optional_eq(TokenKind::Gt, TokenKind::GtEq),
            '&' => self.doubled('&', TokenKind::Amp, TokenKind::AmpAmp),
            '|' => self.doubled('|', TokenKind::Bar, TokenKind::PipePipe),
            '?' => self.lex_question(),
            '.' => self.lex_dot(),
            '"' | '\'' | '`' => self.lex_string(c),
            '0'..='9' => self.lex_number(),
            c if is_ident_start(c) => self.lex_ident(start),
            _ => {
                self.cursor.advance();
                TokenKind::Error
            }
        };
        Token::new(kind, start, self.cursor.pos())
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.cursor.advance();
        kind
    }

    /// `<` / `<=` and `>` / `>=`.
    ///
    /// `>>` is never joined so that nested type argument lists such as
    /// `Array<Array<number>>` close one bracket at a time.
    fn with_optional_eq(&mut self, bare: TokenKind, with_eq: TokenKind) -> TokenKind {
        self.cursor.advance();
        if self.cursor.eat('=') {
            with_eq
        } else {
            bare
        }
    }

    /// `&` / `&&`, `|` / `||`.
    fn doubled(&mut self, c: char, single: TokenKind, double: TokenKind) -> TokenKind {
        self.cursor.advance();
        if self.cursor.eat(c) {
            double
        } else {
            single
        }
    }

    /// `=`, `==`, `===`, `=>`
    fn lex_eq(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.eat('>') {
            TokenKind::FatArrow
        } else if self.cursor.eat('=') {
            if self.cursor.eat('=') {
                TokenKind::EqEqEq
            } else {
                TokenKind::EqEq
            }
        } else {
            TokenKind::Eq
        }
    }

    /// `!`, `!=`, `!==`
    fn lex_bang(&mut self) -> TokenKind {
        self.cursor.advance();
        if !self.cursor.eat('=') {
            TokenKind::Bang
        } else if self.cursor.eat('=') {
            TokenKind::NotEqEq
        } else {
            TokenKind::NotEq
        }
    }

    /// `?`, `??`, `?.` (but `a ? .5 : 1` keeps `?` apart from the number).
    fn lex_question(&mut self) -> TokenKind {
        self.cursor.advance();
        match (self.cursor.peek(), self.cursor.nth(1)) {
            (Some('?'), _) => {
                self.cursor.advance();
                TokenKind::QuestionQuestion
            }
            (Some('.'), next) if !next.is_some_and(|c| c.is_ascii_digit()) => {
                self.cursor.advance();
                TokenKind::QuestionDot
            }
            _ => TokenKind::Question,
        }
    }

    /// `.`, `...`, or a number such as `.5`.
    fn lex_dot(&mut self) -> TokenKind {
        if self.cursor.nth(1).is_some_and(|c| c.is_ascii_digit()) {
            return self.lex_number();
        }
        self.cursor.advance();
        if self.cursor.peek() == Some('.') && self.cursor.nth(1) == Some('.') {
            self.cursor.advance();
            self.cursor.advance();
            TokenKind::DotDotDot
        } else {
            TokenKind::Dot
        }
    }

    /// `/`, `// line comment`, `/* block comment */`.
    fn lex_slash(&mut self) -> TokenKind {
        self.cursor.advance();
        match self.cursor.peek() {
            Some('/') => {
                self.cursor.eat_while(|c| c != '\n');
                TokenKind::LineComment
            }
            Some('*') => {
                self.cursor.advance();
                loop {
                    match self.cursor.advance() {
                        Some('*') if self.cursor.eat('/') => break TokenKind::BlockComment,
                        Some(_) => {}
                        None => break TokenKind::Error,
                    }
                }
            }
            _ => TokenKind::Slash,
        }
    }

    /// A quoted string up to and including the closing quote. Backslash
    /// escapes are skipped over, not decoded. A newline inside a `'` or `"`
    /// string, or end of input, makes it an `Error` token.
    fn lex_string(&mut self, quote: char) -> TokenKind {
        self.cursor.advance();
        loop {
            match self.cursor.peek() {
                None => return TokenKind::Error,
                Some('\n') if quote != '`' => return TokenKind::Error,
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some(c) => {
                    self.cursor.advance();
                    if c == quote {
                        return TokenKind::StringLiteral;
                    }
                }
            }
        }
    }

    fn lex_number(&mut self) -> TokenKind {
        if self.cursor.peek() == Some('0')
            && matches!(self.cursor.nth(1), Some('x' | 'X' | 'b' | 'B' | 'o' | 'O'))
        {
            self.cursor.advance();
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_hexdigit() || c == '_');
            return TokenKind::NumberLiteral;
        }

        self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
        if self.cursor.peek() == Some('.') && self.cursor.nth(1) != Some('.') {
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
        }
        if matches!(self.cursor.peek(), Some('e' | 'E')) {
            let signed = matches!(self.cursor.nth(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.cursor.nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.cursor.advance();
                if signed {
                    self.cursor.advance();
                }
                self.cursor.eat_while(|c| c.is_ascii_digit());
            }
        }
        TokenKind::NumberLiteral
    }

    fn lex_ident(&mut self, start: u32) -> TokenKind {
        self.cursor.eat_while(is_ident_continue);
        let text = self.cursor.slice(start, self.cursor.pos());
        keyword_from_str(text).unwrap_or(TokenKind::Ident)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.emitted_eof = true;
        }
        Some(token)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source)
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn empty_source_is_just_eof() {
        let tokens = Lexer::tokenize("");
        assert_eq!(tokens, vec![Token::new(TokenKind::Eof, 0, 0)]);
    }

    #[test]
    fn equality_operators_take_longest_match() {
        assert_eq!(
            kinds("= == === != !== => !"),
            vec![
                TokenKind::Eq,
                TokenKind::EqEq,
                TokenKind::EqEqEq,
                TokenKind::NotEq,
                TokenKind::NotEqEq,
                TokenKind::FatArrow,
                TokenKind::Bang,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn nested_generic_closers_stay_separate() {
        assert_eq!(
            kinds("Array<Array<number>>"),
            vec![
                TokenKind::Ident,
                TokenKind::Lt,
                TokenKind::Ident,
                TokenKind::Lt,
                TokenKind::Ident,
                TokenKind::Gt,
                TokenKind::Gt,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn question_forms() {
        assert_eq!(
            kinds("a ?? b?.c ? .5 : 1"),
            vec![
                TokenKind::Ident,
                TokenKind::QuestionQuestion,
                TokenKind::Ident,
                TokenKind::QuestionDot,
                TokenKind::Ident,
                TokenKind::Question,
                TokenKind::NumberLiteral,
                TokenKind::Colon,
                TokenKind::NumberLiteral,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_block_comment_is_error() {
        assert_eq!(kinds("/* open"), vec![TokenKind::Error, TokenKind::Eof]);
    }

    #[test]
    fn string_with_escaped_quote() {
        let src = r#""a\"b" 'c'"#;
        let tokens = Lexer::tokenize(src);
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].span.to_range(), 0..6);
        assert_eq!(tokens[2].kind, TokenKind::StringLiteral);
    }
}
