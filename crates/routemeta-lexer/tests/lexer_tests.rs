use insta::assert_snapshot;
use routemeta_lexer::Lexer;

/// One line per token: kind, byte range and text.
fn dump(source: &str) -> String {
    Lexer::tokenize(source)
        .into_iter()
        .map(|tok| {
            let text = &source[tok.span.to_range()];
            format!("{:?} {}..{} {:?}", tok.kind, tok.span.start, tok.span.end, text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn registration_call() {
    assert_snapshot!(dump(r#"rm.route("GET", q => 1);"#), @r#"
    Ident 0..2 "rm"
    Dot 2..3 "."
    Ident 3..8 "route"
    LParen 8..9 "("
    StringLiteral 9..14 "\"GET\""
    Comma 14..15 ","
    Whitespace 15..16 " "
    Ident 16..17 "q"
    Whitespace 17..18 " "
    FatArrow 18..20 "=>"
    Whitespace 20..21 " "
    NumberLiteral 21..22 "1"
    RParen 22..23 ")"
    Semicolon 23..24 ";"
    Eof 24..24 ""
    "#);
}

#[test]
fn comments_are_trivia_tokens() {
    assert_snapshot!(dump("/** doc */\nexport default x; // tail"), @r#"
    BlockComment 0..10 "/** doc */"
    Whitespace 10..11 "\n"
    Export 11..17 "export"
    Whitespace 17..18 " "
    Default 18..25 "default"
    Whitespace 25..26 " "
    Ident 26..27 "x"
    Semicolon 27..28 ";"
    Whitespace 28..29 " "
    LineComment 29..36 "// tail"
    Eof 36..36 ""
    "#);
}

#[test]
fn optional_member_type() {
    assert_snapshot!(dump("maxAge?: number[]"), @r#"
    Ident 0..6 "maxAge"
    Question 6..7 "?"
    Colon 7..8 ":"
    Whitespace 8..9 " "
    Ident 9..15 "number"
    LBracket 15..16 "["
    RBracket 16..17 "]"
    Eof 17..17 ""
    "#);
}

#[test]
fn numbers() {
    assert_snapshot!(dump("0xff 1.5e3 10 .25"), @r#"
    NumberLiteral 0..4 "0xff"
    Whitespace 4..5 " "
    NumberLiteral 5..10 "1.5e3"
    Whitespace 10..11 " "
    NumberLiteral 11..13 "10"
    Whitespace 13..14 " "
    NumberLiteral 14..17 ".25"
    Eof 17..17 ""
    "#);
}

#[test]
fn token_text_reassembles_source() {
    let source = include_str!("../../../fixtures/simple_endpoint.ts");
    let rebuilt: String = Lexer::tokenize(source)
        .iter()
        .map(|tok| &source[tok.span.to_range()])
        .collect();
    assert_eq!(rebuilt, source);
}

#[test]
fn unterminated_string_is_error() {
    assert_snapshot!(dump("'abc\nx"), @r#"
    Error 0..4 "'abc"
    Whitespace 4..5 "\n"
    Ident 5..6 "x"
    Eof 6..6 ""
    "#);
}
