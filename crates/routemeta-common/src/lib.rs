//! Shared vocabulary for the routemeta crates: byte spans, line lookup and
//! the token set produced by the lexer.

pub mod span;
pub mod token;
