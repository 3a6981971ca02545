//! Parse errors.

use std::fmt;

use routemeta_common::span::Span;

/// A parse error with its location and an optional related location
/// (e.g. where an unclosed brace was opened).
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    pub related: Option<(String, Span)>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            related: None,
        }
    }

    pub fn with_related(
        message: impl Into<String>,
        span: Span,
        related_message: impl Into<String>,
        related_span: Span,
    ) -> Self {
        Self {
            message: message.into(),
            span,
            related: Some((related_message.into(), related_span)),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn related_span_is_kept() {
        let err = ParseError::with_related(
            "expected `}`",
            Span::new(40, 40),
            "class body opened here",
            Span::new(10, 11),
        );
        assert_eq!(err.to_string(), "expected `}`");
        assert_eq!(
            err.related,
            Some(("class body opened here".to_string(), Span::new(10, 11)))
        );
    }
}
