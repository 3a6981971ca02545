//! Failures of the rewrite pass.
//!
//! Every failure aborts the unit: no rewritten tree and no manifest are
//! produced. Each variant names what was expected and what was found.

use rowan::TextRange;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RewriteError {
    #[error("expected exactly one `export default` statement, found {found}")]
    MultipleOrMissingExports {
        found: usize,
        span: Option<TextRange>,
    },

    #[error("malformed default export: {reason}")]
    MalformedExport {
        reason: String,
        span: Option<TextRange>,
    },

    #[error("default export `{name}` does not resolve to a value declaration")]
    UnresolvedExport {
        name: String,
        span: Option<TextRange>,
    },

    #[error("default export must be an instance of class `{expected}`, found `{found}`")]
    WrongExportType {
        expected: String,
        found: String,
        span: Option<TextRange>,
    },

    #[error("type `{ty}` has no registration method `{method}`")]
    MissingRegistrationMethod {
        ty: String,
        method: String,
        span: Option<TextRange>,
    },

    #[error("expected {expected} {what}, found {found}")]
    ArityError {
        what: String,
        expected: usize,
        found: usize,
        span: Option<TextRange>,
    },

    #[error("handler must have exactly one call signature, found {found}")]
    AmbiguousSignature {
        found: usize,
        span: Option<TextRange>,
    },

    #[error("handler must be an inline function literal, found {found}")]
    UnsupportedHandlerShape {
        found: String,
        span: Option<TextRange>,
    },

    #[error("cannot describe type `{ty}` as a schema: {reason}")]
    UnsupportedTypeShape {
        ty: String,
        reason: String,
        span: Option<TextRange>,
    },

    #[error("malformed {node}: expected {expected}")]
    MalformedNode {
        node: String,
        expected: String,
        span: Option<TextRange>,
    },
}

impl RewriteError {
    pub fn code(&self) -> &'static str {
        match self {
            RewriteError::MultipleOrMissingExports { .. } => "R0001",
            RewriteError::MalformedExport { .. } => "R0002",
            RewriteError::UnresolvedExport { .. } => "R0003",
            RewriteError::WrongExportType { .. } => "R0004",
            RewriteError::MissingRegistrationMethod { .. } => "R0005",
            RewriteError::ArityError { .. } => "R0006",
            RewriteError::AmbiguousSignature { .. } => "R0007",
            RewriteError::UnsupportedHandlerShape { .. } => "R0008",
            RewriteError::UnsupportedTypeShape { .. } => "R0009",
            RewriteError::MalformedNode { .. } => "R0010",
        }
    }

    pub fn span(&self) -> Option<TextRange> {
        match self {
            RewriteError::MultipleOrMissingExports { span, .. }
            | RewriteError::MalformedExport { span, .. }
            | RewriteError::UnresolvedExport { span, .. }
            | RewriteError::WrongExportType { span, .. }
            | RewriteError::MissingRegistrationMethod { span, .. }
            | RewriteError::ArityError { span, .. }
            | RewriteError::AmbiguousSignature { span, .. }
            | RewriteError::UnsupportedHandlerShape { span, .. }
            | RewriteError::UnsupportedTypeShape { span, .. }
            | RewriteError::MalformedNode { span, .. } => *span,
        }
    }

    /// Attach `range` unless the error already points somewhere.
    ///
    /// Schema lowering works on types, not nodes; the rewriter places its
    /// failures at the handler parameter or body.
    pub fn at(mut self, range: TextRange) -> Self {
        match &mut self {
            RewriteError::MultipleOrMissingExports { span, .. }
            | RewriteError::MalformedExport { span, .. }
            | RewriteError::UnresolvedExport { span, .. }
            | RewriteError::WrongExportType { span, .. }
            | RewriteError::MissingRegistrationMethod { span, .. }
            | RewriteError::ArityError { span, .. }
            | RewriteError::AmbiguousSignature { span, .. }
            | RewriteError::UnsupportedHandlerShape { span, .. }
            | RewriteError::UnsupportedTypeShape { span, .. }
            | RewriteError::MalformedNode { span, .. } => {
                if span.is_none() {
                    *span = Some(range);
                }
            }
        }
        self
    }
}

pub type Result<T, E = RewriteError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(start.into(), end.into())
    }

    #[test]
    fn messages_name_expected_and_found() {
        let err = RewriteError::WrongExportType {
            expected: "RouteMap".to_string(),
            found: "Router".to_string(),
            span: None,
        };
        assert_eq!(
            err.to_string(),
            "default export must be an instance of class `RouteMap`, found `Router`"
        );
        let err = RewriteError::ArityError {
            what: "arguments to `route`".to_string(),
            expected: 3,
            found: 2,
            span: None,
        };
        assert_eq!(err.to_string(), "expected 3 arguments to `route`, found 2");
    }

    #[test]
    fn at_keeps_an_existing_span() {
        let err = RewriteError::AmbiguousSignature {
            found: 2,
            span: Some(range(1, 4)),
        };
        assert_eq!(err.at(range(10, 20)).span(), Some(range(1, 4)));

        let err = RewriteError::UnsupportedTypeShape {
            ty: "string | number".to_string(),
            reason: "unions have no schema".to_string(),
            span: None,
        };
        let err = err.at(range(10, 20));
        assert_eq!(err.span(), Some(range(10, 20)));
        assert_eq!(err.code(), "R0009");
    }
}
