//! Type errors.
//!
//! The checker is lenient: every error is recorded here and the offending
//! expression gets type `any`, so checking always runs to completion.

use std::fmt;

use rowan::TextRange;

#[derive(Clone, Debug, PartialEq)]
pub enum TypeError {
    /// An identifier in value position with no declaration in scope.
    UnresolvedName { name: String, span: TextRange },
    /// A type reference with no declaration in scope.
    UnresolvedType { name: String, span: TextRange },
    /// Property access on a type without that property.
    UnknownProperty {
        ty: String,
        name: String,
        span: TextRange,
    },
    /// A call on a value whose type has no call signature.
    NotCallable { ty: String, span: TextRange },
    /// `new` on a value whose type has no construct signature.
    NotConstructable { ty: String, span: TextRange },
    /// A generic type referenced with the wrong number of type arguments.
    TypeArgumentCount {
        name: String,
        expected: usize,
        found: usize,
        span: TextRange,
    },
}

impl TypeError {
    pub fn span(&self) -> TextRange {
        match self {
            TypeError::UnresolvedName { span, .. }
            | TypeError::UnresolvedType { span, .. }
            | TypeError::UnknownProperty { span, .. }
            | TypeError::NotCallable { span, .. }
            | TypeError::NotConstructable { span, .. }
            | TypeError::TypeArgumentCount { span, .. } => *span,
        }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeError::UnresolvedName { name, .. } => {
                write!(f, "cannot find name `{}`", name)
            }
            TypeError::UnresolvedType { name, .. } => {
                write!(f, "cannot find type `{}`", name)
            }
            TypeError::UnknownProperty { ty, name, .. } => {
                write!(f, "property `{}` does not exist on type `{}`", name, ty)
            }
            TypeError::NotCallable { ty, .. } => {
                write!(f, "type `{}` has no call signatures", ty)
            }
            TypeError::NotConstructable { ty, .. } => {
                write!(f, "type `{}` is not constructable", ty)
            }
            TypeError::TypeArgumentCount {
                name,
                expected,
                found,
                ..
            } => {
                write!(
                    f,
                    "generic type `{}` expects {} type arguments, found {}",
                    name, expected, found
                )
            }
        }
    }
}

impl std::error::Error for TypeError {}
