use miette::Diagnostic;

use crate::{Key, Shared};

/// A failure raised by a wrapped computation, shared so every replay hands
/// back the same object.
pub type SharedError = Shared<dyn std::error::Error>;

#[derive(Debug, Clone, thiserror::Error, Diagnostic)]
pub enum Error {
    #[error("Cannot look up \"{key}\" in {found}")]
    #[diagnostic(
        code(lazier::shape_mismatch),
        help("only dicts (by field) and arrays (by index) can be dug into")
    )]
    ShapeMismatch { key: Key, found: &'static str },
    #[error("Cannot coerce {found} into {expected}")]
    #[diagnostic(code(lazier::coercion))]
    Coercion {
        expected: &'static str,
        found: &'static str,
    },
    #[error("Expected {expected}, but the value is absent")]
    #[diagnostic(code(lazier::absent))]
    Absent { expected: &'static str },
    #[error("Computation failed: {0}")]
    #[diagnostic(code(lazier::computation))]
    Computation(SharedError),
    #[error("Computation forced itself while it was being evaluated")]
    #[diagnostic(code(lazier::cycle))]
    Cycle,
    #[error("Computation panicked while it was being evaluated")]
    #[diagnostic(code(lazier::panicked))]
    Panicked,
    #[error("Maximum unwrap depth exceeded \"{0}\"")]
    #[diagnostic(
        code(lazier::unwrap_depth),
        help("a lazy value probably resolves to itself")
    )]
    UnwrapDepthExceeded(usize),
    #[error("Unknown field \"{0}\"")]
    #[diagnostic(code(lazier::unknown_field))]
    UnknownField(String),
}

impl Error {
    pub fn computation<E: std::error::Error + 'static>(error: E) -> Self {
        Error::Computation(Shared::new(error))
    }

    /// The error the wrapped computation raised, if this is one.
    pub fn computation_error(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Computation(error) => Some(error.as_ref()),
            _ => None,
        }
    }
}

// Computation failures compare by identity: a replayed failure is the same
// object, not merely an equal one.
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Error::ShapeMismatch { key: k1, found: f1 },
                Error::ShapeMismatch { key: k2, found: f2 },
            ) => k1 == k2 && f1 == f2,
            (
                Error::Coercion {
                    expected: e1,
                    found: f1,
                },
                Error::Coercion {
                    expected: e2,
                    found: f2,
                },
            ) => e1 == e2 && f1 == f2,
            (Error::Absent { expected: e1 }, Error::Absent { expected: e2 }) => e1 == e2,
            (Error::Computation(a), Error::Computation(b)) => {
                std::ptr::addr_eq(Shared::as_ptr(a), Shared::as_ptr(b))
            }
            (Error::Cycle, Error::Cycle) | (Error::Panicked, Error::Panicked) => true,
            (Error::UnwrapDepthExceeded(a), Error::UnwrapDepthExceeded(b)) => a == b,
            (Error::UnknownField(a), Error::UnknownField(b)) => a == b,
            _ => false,
        }
    }
}
