//! Errors surfaced by the engine.
//!
//! `Suppressed` method outcomes are not errors and never appear here. Everything in this module is
//! something the caller of an entry point has to deal with.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

use crate::engine::executor::Phase;
use crate::failure::Failure;

/// A registered suite that could not be instantiated.
#[derive(Debug, Error, Diagnostic)]
pub enum ConstructionError {
    #[error("`{suite}` has no accessible no-argument constructor")]
    #[diagnostic(
        code(trellis::no_constructor),
        help("register one with `.constructor(..)` or `.default_constructor()`")
    )]
    NoConstructor { suite: &'static str },

    #[error("constructing `{suite}` raised {failure}")]
    #[diagnostic(code(trellis::constructor_failed))]
    Raised { suite: &'static str, failure: Failure },
}

impl ConstructionError {
    pub fn suite(&self) -> &'static str {
        match self {
            ConstructionError::NoConstructor { suite } | ConstructionError::Raised { suite, .. } => suite,
        }
    }
}

/// Every suite of a run that failed construction, in attempt order.
#[derive(Debug, Default)]
pub struct ConstructionFailures(pub Vec<ConstructionError>);

impl ConstructionFailures {
    pub fn iter(&self) -> impl Iterator<Item = &ConstructionError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ConstructionFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.0.iter().map(|e| e.suite()).collect();
        write!(f, "{} suite(s) could not be constructed: {}", self.0.len(), names.join(", "))
    }
}

/// Error returned by the entry points of [`crate::TestRunner`].
#[derive(Debug, Error, Diagnostic)]
pub enum RunError {
    #[error("{argument} is absent")]
    #[diagnostic(code(trellis::argument_absent))]
    ArgumentAbsent { argument: &'static str },

    #[error("{0}")]
    #[diagnostic(code(trellis::construction))]
    Construction(ConstructionFailures),

    #[error("{phase} method `{method}` of `{suite}` raised unexpected {failure}")]
    #[diagnostic(
        code(trellis::unmatched_failure),
        help("declare the kind with `.expects::<Kind>()` if this failure is intended")
    )]
    Unmatched {
        suite: &'static str,
        phase: Phase,
        method: &'static str,
        failure: Failure,
    },
}

impl RunError {
    /// The raised failure of an [`RunError::Unmatched`], untouched.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            RunError::Unmatched { failure, .. } => Some(failure),
            _ => None,
        }
    }

    /// Take the raised failure of an [`RunError::Unmatched`], giving back any other error.
    pub fn into_failure(self) -> Result<Failure, RunError> {
        match self {
            RunError::Unmatched { failure, .. } => Ok(failure),
            other => Err(other),
        }
    }
}

impl From<ConstructionError> for RunError {
    fn from(error: ConstructionError) -> Self {
        RunError::Construction(ConstructionFailures(vec![error]))
    }
}
