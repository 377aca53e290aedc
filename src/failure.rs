//! Failures raised by suite methods and constructors.
//!
//! A [`Failure`] owns the concrete error a method returned together with its [`FailureKind`], the
//! identity used for expected-failure matching. Kinds compare by exact type identity: a declared
//! kind matches only failures whose concrete error type is that very type.

use std::any::{TypeId, type_name};
use std::error::Error as StdError;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Boxed error payload carried by a [`Failure`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result returned by every registered suite method.
pub type MethodResult = Result<(), Failure>;

/// Identity of a failure type.
#[derive(Clone, Copy)]
pub struct FailureKind {
    id: TypeId,
    name: &'static str,
}

impl FailureKind {
    /// The kind of errors of concrete type `E`.
    pub fn of<E: StdError + 'static>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: type_name::<E>(),
        }
    }

    /// Fully qualified type name, for display only.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of [`FailureKind::name`].
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }
}

impl PartialEq for FailureKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FailureKind {}

impl Hash for FailureKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FailureKind({})", self.name)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// An error raised by a suite method or constructor.
///
/// Any `std::error::Error` converts into a `Failure` with `?` or `.into()`, so methods read as
/// `Err(Boom)?` or `return Err(Boom.into())`.
pub struct Failure {
    kind: FailureKind,
    error: BoxError,
}

impl Failure {
    pub fn new<E: StdError + Send + Sync + 'static>(error: E) -> Self {
        Self {
            kind: FailureKind::of::<E>(),
            error: Box::new(error),
        }
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Whether this failure's kind is one of `kinds`.
    pub fn matches_any(&self, kinds: &[FailureKind]) -> bool {
        kinds.contains(&self.kind)
    }

    pub fn is<E: StdError + 'static>(&self) -> bool {
        self.kind == FailureKind::of::<E>()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.error.downcast_ref::<E>()
    }

    /// Recover the concrete error, or give the failure back unchanged.
    pub fn downcast<E: StdError + 'static>(self) -> Result<E, Self> {
        let kind = self.kind;
        match self.error.downcast::<E>() {
            Ok(error) => Ok(*error),
            Err(error) => Err(Self { kind, error }),
        }
    }

    pub fn into_inner(self) -> BoxError {
        self.error
    }

    pub fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.error.as_ref()
    }
}

impl<E: StdError + Send + Sync + 'static> From<E> for Failure {
    fn from(error: E) -> Self {
        Self::new(error)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("kind", &self.kind)
            .field("error", &self.error)
            .finish()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.short_name(), self.error)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error, PartialEq)]
    #[error("boom ({0})")]
    struct Boom(u32);

    #[derive(Debug, Error)]
    #[error("oops")]
    struct Oops;

    #[test]
    fn test_kind_identity_is_exact() {
        assert_eq!(FailureKind::of::<Boom>(), FailureKind::of::<Boom>());
        assert_ne!(FailureKind::of::<Boom>(), FailureKind::of::<Oops>());
        assert_eq!(FailureKind::of::<Boom>().short_name(), "Boom");
    }

    #[test]
    fn test_failure_keeps_payload() {
        let failure: Failure = Boom(7).into();
        assert!(failure.is::<Boom>());
        assert!(!failure.is::<Oops>());
        assert_eq!(failure.downcast_ref::<Boom>(), Some(&Boom(7)));
        assert_eq!(failure.to_string(), "Boom: boom (7)");

        let failure = failure.downcast::<Oops>().unwrap_err();
        assert_eq!(failure.downcast::<Boom>().unwrap(), Boom(7));
    }

    #[test]
    fn test_matches_any() {
        let failure = Failure::new(Oops);
        assert!(failure.matches_any(&[FailureKind::of::<Boom>(), FailureKind::of::<Oops>()]));
        assert!(!failure.matches_any(&[FailureKind::of::<Boom>()]));
        assert!(!failure.matches_any(&[]));
    }

    #[test]
    fn test_question_mark_conversion() {
        fn raises() -> MethodResult {
            let step: Result<(), Oops> = Err(Oops);
            step?;
            Ok(())
        }
        assert!(raises().unwrap_err().is::<Oops>());
    }
}
