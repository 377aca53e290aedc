//! Tag vocabulary.
//!
//! Tags are the declarative markers the engine discovers suites and lifecycle methods by. They are
//! attached at registration time (see [`crate::suite`]) and never change afterwards.
//!
//! ## Notes
//! - Role tags are checked independently of each other. A method carrying both `Setup` and `Test`
//!   is classified as both.
//! - `ExpectsFailure` is repeatable; a method may declare any number of kinds.

use crate::failure::FailureKind;

/// Type-level tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Marks a type as a test suite.
    Suite,
}

/// Method-level tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodTag {
    /// Run before the test phase.
    Setup,
    /// Run after the test phase.
    Teardown,
    /// A unit test.
    Test,
    /// A failure of this kind raised by the method is expected and suppressed.
    ExpectsFailure(FailureKind),
}

impl MethodTag {
    /// The lifecycle role this tag assigns, if any.
    pub fn role(&self) -> Option<Role> {
        match self {
            MethodTag::Setup => Some(Role::Setup),
            MethodTag::Teardown => Some(Role::Teardown),
            MethodTag::Test => Some(Role::Test),
            MethodTag::ExpectsFailure(_) => None,
        }
    }

    pub fn id(&self) -> TagId {
        match self {
            MethodTag::Setup => TagId::Setup,
            MethodTag::Teardown => TagId::Teardown,
            MethodTag::Test => TagId::Test,
            MethodTag::ExpectsFailure(_) => TagId::ExpectsFailure,
        }
    }
}

/// Lifecycle role of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Setup,
    Teardown,
    Test,
}

impl Role {
    pub fn tag(self) -> MethodTag {
        match self {
            Role::Setup => MethodTag::Setup,
            Role::Teardown => MethodTag::Teardown,
            Role::Test => MethodTag::Test,
        }
    }
}

// ============================================================================
// Lookup helpers
// ============================================================================

/// Stable identifier for every tag, parameterized or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagId {
    Suite,
    Setup,
    Teardown,
    Test,
    ExpectsFailure,
}

/// All tags with the given id, in declaration order.
pub fn all(tags: &[MethodTag], id: TagId) -> impl Iterator<Item = &MethodTag> {
    tags.iter().filter(move |t| t.id() == id)
}

/// Declared expected-failure kinds, in declaration order.
pub fn expected_failures(tags: &[MethodTag]) -> Vec<FailureKind> {
    all(tags, TagId::ExpectsFailure)
        .filter_map(|t| match t {
            MethodTag::ExpectsFailure(kind) => Some(*kind),
            _ => None,
        })
        .collect()
}
