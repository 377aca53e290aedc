//! Suite registration.
//!
//! Suites are described by an explicit registration table instead of runtime reflection: a
//! [`SuiteType`] records the type's name, its type-level tags, an optional no-argument constructor
//! and the ordered table of its methods. Descriptors are built with [`SuiteType::builder`] and
//! [`Method`], grouped into [`Module`]s, and consumed by the engine in [`crate::engine`].
//!
//! ## Examples
//!
//! ```rust
//! use trellis::{Method, MethodResult, SuiteType};
//!
//! #[derive(Default)]
//! struct Counter {
//!     hits: u32,
//! }
//!
//! impl Counter {
//!     fn init(&mut self) -> MethodResult {
//!         self.hits = 0;
//!         Ok(())
//!     }
//!
//!     fn hit(&mut self) -> MethodResult {
//!         self.hits += 1;
//!         Ok(())
//!     }
//! }
//!
//! let suite = SuiteType::builder::<Counter>("demo::Counter")
//!     .suite()
//!     .default_constructor()
//!     .method(Method::new("init", Counter::init).setup())
//!     .method(Method::new("hit", Counter::hit).test())
//!     .build();
//!
//! assert!(suite.is_suite());
//! assert_eq!(suite.methods().len(), 2);
//! ```

use std::any::{Any, type_name};
use std::error::Error as StdError;
use std::fmt;
use std::marker::PhantomData;

use thiserror::Error;

use crate::failure::{Failure, FailureKind, MethodResult};
use crate::tags::{self, MethodTag, Role, TypeTag};

/// Type-erased no-argument constructor.
pub(crate) type Constructor = Box<dyn Fn() -> Result<Box<dyn Any>, Failure>>;

/// Type-erased method invoker.
pub(crate) type Invoker = Box<dyn Fn(&mut dyn Any) -> MethodResult>;

/// Raised when an invoker receives an instance of a different type than it was registered for.
#[derive(Debug, Error)]
#[error("method `{method}` expects an instance of `{expected}`")]
pub struct InstanceMismatch {
    pub method: &'static str,
    pub expected: &'static str,
}

// ============================================================================
// Method descriptors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// How a method is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Receiver {
    /// Called on the suite instance (`&mut self`).
    #[default]
    Instance,
    /// Called without an instance.
    Associated,
}

/// One registered, no-argument, unit-returning method.
pub struct MethodInfo {
    name: &'static str,
    visibility: Visibility,
    receiver: Receiver,
    tags: Vec<MethodTag>,
    invoke: Invoker,
}

impl MethodInfo {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn receiver(&self) -> Receiver {
        self.receiver
    }

    pub fn tags(&self) -> &[MethodTag] {
        &self.tags
    }

    pub fn has_tag(&self, tag: MethodTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.has_tag(role.tag())
    }

    /// Declared expected-failure kinds, in declaration order.
    pub fn expected_failures(&self) -> Vec<FailureKind> {
        tags::expected_failures(&self.tags)
    }

    /// Rust-style signature used in trace lines, e.g. `fn init(&mut self)`.
    pub fn signature(&self) -> String {
        match self.receiver {
            Receiver::Instance => format!("fn {}(&mut self)", self.name),
            Receiver::Associated => format!("fn {}()", self.name),
        }
    }

    pub(crate) fn invoke(&self, instance: &mut dyn Any) -> MethodResult {
        (self.invoke)(instance)
    }
}

impl fmt::Debug for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInfo")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("receiver", &self.receiver)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

/// Typed builder for one method of suite type `S`.
pub struct Method<S> {
    name: &'static str,
    visibility: Visibility,
    receiver: Receiver,
    tags: Vec<MethodTag>,
    invoke: Invoker,
    _suite: PhantomData<fn(&mut S)>,
}

impl<S: 'static> Method<S> {
    /// An instance method, public and untagged.
    pub fn new(name: &'static str, f: impl Fn(&mut S) -> MethodResult + 'static) -> Self {
        let invoke: Invoker = Box::new(move |instance: &mut dyn Any| match instance.downcast_mut::<S>() {
            Some(this) => f(this),
            None => Err(Failure::new(InstanceMismatch {
                method: name,
                expected: type_name::<S>(),
            })),
        });
        Self::with_invoker(name, Receiver::Instance, invoke)
    }

    /// An associated function (no receiver). The classifier never selects these.
    pub fn associated(name: &'static str, f: impl Fn() -> MethodResult + 'static) -> Self {
        let invoke: Invoker = Box::new(move |_: &mut dyn Any| f());
        Self::with_invoker(name, Receiver::Associated, invoke)
    }

    fn with_invoker(name: &'static str, receiver: Receiver, invoke: Invoker) -> Self {
        Self {
            name,
            visibility: Visibility::Public,
            receiver,
            tags: Vec::new(),
            invoke,
            _suite: PhantomData,
        }
    }

    pub fn setup(self) -> Self {
        self.tag(MethodTag::Setup)
    }

    pub fn teardown(self) -> Self {
        self.tag(MethodTag::Teardown)
    }

    pub fn test(self) -> Self {
        self.tag(MethodTag::Test)
    }

    /// Declare that a failure of type `E` is expected from this method.
    pub fn expects<E: StdError + 'static>(self) -> Self {
        self.tag(MethodTag::ExpectsFailure(FailureKind::of::<E>()))
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    pub fn tag(mut self, tag: MethodTag) -> Self {
        self.tags.push(tag);
        self
    }

    fn into_info(self) -> MethodInfo {
        MethodInfo {
            name: self.name,
            visibility: self.visibility,
            receiver: self.receiver,
            tags: self.tags,
            invoke: self.invoke,
        }
    }
}

// ============================================================================
// Suite descriptors
// ============================================================================

/// Registered description of one type.
pub struct SuiteType {
    name: &'static str,
    tags: Vec<TypeTag>,
    constructor: Option<Constructor>,
    methods: Vec<MethodInfo>,
}

impl SuiteType {
    pub fn builder<S: 'static>(name: &'static str) -> SuiteBuilder<S> {
        SuiteBuilder {
            suite: SuiteType {
                name,
                tags: Vec::new(),
                constructor: None,
                methods: Vec::new(),
            },
            _suite: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tags(&self) -> &[TypeTag] {
        &self.tags
    }

    pub fn has_tag(&self, tag: TypeTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn is_suite(&self) -> bool {
        self.has_tag(TypeTag::Suite)
    }

    /// Methods in registration order.
    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    pub(crate) fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }
}

impl fmt::Debug for SuiteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiteType")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("has_constructor", &self.has_constructor())
            .field("methods", &self.methods)
            .finish()
    }
}

/// Typed builder for a [`SuiteType`] describing `S`.
pub struct SuiteBuilder<S> {
    suite: SuiteType,
    _suite: PhantomData<fn() -> S>,
}

impl<S: 'static> SuiteBuilder<S> {
    /// Tag the type as a test suite.
    pub fn suite(self) -> Self {
        self.tag(TypeTag::Suite)
    }

    pub fn tag(mut self, tag: TypeTag) -> Self {
        self.suite.tags.push(tag);
        self
    }

    /// Register a no-argument constructor that may fail.
    pub fn constructor(mut self, f: impl Fn() -> Result<S, Failure> + 'static) -> Self {
        self.suite.constructor = Some(Box::new(move || f().map(|s| Box::new(s) as Box<dyn Any>)));
        self
    }

    /// Register a method. Declaration order is the order methods run within their role.
    pub fn method(mut self, method: Method<S>) -> Self {
        self.suite.methods.push(method.into_info());
        self
    }

    pub fn build(self) -> SuiteType {
        self.suite
    }
}

impl<S: Default + 'static> SuiteBuilder<S> {
    /// Register `S::default` as the no-argument constructor.
    pub fn default_constructor(self) -> Self {
        self.constructor(|| Ok(S::default()))
    }
}

/// A type that can describe itself, used by [`crate::TestRunner::run`].
pub trait Suite: Sized + 'static {
    fn suite_type() -> SuiteType;
}

// ============================================================================
// Modules
// ============================================================================

/// A named group of registered types, the unit a whole-module run enumerates.
#[derive(Debug)]
pub struct Module {
    name: String,
    types: Vec<SuiteType>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
        }
    }

    pub fn with_type(mut self, suite: SuiteType) -> Self {
        self.types.push(suite);
        self
    }

    pub fn push(&mut self, suite: SuiteType) {
        self.types.push(suite);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every registered type, tagged or not.
    pub fn types(&self) -> &[SuiteType] {
        &self.types
    }

    /// Types tagged [`TypeTag::Suite`], in registration order.
    pub fn suites(&self) -> impl Iterator<Item = &SuiteType> {
        self.types.iter().filter(|t| t.is_suite())
    }
}
