#![forbid(unsafe_code)]
//! Trellis: a small tag-driven test lifecycle runner.
//!
//! Trellis runs test suites in environments that have no full test framework. Suites are plain
//! types registered with tags: the type is tagged as a suite and its methods as setup, test or
//! teardown, optionally declaring the failure kinds they are expected to raise. The engine builds
//! one instance per suite, runs setups, tests and teardowns in declaration order, and narrates
//! each step into a trace sink.
//!
//! ## Quick start
//!
//! ```rust
//! use thiserror::Error;
//! use trellis::{Method, MethodResult, Suite, SuiteType, TestRunner};
//!
//! #[derive(Debug, Error)]
//! #[error("boom")]
//! struct Boom;
//!
//! #[derive(Default)]
//! struct Smoke;
//!
//! impl Smoke {
//!     fn works(&mut self) -> MethodResult {
//!         Ok(())
//!     }
//!
//!     fn explodes(&mut self) -> MethodResult {
//!         Err(Boom.into())
//!     }
//! }
//!
//! impl Suite for Smoke {
//!     fn suite_type() -> SuiteType {
//!         SuiteType::builder::<Smoke>("demo::Smoke")
//!             .suite()
//!             .default_constructor()
//!             .method(Method::new("works", Smoke::works).test())
//!             .method(Method::new("explodes", Smoke::explodes).test().expects::<Boom>())
//!             .build()
//!     }
//! }
//!
//! let mut runner = TestRunner::new(Vec::<String>::new());
//! runner.run::<Smoke>().unwrap();
//! assert_eq!(runner.sink().len(), 3);
//! ```
//!
//! ## Panic Policy
//!
//! - **Production code**: `Result` / `Option` with `?`. The `cli` module denies `clippy::unwrap_used`
//!   and `clippy::expect_used`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//! - **Suite code**: panics raised by registered methods are not caught; they unwind through the
//!   entry point like any other unexpected failure.

pub mod cli;
pub mod engine;
pub mod errors;
pub mod failure;
pub mod loader;
pub mod selftest;
pub mod suite;
pub mod tags;
pub mod trace;
pub mod version;

pub use engine::{LifecycleState, Phase, RunOutcome, TestRunner};
pub use errors::{ConstructionError, ConstructionFailures, RunError};
pub use failure::{Failure, FailureKind, MethodResult};
pub use suite::{Method, MethodInfo, Module, Suite, SuiteType};
pub use tags::{MethodTag, Role, TypeTag};
pub use trace::{TraceSink, TracingSink, WriterSink};
