//! The discovery-and-execution engine.
//!
//! ## Pipeline
//!
//! entry point ([`runner`]) → instance factory ([`factory`]) → method classifier ([`classify`]) →
//! lifecycle executor ([`executor`]), with every step narrated through [`crate::trace`].
//!
//! Everything here is single-threaded and synchronous. One suite finishes its whole lifecycle before
//! the next one is constructed.

pub mod classify;
pub mod executor;
pub mod factory;
pub mod runner;

pub use classify::{MethodSets, classify};
pub use executor::{LifecycleExecutor, LifecycleState, Phase, PhaseOutcome, RunOutcome, run_method};
pub use factory::{SuiteInstance, construct};
pub use runner::TestRunner;
