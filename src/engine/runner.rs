//! Entry points: resolve what to run down to suite instances and hand each to the executor.
//!
//! Three equivalent paths exist:
//! - [`TestRunner::run_module`]: every type in a module tagged `Suite`, in registration order.
//! - [`TestRunner::run_type`]: one explicit descriptor; a type without the `Suite` tag is a silent
//!   no-op.
//! - [`TestRunner::run`]: one type resolved statically through [`Suite::suite_type`].
//!
//! Entry points return nothing on success. A caller only observes the trace and propagated errors.

use crate::engine::executor::LifecycleExecutor;
use crate::engine::factory::{SuiteInstance, construct};
use crate::errors::{ConstructionFailures, RunError};
use crate::suite::{Module, Suite, SuiteType};
use crate::trace::{TraceSink, TracingSink};

/// Runs suites and narrates them into its sink.
pub struct TestRunner<T: TraceSink = TracingSink> {
    sink: T,
}

impl Default for TestRunner<TracingSink> {
    fn default() -> Self {
        Self::new(TracingSink)
    }
}

impl<T: TraceSink> TestRunner<T> {
    pub fn new(sink: T) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &T {
        &self.sink
    }

    pub fn into_sink(self) -> T {
        self.sink
    }

    /// Run every `Suite`-tagged type of `module`.
    ///
    /// A suite that cannot be constructed is skipped and the remaining suites are still attempted;
    /// the collected construction errors are returned once every suite has been tried. An unmatched
    /// failure stops the whole module immediately.
    ///
    /// ## Errors
    /// - [`RunError::ArgumentAbsent`] if `module` is `None`.
    /// - [`RunError::Unmatched`] from the first suite that raises one.
    /// - [`RunError::Construction`] listing every suite that could not be built.
    pub fn run_module(&mut self, module: Option<&Module>) -> Result<(), RunError> {
        let module = module.ok_or(RunError::ArgumentAbsent { argument: "module" })?;
        tracing::debug!(module = module.name(), "running module");

        let mut failures = Vec::new();
        for suite in module.suites() {
            match construct(suite) {
                Ok(instance) => self.execute(instance)?,
                Err(e) => {
                    tracing::warn!(suite = suite.name(), "skipping suite: {}", e);
                    failures.push(e);
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(RunError::Construction(ConstructionFailures(failures)))
        }
    }

    /// Run one explicitly given type if it is tagged `Suite`.
    ///
    /// ## Errors
    /// - [`RunError::ArgumentAbsent`] if `suite` is `None`.
    /// - [`RunError::Construction`] if the suite cannot be built.
    /// - [`RunError::Unmatched`] if one of its methods raises an undeclared failure.
    pub fn run_type(&mut self, suite: Option<&SuiteType>) -> Result<(), RunError> {
        let suite = suite.ok_or(RunError::ArgumentAbsent { argument: "suite" })?;
        self.run_tagged(suite)
    }

    /// Run the statically known suite type `S`. Same semantics as [`TestRunner::run_type`].
    pub fn run<S: Suite>(&mut self) -> Result<(), RunError> {
        let suite = S::suite_type();
        self.run_tagged(&suite)
    }

    fn run_tagged(&mut self, suite: &SuiteType) -> Result<(), RunError> {
        if !suite.is_suite() {
            tracing::debug!(suite = suite.name(), "not tagged as a suite; nothing to run");
            return Ok(());
        }
        let instance = construct(suite)?;
        self.execute(instance)
    }

    fn execute(&mut self, instance: SuiteInstance<'_>) -> Result<(), RunError> {
        LifecycleExecutor::new(&mut self.sink).run(instance)
    }
}
