//! Lifecycle executor: runs one suite instance through setup, test and teardown phases.
//!
//! ## State machine
//!
//! ```text
//! Idle -> RunningSetups -> RunningTests -> RunningTeardowns -> Done
//!              |                                               ^
//!              +------------ any setup Suppressed -------------+
//! ```
//!
//! - Each method ends `Completed`, `Suppressed` (it raised one of its own declared failure kinds), or
//!   raises an unmatched failure, which aborts the whole run and propagates as
//!   [`RunError::Unmatched`].
//! - In every phase the first `Suppressed` method stops the rest of that phase.
//! - Tests and teardowns run only if no setup was `Suppressed`. Teardowns then run whatever
//!   happened in the test phase.

use std::fmt;

use crate::engine::classify::classify;
use crate::engine::factory::SuiteInstance;
use crate::errors::RunError;
use crate::failure::Failure;
use crate::suite::MethodInfo;
use crate::tags::Role;
use crate::trace::{TraceReporter, TraceSink};

/// Lifecycle phase a method runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Setup,
    Test,
    Teardown,
}

impl Phase {
    pub fn role(self) -> Role {
        match self {
            Phase::Setup => Role::Setup,
            Phase::Test => Role::Test,
            Phase::Teardown => Role::Teardown,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Setup => "Setup",
            Phase::Test => "Test",
            Phase::Teardown => "Teardown",
        })
    }
}

/// Result of one method that did not raise an unmatched failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Ran to normal completion.
    Completed,
    /// Raised a failure of one of its declared kinds.
    Suppressed,
}

/// How a phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// Every method in the phase completed.
    Completed,
    /// The named method was suppressed; later methods of the phase were skipped.
    Halted { at: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    RunningSetups,
    RunningTests,
    RunningTeardowns,
    Done,
}

/// Run `method` on `instance` and classify what happened.
///
/// ## Returns
/// - `Ok(Completed)` when the method returns `Ok(())`.
/// - `Ok(Suppressed)` when it fails with one of its declared expected kinds.
/// - `Err(failure)` with the untouched failure otherwise.
pub fn run_method(instance: &mut SuiteInstance<'_>, method: &MethodInfo) -> Result<RunOutcome, Failure> {
    match method.invoke(instance.object_mut()) {
        Ok(()) => Ok(RunOutcome::Completed),
        Err(failure) if failure.matches_any(&method.expected_failures()) => {
            tracing::debug!(method = method.name(), kind = failure.kind().name(), "suppressed expected failure");
            Ok(RunOutcome::Suppressed)
        }
        Err(failure) => Err(failure),
    }
}

/// Drives suite instances through their lifecycle, narrating into a trace sink.
pub struct LifecycleExecutor<'s> {
    reporter: TraceReporter<'s>,
    state: LifecycleState,
}

impl<'s> LifecycleExecutor<'s> {
    pub fn new(sink: &'s mut dyn TraceSink) -> Self {
        Self {
            reporter: TraceReporter::new(sink),
            state: LifecycleState::Idle,
        }
    }

    /// State reached by the last run. A run aborted by an unmatched failure stays in the phase
    /// that raised it.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Run the whole lifecycle of `instance`, consuming it.
    #[tracing::instrument(skip_all, fields(suite = instance.suite().name()))]
    pub fn run(&mut self, mut instance: SuiteInstance<'_>) -> Result<(), RunError> {
        self.state = LifecycleState::Idle;
        self.reporter.on_suite_start(instance.suite());
        let sets = classify(&instance);

        self.transition(LifecycleState::RunningSetups);
        let setups = self.run_phase(&mut instance, Phase::Setup, &sets.setups)?;

        if setups == PhaseOutcome::Completed {
            self.transition(LifecycleState::RunningTests);
            self.run_phase(&mut instance, Phase::Test, &sets.tests)?;

            self.transition(LifecycleState::RunningTeardowns);
            self.run_phase(&mut instance, Phase::Teardown, &sets.teardowns)?;
        }

        self.transition(LifecycleState::Done);
        Ok(())
    }

    /// Run `methods` in order until one is suppressed or raises an unmatched failure.
    pub fn run_phase(
        &mut self,
        instance: &mut SuiteInstance<'_>,
        phase: Phase,
        methods: &[&MethodInfo],
    ) -> Result<PhaseOutcome, RunError> {
        for method in methods {
            self.reporter.on_method_start(phase, method);
            match run_method(instance, method) {
                Ok(RunOutcome::Completed) => {}
                Ok(RunOutcome::Suppressed) => {
                    tracing::debug!(%phase, method = method.name(), "phase halted");
                    return Ok(PhaseOutcome::Halted { at: method.name() });
                }
                Err(failure) => {
                    return Err(RunError::Unmatched {
                        suite: instance.suite().name(),
                        phase,
                        method: method.name(),
                        failure,
                    });
                }
            }
        }
        Ok(PhaseOutcome::Completed)
    }

    fn transition(&mut self, next: LifecycleState) {
        tracing::debug!(from = ?self.state, to = ?next, "lifecycle transition");
        self.state = next;
    }
}
