//! Best-effort lifecycle reporting.
//!
//! Bootstrap and destroy keep going when one binding fails; every failure
//! is logged and collected into a [`LifecycleReport`].

use std::fmt;

use tracing::warn;

use crate::error::LigandError;
use crate::key::TypeKey;

/// The lifecycle step a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Constructing an eager singleton.
    EagerConstruction,
    /// Injecting the fields of a deferred eager singleton.
    EagerFieldInjection,
    /// Running the post-inject methods of a deferred eager singleton.
    EagerMethodInjection,
    /// Resolving an instance binding at bootstrap.
    EagerInstance,
    /// Running a pre-destroy method.
    PreDestroy,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::EagerConstruction => "eager construction",
            Phase::EagerFieldInjection => "eager field injection",
            Phase::EagerMethodInjection => "eager method injection",
            Phase::EagerInstance => "eager instance",
            Phase::PreDestroy => "pre-destroy",
        };
        f.write_str(name)
    }
}

/// One failed lifecycle step.
#[derive(Debug)]
pub struct LifecycleFailure {
    pub key: TypeKey,
    pub phase: Phase,
    pub error: LigandError,
}

impl fmt::Display for LifecycleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} failed: {}", self.phase, self.key, self.error)
    }
}

/// Outcome of a bootstrap or destroy run.
#[derive(Debug, Default)]
pub struct LifecycleReport {
    completed: usize,
    failures: Vec<LifecycleFailure>,
}

impl LifecycleReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one successful step.
    pub fn complete(&mut self) {
        self.completed += 1;
    }

    /// Records a failed step and logs it.
    pub fn record(&mut self, key: TypeKey, phase: Phase, error: LigandError) {
        warn!(key = %key, phase = %phase, error = %error, "Lifecycle step failed");
        self.failures.push(LifecycleFailure { key, phase, error });
    }

    /// Records the outcome of one step.
    pub fn track<T>(&mut self, key: TypeKey, phase: Phase, outcome: crate::error::Result<T>) -> Option<T> {
        match outcome {
            Ok(value) => {
                self.complete();
                Some(value)
            }
            Err(error) => {
                self.record(key, phase, error);
                None
            }
        }
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn failures(&self) -> &[LifecycleFailure] {
        &self.failures
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// `Ok(())` when nothing failed, the report otherwise.
    pub fn into_result(self) -> Result<(), LifecycleReport> {
        if self.is_success() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for LifecycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} step(s) completed, {} failed", self.completed, self.failures.len())?;
        for failure in &self.failures {
            write!(f, "\n  - {failure}")?;
        }
        Ok(())
    }
}
