//! Suite and case execution.
//!
//! [`Runner`] is the run context. It keeps a stack of open suites, the closed
//! top-level suites, and the run-wide counters. Suite bodies receive the runner
//! itself and nest by calling [`Runner::describe`] and [`Runner::it`] again.
//! Case bodies receive a [`CaseScope`] and return a [`CaseResult`]; whatever
//! aborts a body (an assertion, a user error, a panic) is recorded on the case
//! and never reaches sibling cases.
//!
//! ```rust
//! use specunit::runner::Runner;
//!
//! let mut runner = Runner::new();
//! runner.describe("arithmetic", |r| {
//!     r.it("adds", |cx| {
//!         cx.expect(1 + 1).to_be(2)?;
//!         Ok(())
//!     });
//! });
//! let report = runner.finish();
//! assert!(report.is_success());
//! assert_eq!(report.assertions, 1);
//! ```

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::errors::{CaseError, CaseResult};
use crate::matcher::Expect;
use crate::model::{Case, RunReport, Suite};
use crate::value::Value;

/// Name of the implicit suite that collects cases declared outside any suite.
pub const TOP_LEVEL_SUITE: &str = "(top level)";

/// Name of the case recorded when a suite body itself panics.
pub const SUITE_BODY_CASE: &str = "(suite body)";

#[derive(Debug, Default)]
pub struct Runner {
    open: Vec<Suite>,
    finished: Vec<Suite>,
    assertions: usize,
    failed_cases: usize,
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a suite, runs `body` inside it, then closes it into its parent.
    pub fn describe<F>(&mut self, name: impl Into<String>, body: F)
    where
        F: FnOnce(&mut Runner),
    {
        let name = name.into();
        let depth = self.open.len();
        tracing::debug!(suite = %name, depth, "opening suite");
        self.open.push(Suite::new(name));

        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| body(self))) {
            let error = CaseError::from_panic(payload);
            tracing::warn!(%error, "suite body panicked outside of a case");
            // Close anything the panic left open below this suite.
            while self.open.len() > depth + 1 {
                self.close_innermost();
            }
            let mut case = Case::new(SUITE_BODY_CASE);
            case.failure = Some(error.to_string());
            self.failed_cases += 1;
            if let Some(suite) = self.open.last_mut() {
                suite.push_case(case);
            }
        }

        self.close_innermost();
    }

    /// Runs one case body under the innermost open suite.
    pub fn it<F>(&mut self, name: impl Into<String>, body: F)
    where
        F: FnOnce(&mut CaseScope<'_>) -> CaseResult,
    {
        let mut case = Case::new(name);
        let outcome = {
            let mut scope = CaseScope {
                case: &mut case,
                assertions: &mut self.assertions,
            };
            catch_unwind(AssertUnwindSafe(|| body(&mut scope)))
                .unwrap_or_else(|payload| Err(CaseError::from_panic(payload)))
        };

        match outcome {
            Ok(()) => tracing::debug!(case = %case.name, "case passed"),
            Err(error) => {
                tracing::debug!(case = %case.name, %error, "case failed");
                self.failed_cases += 1;
                case.failure = Some(error.to_string());
            }
        }
        self.current_suite().push_case(case);
    }

    /// Number of `expect` calls made so far in this run.
    pub fn assertion_count(&self) -> usize {
        self.assertions
    }

    /// Number of cases that have failed so far in this run.
    pub fn failed_case_count(&self) -> usize {
        self.failed_cases
    }

    /// Depth of the innermost open suite; zero outside any suite.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Closes the run and hands out the finished result tree.
    pub fn finish(mut self) -> RunReport {
        while !self.open.is_empty() {
            self.close_innermost();
        }
        RunReport {
            suites: self.finished,
            assertions: self.assertions,
            failed_cases: self.failed_cases,
        }
    }

    fn close_innermost(&mut self) {
        let Some(suite) = self.open.pop() else {
            return;
        };
        tracing::debug!(
            suite = %suite.name,
            tests = suite.test_count,
            failures = suite.failure_count,
            "closing suite"
        );
        match self.open.last_mut() {
            Some(parent) => parent.push_suite(suite),
            None => self.finished.push(suite),
        }
    }

    fn current_suite(&mut self) -> &mut Suite {
        if self.open.is_empty() {
            tracing::warn!("case declared outside of any suite; using '{TOP_LEVEL_SUITE}'");
            let reuse = self
                .finished
                .last()
                .is_some_and(|s| s.name == TOP_LEVEL_SUITE);
            if !reuse {
                self.finished.push(Suite::new(TOP_LEVEL_SUITE));
            }
            let last = self.finished.len() - 1;
            return &mut self.finished[last];
        }
        let innermost = self.open.len() - 1;
        &mut self.open[innermost]
    }
}

/// Per-case context handed to case bodies.
pub struct CaseScope<'r> {
    case: &'r mut Case,
    assertions: &'r mut usize,
}

impl CaseScope<'_> {
    /// Starts an assertion on `actual`. Counts as one assertion even if no
    /// matcher is applied afterwards.
    pub fn expect(&mut self, actual: impl Into<Value>) -> Expect<'_> {
        *self.assertions += 1;
        self.case.assertions += 1;
        Expect::new(self.case, actual.into())
    }

    /// Name of the running case.
    pub fn name(&self) -> &str {
        &self.case.name
    }

    /// Fails the case with a message, for use as `return cx.fail("...")`.
    pub fn fail(&self, message: impl Into<String>) -> CaseResult {
        Err(CaseError::failed(message))
    }
}
