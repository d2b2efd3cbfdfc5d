//! The result tree built by a run.
//!
//! A run produces a list of top-level [`Suite`]s. Suites own nested suites and
//! [`Case`]s in declaration order, and cases own the [`Expectation`]s recorded
//! while their body ran. The tree is immutable once [`crate::runner::Runner::finish`]
//! hands it out; reporters only read it.

use serde::Serialize;

/// Outcome of a single assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
}

/// One assertion outcome recorded inside a case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expectation {
    pub label: String,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Expectation {
    pub fn pass(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            outcome: Outcome::Pass,
            reason: None,
        }
    }

    pub fn fail(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            outcome: Outcome::Fail,
            reason: Some(reason.into()),
        }
    }

    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Pass
    }
}

/// One named test body and what it recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Case {
    pub name: String,
    pub expectations: Vec<Expectation>,
    /// Number of `expect` calls made by the body.
    pub assertions: usize,
    /// Message of the error that aborted the body, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl Case {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expectations: Vec::new(),
            assertions: 0,
            failure: None,
        }
    }

    pub fn failed(&self) -> bool {
        self.failure.is_some()
    }

    /// The failure message, unless the last failed expectation already
    /// carries it as its reason.
    pub fn unexplained_failure(&self) -> Option<&str> {
        let failure = self.failure.as_deref()?;
        let last_reason = self
            .expectations
            .iter()
            .rev()
            .find(|e| !e.passed())
            .and_then(|e| e.reason.as_deref());
        (last_reason != Some(failure)).then_some(failure)
    }
}

/// A child of a suite, kept in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SuiteChild {
    Suite(Suite),
    Case(Case),
}

/// A named group of cases and nested suites.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suite {
    pub name: String,
    pub children: Vec<SuiteChild>,
    /// Number of descendant cases.
    pub test_count: usize,
    /// Number of descendant cases whose body failed.
    pub failure_count: usize,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            test_count: 0,
            failure_count: 0,
        }
    }

    pub fn push_case(&mut self, case: Case) {
        self.test_count += 1;
        if case.failed() {
            self.failure_count += 1;
        }
        self.children.push(SuiteChild::Case(case));
    }

    /// Adds a closed child suite and rolls its counts into this one.
    pub fn push_suite(&mut self, suite: Suite) {
        self.test_count += suite.test_count;
        self.failure_count += suite.failure_count;
        self.children.push(SuiteChild::Suite(suite));
    }

    pub fn cases(&self) -> impl Iterator<Item = &Case> {
        self.children.iter().filter_map(|c| match c {
            SuiteChild::Case(case) => Some(case),
            SuiteChild::Suite(_) => None,
        })
    }

    pub fn suites(&self) -> impl Iterator<Item = &Suite> {
        self.children.iter().filter_map(|c| match c {
            SuiteChild::Suite(suite) => Some(suite),
            SuiteChild::Case(_) => None,
        })
    }

    /// Total `expect` calls across all descendant cases.
    pub fn assertion_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| match c {
                SuiteChild::Suite(s) => s.assertion_count(),
                SuiteChild::Case(case) => case.assertions,
            })
            .sum()
    }

    /// Depth-first, pre-order walk over every descendant case together with
    /// the names of the suites enclosing it (this suite first).
    pub fn walk_cases<'a>(&'a self, visit: &mut dyn FnMut(&[&'a str], &'a Case)) {
        let mut path = vec![self.name.as_str()];
        self.walk_inner(&mut path, visit);
    }

    fn walk_inner<'a>(
        &'a self,
        path: &mut Vec<&'a str>,
        visit: &mut dyn FnMut(&[&'a str], &'a Case),
    ) {
        for child in &self.children {
            match child {
                SuiteChild::Case(case) => visit(path.as_slice(), case),
                SuiteChild::Suite(suite) => {
                    path.push(&suite.name);
                    suite.walk_inner(path, visit);
                    path.pop();
                }
            }
        }
    }
}

/// Everything a finished run hands to the reporters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub suites: Vec<Suite>,
    /// Run-wide count of `expect` calls.
    pub assertions: usize,
    /// Run-wide count of cases whose body failed.
    pub failed_cases: usize,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failed_cases == 0
    }

    pub fn test_count(&self) -> usize {
        self.suites.iter().map(|s| s.test_count).sum()
    }

    pub fn failure_count(&self) -> usize {
        self.suites.iter().map(|s| s.failure_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing(name: &str) -> Case {
        let mut case = Case::new(name);
        case.failure = Some("boom".into());
        case
    }

    #[test]
    fn counts_roll_up_through_nested_suites() {
        let mut left = Suite::new("left");
        left.push_case(failing("a"));
        let mut right = Suite::new("right");
        right.push_case(failing("b"));
        right.push_case(Case::new("c"));

        let mut root = Suite::new("root");
        root.push_suite(left);
        root.push_suite(right);

        assert_eq!(root.test_count, 3);
        assert_eq!(root.failure_count, 2);
        assert_eq!(root.suites().count(), 2);
        assert_eq!(root.cases().count(), 0);
    }

    #[test]
    fn walk_visits_cases_in_order_with_paths() {
        let mut inner = Suite::new("inner");
        inner.push_case(Case::new("two"));
        let mut root = Suite::new("root");
        root.push_case(Case::new("one"));
        root.push_suite(inner);
        root.push_case(Case::new("three"));

        let mut seen = Vec::new();
        root.walk_cases(&mut |path, case| seen.push(format!("{}:{}", path.join("."), case.name)));
        assert_eq!(seen, ["root:one", "root.inner:two", "root:three"]);
    }

    #[test]
    fn failure_explained_only_by_the_matching_expectation() {
        let mut case = failing("x");
        case.expectations.push(Expectation::pass("to be 1"));
        assert_eq!(case.unexplained_failure(), Some("boom"));

        case.expectations.push(Expectation::fail("to be 2", "boom"));
        assert_eq!(case.unexplained_failure(), None);

        case.failure = Some("database connection refused".into());
        assert_eq!(case.unexplained_failure(), Some("database connection refused"));
        assert_eq!(Case::new("ok").unexplained_failure(), None);
    }
}
