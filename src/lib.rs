//! specunit: a small BDD-style test harness.
//!
//! Test code declares nested suites and cases against a [`Runner`], makes
//! fluent assertions through [`CaseScope::expect`], and gets back an immutable
//! [`RunReport`] that any [`Reporter`] can render.

pub use crate::driver::TestTree;
pub use crate::errors::{AssertionError, CaseError, CaseResult, ConfigError};
pub use crate::matcher::{Expect, Matcher};
pub use crate::model::{Case, Expectation, Outcome, RunReport, Suite, SuiteChild};
pub use crate::report::{Reporter, ReporterKind};
pub use crate::runner::{CaseScope, Runner};
pub use crate::value::Value;

pub mod cli;
pub mod config;
pub mod driver;
pub mod errors;
pub mod matcher;
pub mod model;
pub mod report;
pub mod runner;
pub mod value;
