//! The matcher engine.
//!
//! Every assertion is a [`Matcher`] evaluated against an actual [`Value`] by
//! [`evaluate`]. Negation flips how the outcome is interpreted, never the
//! predicate itself. A failed matcher returns an [`AssertionError`] which the
//! case body propagates with `?`, aborting the rest of the body.
//!
//! ## Matchers Provided
//!
//! - **Predicates**: `to`, `to_be_defined`, `to_be_undefined`, `to_be_null`,
//!   `to_be_truthy`, `to_be_falsy`
//! - **Equality**: `to_be` (strict), `to_equal` (coercive), `to_match` (regex)
//! - **Ordering**: `to_be_less_than`, `to_be_greater_than`, `to_be_close_to`
//! - **Containers and callables**: `to_contain`, `to_throw`

use std::cmp::Ordering;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use difference::{Changeset, Difference};
use regex::Regex;

use crate::errors::AssertionError;
use crate::model::{Case, Expectation};
use crate::value::Value;

/// Predicate used by [`Matcher::Satisfy`]; its result is judged by truthiness.
/// It may borrow from the case body that builds it.
pub type Predicate<'p> = Box<dyn Fn(&Value) -> Value + 'p>;

/// The closed set of assertions the engine knows how to evaluate.
pub enum Matcher<'p> {
    Satisfy(Predicate<'p>),
    Be(Value),
    Equal(Value),
    Match(String),
    Defined,
    Undefined,
    Null,
    Truthy,
    Falsy,
    Contain(Value),
    LessThan(Value),
    GreaterThan(Value),
    CloseTo { expected: f64, precision: i32 },
    Throw,
}

impl Matcher<'_> {
    /// The matcher's public name, used in diagnostics.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Satisfy(_) => "to",
            Self::Be(_) => "toBe",
            Self::Equal(_) => "toEqual",
            Self::Match(_) => "toMatch",
            Self::Defined => "toBeDefined",
            Self::Undefined => "toBeUndefined",
            Self::Null => "toBeNull",
            Self::Truthy => "toBeTruthy",
            Self::Falsy => "toBeFalsy",
            Self::Contain(_) => "toContain",
            Self::LessThan(_) => "toBeLessThan",
            Self::GreaterThan(_) => "toBeGreaterThan",
            Self::CloseTo { .. } => "toBeCloseTo",
            Self::Throw => "toThrow",
        }
    }

    /// Default expectation label, e.g. `not to be greater than 10`.
    pub fn describe(&self, negate: bool) -> String {
        let what = match self {
            Self::Satisfy(_) => "satisfy predicate".to_string(),
            Self::Be(v) => format!("be {}", v.repr()),
            Self::Equal(v) => format!("equal {}", v.repr()),
            Self::Match(p) => format!("match /{p}/"),
            Self::Defined => "be defined".to_string(),
            Self::Undefined => "be undefined".to_string(),
            Self::Null => "be null".to_string(),
            Self::Truthy => "be truthy".to_string(),
            Self::Falsy => "be falsy".to_string(),
            Self::Contain(v) => format!("contain {}", v.repr()),
            Self::LessThan(v) => format!("be less than {}", v.repr()),
            Self::GreaterThan(v) => format!("be greater than {}", v.repr()),
            Self::CloseTo {
                expected,
                precision,
            } => format!("be close to {expected} (precision {precision})"),
            Self::Throw => "throw".to_string(),
        };
        format!("{} {what}", to(negate))
    }
}

impl fmt::Debug for Matcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Matcher({})", self.describe(false))
    }
}

fn to(negate: bool) -> &'static str {
    if negate {
        "not to"
    } else {
        "to"
    }
}

// ============================================================================
// EVALUATION
// ============================================================================

/// Evaluates `matcher` against `actual`.
///
/// Returns `Ok(())` when the matcher succeeds (or fails, if `negate` is set).
/// Misuse such as matching a regex against a number is an error regardless
/// of negation.
pub fn evaluate(actual: &Value, matcher: &Matcher<'_>, negate: bool) -> Result<(), AssertionError> {
    let (success, message) = check(actual, matcher, negate)?;
    if success == negate {
        return Err(AssertionError::mismatch(matcher.name(), message));
    }
    Ok(())
}

fn check(actual: &Value, matcher: &Matcher<'_>, negate: bool) -> Result<(bool, String), AssertionError> {
    let to = to(negate);
    let outcome = match matcher {
        Matcher::Satisfy(predicate) => (
            predicate(actual).is_truthy(),
            format!("Expected callback {to} validate"),
        ),
        Matcher::Be(expected) => (
            actual.strict_eq(expected),
            equality_message(negate, "===", expected, actual),
        ),
        Matcher::Equal(expected) => (
            actual.loose_eq(expected),
            equality_message(negate, "==", expected, actual),
        ),
        Matcher::Match(pattern) => {
            let Some(text) = actual.as_str() else {
                return Err(AssertionError::NotAString {
                    pattern: pattern.clone(),
                    actual: actual.repr(),
                });
            };
            let re = Regex::new(pattern).map_err(|e| AssertionError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
            (
                re.is_match(text),
                format!(
                    "Expected values {to} match using regular expression\nExpression: /{pattern}/\nActual: {}",
                    actual.repr()
                ),
            )
        }
        Matcher::Defined => (
            !actual.is_undefined(),
            format!("Expected value {to} be defined"),
        ),
        Matcher::Undefined => (
            actual.is_undefined(),
            format!("Expected value {to} be undefined"),
        ),
        Matcher::Null => (actual.is_null(), format!("Expected value {to} be null")),
        Matcher::Truthy => (
            actual.is_truthy(),
            format!("Expected value {to} be truthy"),
        ),
        Matcher::Falsy => (
            !actual.is_truthy(),
            format!("Expected value {to} be falsy"),
        ),
        Matcher::Contain(needle) => (
            actual
                .as_list()
                .is_some_and(|items| items.iter().any(|item| item.strict_eq(needle))),
            format!("Expected {} {to} contain {}", actual.repr(), needle.repr()),
        ),
        Matcher::LessThan(bound) => (
            actual.compare(bound) == Some(Ordering::Less),
            format!("Expected {} {to} be less than {}", actual.repr(), bound.repr()),
        ),
        Matcher::GreaterThan(bound) => (
            actual.compare(bound) == Some(Ordering::Greater),
            format!(
                "Expected {} {to} be greater than {}",
                actual.repr(),
                bound.repr()
            ),
        ),
        Matcher::CloseTo {
            expected,
            precision,
        } => (
            is_close(actual.to_number(), *expected, *precision),
            format!(
                "Expected {} with precision {precision} {to} be close to {expected}",
                actual.repr()
            ),
        ),
        Matcher::Throw => {
            let Some(callable) = actual.as_callable() else {
                return Err(AssertionError::NotCallable {
                    matcher: matcher.name(),
                    actual: actual.repr(),
                });
            };
            let threw = !matches!(
                catch_unwind(AssertUnwindSafe(|| callable.invoke())),
                Ok(Ok(_))
            );
            let name = if callable.name().is_empty() {
                "function"
            } else {
                callable.name()
            };
            (threw, format!("Expected {name} {to} throw an exception"))
        }
    };
    Ok(outcome)
}

fn equality_message(negate: bool, op: &str, expected: &Value, actual: &Value) -> String {
    let mut message = format!(
        "Expected values {} match using {op}\nExpected: {}\nActual: {}",
        to(negate),
        expected.repr(),
        actual.repr()
    );
    if let (Some(e), Some(a)) = (expected.as_str(), actual.as_str()) {
        if !negate && (e.contains('\n') || a.contains('\n')) {
            message.push_str("\nDiff:");
            message.push_str(&line_diff(e, a));
        }
    }
    message
}

/// Line diff of two multi-line strings: `-` expected, `+` actual.
fn line_diff(expected: &str, actual: &str) -> String {
    let changeset = Changeset::new(expected, actual, "\n");
    let mut out = String::new();
    for diff in &changeset.diffs {
        let (prefix, text) = match diff {
            Difference::Same(x) => (' ', x),
            Difference::Rem(x) => ('-', x),
            Difference::Add(x) => ('+', x),
        };
        for line in text.lines() {
            out.push('\n');
            out.push(prefix);
            out.push_str(line);
        }
    }
    out
}

/// Rounds half toward positive infinity, like the scripting host's `Math.round`.
fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

fn is_close(actual: f64, expected: f64, precision: i32) -> bool {
    let shift = 10f64.powi(precision);
    round_half_up(actual * shift) / shift == round_half_up(expected * shift) / shift
}

// ============================================================================
// FLUENT BUILDER
// ============================================================================

/// Fluent assertion on one actual value, obtained from
/// [`CaseScope::expect`](crate::runner::CaseScope::expect).
///
/// Every terminal method records an [`Expectation`] on the current case and
/// returns the assertion result for `?` propagation.
#[must_use = "an expectation does nothing until a matcher is applied"]
pub struct Expect<'s> {
    case: &'s mut Case,
    actual: Value,
    negate: bool,
    label: Option<String>,
}

impl<'s> Expect<'s> {
    pub(crate) fn new(case: &'s mut Case, actual: Value) -> Self {
        Self {
            case,
            actual,
            negate: false,
            label: None,
        }
    }

    /// Inverts the matcher that follows.
    #[allow(clippy::should_implement_trait)]
    pub fn not(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    /// Overrides the label recorded for this expectation.
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn actual(&self) -> &Value {
        &self.actual
    }

    /// Applies any matcher. All the named methods below delegate here.
    pub fn check(self, matcher: Matcher<'_>) -> Result<(), AssertionError> {
        let label = self
            .label
            .unwrap_or_else(|| matcher.describe(self.negate));
        let result = evaluate(&self.actual, &matcher, self.negate);
        match &result {
            Ok(()) => self.case.expectations.push(Expectation::pass(label)),
            Err(e) => {
                tracing::debug!(matcher = matcher.name(), "{e}");
                self.case
                    .expectations
                    .push(Expectation::fail(label, e.to_string()));
            }
        }
        result
    }

    pub fn to<'p, F, R>(self, predicate: F) -> Result<(), AssertionError>
    where
        F: Fn(&Value) -> R + 'p,
        R: Into<Value>,
    {
        let predicate: Predicate<'p> = Box::new(move |v: &Value| predicate(v).into());
        self.check(Matcher::Satisfy(predicate))
    }

    pub fn to_be(self, expected: impl Into<Value>) -> Result<(), AssertionError> {
        self.check(Matcher::Be(expected.into()))
    }

    pub fn to_equal(self, expected: impl Into<Value>) -> Result<(), AssertionError> {
        self.check(Matcher::Equal(expected.into()))
    }

    pub fn to_match(self, pattern: impl Into<String>) -> Result<(), AssertionError> {
        self.check(Matcher::Match(pattern.into()))
    }

    pub fn to_be_defined(self) -> Result<(), AssertionError> {
        self.check(Matcher::Defined)
    }

    pub fn to_be_undefined(self) -> Result<(), AssertionError> {
        self.check(Matcher::Undefined)
    }

    pub fn to_be_null(self) -> Result<(), AssertionError> {
        self.check(Matcher::Null)
    }

    pub fn to_be_truthy(self) -> Result<(), AssertionError> {
        self.check(Matcher::Truthy)
    }

    pub fn to_be_falsy(self) -> Result<(), AssertionError> {
        self.check(Matcher::Falsy)
    }

    pub fn to_contain(self, needle: impl Into<Value>) -> Result<(), AssertionError> {
        self.check(Matcher::Contain(needle.into()))
    }

    pub fn to_be_less_than(self, bound: impl Into<Value>) -> Result<(), AssertionError> {
        self.check(Matcher::LessThan(bound.into()))
    }

    pub fn to_be_greater_than(self, bound: impl Into<Value>) -> Result<(), AssertionError> {
        self.check(Matcher::GreaterThan(bound.into()))
    }

    pub fn to_be_close_to(self, expected: f64, precision: i32) -> Result<(), AssertionError> {
        self.check(Matcher::CloseTo {
            expected,
            precision,
        })
    }

    pub fn to_throw(self) -> Result<(), AssertionError> {
        self.check(Matcher::Throw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CaseError;

    fn passes(actual: impl Into<Value>, matcher: Matcher<'_>) -> bool {
        evaluate(&actual.into(), &matcher, false).is_ok()
    }

    fn negated_passes(actual: impl Into<Value>, matcher: Matcher<'_>) -> bool {
        evaluate(&actual.into(), &matcher, true).is_ok()
    }

    #[test]
    fn strict_and_loose_equality() {
        assert!(passes(1, Matcher::Be(1.into())));
        assert!(!passes(1, Matcher::Be("1".into())));
        assert!(passes(1, Matcher::Equal("1".into())));
        assert!(negated_passes(1, Matcher::Be("1".into())));
    }

    #[test]
    fn negation_flips_ordering() {
        assert!(negated_passes(5, Matcher::GreaterThan(10.into())));
        assert!(!negated_passes(5, Matcher::GreaterThan(1.into())));
        assert!(passes(5, Matcher::LessThan(10.into())));
        assert!(!passes(Value::Undefined, Matcher::LessThan(10.into())));
        assert!(!passes(Value::Undefined, Matcher::GreaterThan(10.into())));
    }

    #[test]
    fn close_to_rounds_at_precision() {
        assert!(passes(1.005, Matcher::CloseTo { expected: 1.0, precision: 2 }));
        assert!(passes(1.0051, Matcher::CloseTo { expected: 1.0049, precision: 3 }));
        assert!(!passes(1.0051, Matcher::CloseTo { expected: 1.0049, precision: 4 }));
        assert!(!passes(1.02, Matcher::CloseTo { expected: 1.0, precision: 2 }));
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(2.5), 3.0);
    }

    #[test]
    fn defined_null_and_truthiness() {
        assert!(passes(0, Matcher::Defined));
        assert!(!passes(Value::Undefined, Matcher::Defined));
        assert!(passes(Value::Undefined, Matcher::Undefined));
        assert!(passes(Value::Null, Matcher::Null));
        assert!(!passes(Value::Undefined, Matcher::Null));
        assert!(passes("x", Matcher::Truthy));
        assert!(passes("", Matcher::Falsy));
    }

    #[test]
    fn contain_requires_a_list() {
        assert!(passes(Value::list([1, 2, 3]), Matcher::Contain(2.into())));
        assert!(!passes(Value::list([1, 2, 3]), Matcher::Contain("2".into())));
        assert!(!passes("123", Matcher::Contain("2".into())));
    }

    #[test]
    fn regex_matching_and_misuse() {
        assert!(passes("hello world", Matcher::Match("^hello".into())));
        assert!(!passes("goodbye", Matcher::Match("^hello".into())));

        let err = evaluate(&Value::from(5), &Matcher::Match("5".into()), true).unwrap_err();
        assert!(matches!(err, AssertionError::NotAString { .. }));

        let err = evaluate(&Value::from("x"), &Matcher::Match("(".into()), false).unwrap_err();
        assert!(matches!(err, AssertionError::InvalidPattern { .. }));
    }

    #[test]
    fn throw_detects_errors_and_panics() {
        let raising = Value::function("raising", || Err(CaseError::failed("nope")));
        let panicking = Value::function("panicking", || panic!("nope"));
        let quiet = Value::function("quiet", || Ok(Value::Undefined));

        assert!(passes(raising, Matcher::Throw));
        assert!(passes(panicking, Matcher::Throw));
        assert!(!passes(quiet.clone(), Matcher::Throw));
        assert!(negated_passes(quiet, Matcher::Throw));

        let err = evaluate(&Value::from(1), &Matcher::Throw, false).unwrap_err();
        assert!(matches!(err, AssertionError::NotCallable { .. }));
    }

    #[test]
    fn predicate_uses_truthiness() {
        let even = Matcher::Satisfy(Box::new(|v: &Value| Value::from(v.to_number() % 2.0 == 0.0)));
        assert!(passes(4, even));
        let count = Matcher::Satisfy(Box::new(|v: &Value| Value::from(v.to_number())));
        assert!(!passes(0, count));
    }

    #[test]
    fn diagnostics_name_values() {
        let err = evaluate(&Value::from(1), &Matcher::Be("1".into()), false).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected values to match using ===\nExpected: \"1\"\nActual: 1"
        );
        assert_eq!(err.matcher(), "toBe");

        let err = evaluate(&Value::from(5), &Matcher::GreaterThan(1.into()), true).unwrap_err();
        assert_eq!(err.to_string(), "Expected 5 not to be greater than 1");
    }

    #[test]
    fn multiline_strings_get_a_diff() {
        let err = evaluate(
            &Value::from("a\nb\nc"),
            &Matcher::Be("a\nx\nc".into()),
            false,
        )
        .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("Diff:"));
        assert!(text.contains("\n-x"));
        assert!(text.contains("\n+b"));
    }

    #[test]
    fn builder_records_expectations() {
        let mut case = Case::new("builder");
        assert!(Expect::new(&mut case, 3.into()).to_be(3).is_ok());
        assert!(Expect::new(&mut case, 3.into()).not().to_be(3).is_err());
        assert!(Expect::new(&mut case, 3.into())
            .labeled("three is odd")
            .to(|v| v.to_number() % 2.0 == 1.0)
            .is_ok());

        let labels: Vec<_> = case.expectations.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["to be 3", "not to be 3", "three is odd"]);
        assert!(case.expectations[0].passed());
        assert!(!case.expectations[1].passed());
        assert_eq!(
            case.expectations[1].reason.as_deref(),
            Some("Expected values not to match using ===\nExpected: 3\nActual: 3")
        );
    }
}
