//! Behavior of suites, cases and expectations as seen from test code.

use specunit::{Outcome, Runner, SuiteChild, Value};

// ============================================================================
// CASE BOUNDARY
// ============================================================================

#[test]
fn partial_progress_is_kept_when_a_case_fails() {
    let mut runner = Runner::new();
    runner.describe("progress", |r| {
        r.it("two passes then an error", |cx| {
            cx.expect(1).to_be(1)?;
            cx.expect("a").to_be("a")?;
            Err("then something broke".into())
        });
    });
    let report = runner.finish();

    let case = report.suites[0].cases().next().unwrap();
    assert!(case.failed());
    assert_eq!(case.failure.as_deref(), Some("then something broke"));
    assert_eq!(case.expectations.len(), 2);
    assert!(case.expectations.iter().all(|e| e.outcome == Outcome::Pass));
}

#[test]
fn failing_assertion_stops_the_case_but_not_its_siblings() {
    let mut runner = Runner::new();
    runner.describe("siblings", |r| {
        r.it("first fails", |cx| {
            cx.expect(1).to_be(2)?;
            cx.expect(3).to_be(3)?;
            Ok(())
        });
        r.it("second panics", |_| panic!("kaboom"));
        r.it("third passes", |cx| {
            cx.expect(true).to_be_truthy()?;
            Ok(())
        });
    });
    let report = runner.finish();

    let cases: Vec<_> = report.suites[0].cases().collect();
    assert_eq!(cases.len(), 3);
    assert_eq!(cases[0].expectations.len(), 1);
    assert_eq!(cases[0].expectations[0].outcome, Outcome::Fail);
    assert_eq!(
        cases[0].failure.as_deref(),
        Some("Expected values to match using ===\nExpected: 2\nActual: 1")
    );
    assert_eq!(cases[1].failure.as_deref(), Some("panicked: kaboom"));
    assert!(!cases[2].failed());
    assert_eq!(report.failed_cases, 2);
    assert_eq!(report.assertions, 2);
}

#[test]
fn expect_counts_even_without_a_matcher() {
    let mut runner = Runner::new();
    runner.describe("counting", |r| {
        r.it("dangling", |cx| {
            let _ = cx.expect(1);
            cx.expect(2).to_be(2)?;
            Ok(())
        });
    });
    let report = runner.finish();
    let case = report.suites[0].cases().next().unwrap();
    assert_eq!(case.assertions, 2);
    assert_eq!(case.expectations.len(), 1);
    assert_eq!(report.assertions, 2);
}

// ============================================================================
// NESTING AND ORDER
// ============================================================================

#[test]
fn two_failing_children_roll_up_to_the_root() {
    let mut runner = Runner::new();
    runner.describe("root", |r| {
        r.describe("left", |r| r.it("fails", |cx| Ok(cx.expect(1).to_be(0)?)));
        r.describe("right", |r| r.it("fails", |cx| Ok(cx.expect(1).to_be(0)?)));
    });
    let report = runner.finish();

    let root = &report.suites[0];
    assert_eq!(root.test_count, 2);
    assert_eq!(root.failure_count, 2);
    for child in root.suites() {
        assert_eq!((child.test_count, child.failure_count), (1, 1));
    }
}

#[test]
fn declaration_order_is_preserved() {
    let mut runner = Runner::new();
    runner.describe("first", |r| {
        r.it("a", |_| Ok(()));
        r.describe("nested", |r| r.it("b", |_| Ok(())));
        r.it("c", |_| Ok(()));
    });
    runner.describe("second", |_| {});
    let report = runner.finish();

    let names: Vec<_> = report.suites.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["first", "second"]);
    let kinds: Vec<_> = report.suites[0]
        .children
        .iter()
        .map(|c| match c {
            SuiteChild::Case(case) => case.name.clone(),
            SuiteChild::Suite(suite) => format!("[{}]", suite.name),
        })
        .collect();
    assert_eq!(kinds, ["a", "[nested]", "c"]);
}

// ============================================================================
// MATCHERS THROUGH THE BUILDER
// ============================================================================

#[test]
fn negation_inverts_the_outcome() {
    let mut runner = Runner::new();
    runner.describe("negation", |r| {
        r.it("passes", |cx| Ok(cx.expect(5).not().to_be_greater_than(10)?));
        r.it("fails", |cx| Ok(cx.expect(5).not().to_be_greater_than(1)?));
    });
    let report = runner.finish();

    let cases: Vec<_> = report.suites[0].cases().collect();
    assert!(!cases[0].failed());
    assert_eq!(cases[0].expectations[0].label, "not to be greater than 10");
    assert!(cases[1].failed());
    assert_eq!(
        cases[1].failure.as_deref(),
        Some("Expected 5 not to be greater than 1")
    );
}

#[test]
fn strict_and_loose_equality_differ_on_strings() {
    let mut runner = Runner::new();
    runner.describe("equality", |r| {
        r.it("strict", |cx| Ok(cx.expect(1).to_be("1")?));
        r.it("loose", |cx| Ok(cx.expect(1).to_equal("1")?));
    });
    let report = runner.finish();
    let cases: Vec<_> = report.suites[0].cases().collect();
    assert!(cases[0].failed());
    assert!(!cases[1].failed());
}

#[test]
fn to_throw_distinguishes_raising_functions() {
    let mut runner = Runner::new();
    runner.describe("throwing", |r| {
        r.it("raises", |cx| {
            Ok(cx
                .expect(Value::function("raise", || Err("bad".into())))
                .to_throw()?)
        });
        r.it("panics", |cx| {
            Ok(cx
                .expect(Value::function("panic", || panic!("inner")))
                .to_throw()?)
        });
        r.it("returns", |cx| {
            Ok(cx
                .expect(Value::function("fine", || Ok(Value::from(1))))
                .to_throw()?)
        });
    });
    let report = runner.finish();
    let failed: Vec<_> = report.suites[0].cases().map(|c| c.failed()).collect();
    assert_eq!(failed, [false, false, true]);
}

#[test]
fn misuse_fails_regardless_of_negation() {
    let mut runner = Runner::new();
    runner.describe("misuse", |r| {
        r.it("regex on a number", |cx| Ok(cx.expect(5).not().to_match("x")?));
        r.it("throw on a string", |cx| Ok(cx.expect("x").not().to_throw()?));
    });
    let report = runner.finish();
    assert_eq!(report.failed_cases, 2);
}

#[test]
fn predicates_may_borrow_locals() {
    let limit = 10.0;
    let mut runner = Runner::new();
    runner.describe("predicates", |r| {
        r.it("under the limit", |cx| {
            cx.expect(7).to(|v: &Value| v.to_number() < limit)?;
            Ok(())
        });
    });
    assert!(runner.finish().is_success());
}

// ============================================================================
// CASE SCOPE AND COUNTERS
// ============================================================================

#[test]
fn fail_ends_the_case_with_its_message() {
    let mut runner = Runner::new();
    runner.describe("explicit", |r| {
        r.it("gives up", |cx| {
            assert_eq!(cx.name(), "gives up");
            cx.expect(1).to_be(1)?;
            cx.fail(format!("{} could not reach the server", cx.name()))
        });
    });
    let report = runner.finish();

    let case = report.suites[0].cases().next().unwrap();
    assert_eq!(case.failure.as_deref(), Some("gives up could not reach the server"));
    assert_eq!(case.unexplained_failure(), case.failure.as_deref());
}

#[test]
fn error_after_an_ignored_mismatch_is_kept() {
    let mut runner = Runner::new();
    runner.describe("db", |r| {
        r.it("connects", |cx| {
            let _ = cx.expect(1).to_be(2);
            Err("database connection refused".into())
        });
    });
    let report = runner.finish();

    let case = report.suites[0].cases().next().unwrap();
    assert_eq!(case.expectations[0].outcome, Outcome::Fail);
    assert_eq!(case.unexplained_failure(), Some("database connection refused"));
}

#[test]
fn counters_are_readable_mid_run() {
    let mut runner = Runner::new();
    runner.describe("counting", |r| {
        assert_eq!((r.assertion_count(), r.failed_case_count()), (0, 0));
        r.it("two checks", |cx| {
            let first = cx.expect(3);
            assert_eq!(first.actual(), &Value::from(3));
            first.to_be(3)?;
            cx.expect("x").to_be("x")?;
            Ok(())
        });
        assert_eq!((r.assertion_count(), r.failed_case_count()), (2, 0));
        r.it("fails", |cx| Ok(cx.expect(1).to_be(0)?));
        assert_eq!((r.assertion_count(), r.failed_case_count()), (3, 1));
    });
    assert_eq!(runner.assertion_count(), 3);
    assert_eq!(runner.failed_case_count(), 1);
}
