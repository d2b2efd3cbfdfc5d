//! Demonstration test tree.
//!
//! `specunit-demo` runs the all-passing `test` root; `specunit-demo failing`
//! runs cases that fail in each of the ways a case can fail.

use std::process::ExitCode;

use specunit::{cli, Runner, TestTree, Value};

fn main() -> ExitCode {
    cli::main_with(&demo_tree())
}

fn demo_tree() -> TestTree {
    TestTree::group(
        "demo",
        [
            TestTree::group(
                "test",
                [
                    TestTree::entry("matchers", matchers),
                    TestTree::group("values", [TestTree::entry("coercion", coercion)]),
                ],
            ),
            TestTree::group("failing", [TestTree::entry("failures", failures)]),
        ],
    )
}

fn matchers(r: &mut Runner) {
    r.describe("matchers", |r| {
        r.it("compares strictly and loosely", |cx| {
            cx.expect(1).to_be(1)?;
            cx.expect(1).not().to_be("1")?;
            cx.expect(1).to_equal("1")?;
            Ok(())
        });
        r.it("matches patterns", |cx| {
            cx.expect("specunit").to_match("^spec")?;
            cx.expect("specunit").not().to_match(r"\d")?;
            Ok(())
        });
        r.it("orders numbers", |cx| {
            cx.expect(5).to_be_greater_than(1)?;
            cx.expect(5).not().to_be_greater_than(10)?;
            cx.expect(5).to_be_less_than(10)?;
            cx.expect(1.005).to_be_close_to(1.0, 2)?;
            Ok(())
        });
        r.it("checks membership", |cx| {
            cx.expect(Value::list([1, 2, 3])).to_contain(2)?;
            cx.expect(Value::list([1, 2, 3])).not().to_contain(4)?;
            Ok(())
        });
        r.it("catches throwing functions", |cx| {
            cx.expect(Value::function("explode", || Err("boom".into())))
                .to_throw()?;
            cx.expect(Value::function("quiet", || Ok(Value::Null)))
                .not()
                .to_throw()?;
            Ok(())
        });
        r.it("accepts custom predicates", |cx| {
            cx.expect(42)
                .labeled("42 is even")
                .to(|v: &Value| v.to_number() % 2.0 == 0.0)?;
            Ok(())
        });
    });
}

fn coercion(r: &mut Runner) {
    r.describe("coercion", |r| {
        r.it("knows definedness", |cx| {
            cx.expect(Value::Undefined).to_be_undefined()?;
            cx.expect(Value::Null).to_be_defined()?;
            cx.expect(None::<i32>).to_be_null()?;
            Ok(())
        });
        r.it("knows truthiness", |cx| {
            cx.expect("").to_be_falsy()?;
            cx.expect(0).to_be_falsy()?;
            cx.expect("0").to_be_truthy()?;
            cx.expect(Value::list(Vec::<i32>::new())).to_be_truthy()?;
            Ok(())
        });
    });
}

fn failures(r: &mut Runner) {
    r.describe("deliberate failures", |r| {
        r.it("fails an assertion", |cx| {
            cx.expect(2 + 2).to_be(4)?;
            cx.expect(2 + 2).to_be(5)?;
            Ok(())
        });
        r.it("returns an error", |_| {
            let n: i32 = "four".parse()?;
            Err(format!("parsed {n} unexpectedly").into())
        });
        r.it("panics", |_| panic!("something went badly wrong"));
        r.it("still runs after its siblings fail", |cx| {
            cx.expect(true).to_be_truthy()?;
            Ok(())
        });
        r.describe("with <special> & \"quoted\" names", |r| {
            r.it("compares multi-line text", |cx| {
                cx.expect("alpha\nbeta\ngamma").to_be("alpha\nbeta\ndelta")?;
                Ok(())
            });
        });
    });
}
