//! Human-oriented console output.

use std::io::{self, Write};

use termcolor::{Color, ColorSpec, WriteColor};

use super::Reporter;
use crate::model::{Case, Expectation, RunReport, Suite, SuiteChild};

const PASS: &str = "✔";
const FAIL: &str = "❌";

/// Prints the suite tree with one glyph per case and expectation, followed
/// by a one-line summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&self, run: &RunReport, out: &mut dyn WriteColor) -> io::Result<()> {
        for suite in &run.suites {
            write_suite(out, suite, 0)?;
        }

        writeln!(out)?;
        if run.failed_cases > 0 {
            colored(out, Color::Red, |out| {
                write!(
                    out,
                    "{FAIL} {} of {} tests failed",
                    run.failed_cases, run.assertions
                )
            })?;
        } else {
            colored(out, Color::Green, |out| {
                write!(out, "{PASS} {} completed", run.assertions)
            })?;
        }
        writeln!(out)
    }
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn write_suite(out: &mut dyn WriteColor, suite: &Suite, depth: usize) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}{}", indent(depth), suite.name)?;
    for child in &suite.children {
        match child {
            SuiteChild::Suite(inner) => write_suite(out, inner, depth + 1)?,
            SuiteChild::Case(case) => write_case(out, case, depth + 1)?,
        }
    }
    Ok(())
}

fn write_case(out: &mut dyn WriteColor, case: &Case, depth: usize) -> io::Result<()> {
    write!(out, "{}", indent(depth))?;
    glyph(out, !case.failed())?;
    writeln!(out, " {}", case.name)?;

    for expectation in &case.expectations {
        write_expectation(out, expectation, depth + 1)?;
    }
    if let Some(reason) = case.unexplained_failure() {
        write_reason(out, reason, depth + 1)?;
    }
    Ok(())
}

fn write_expectation(out: &mut dyn WriteColor, e: &Expectation, depth: usize) -> io::Result<()> {
    write!(out, "{}", indent(depth))?;
    glyph(out, e.passed())?;
    write!(out, " ")?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Black)).set_intense(true))?;
    write!(out, "{}", e.label)?;
    out.reset()?;
    writeln!(out)?;
    if let Some(reason) = &e.reason {
        write_reason(out, reason, depth + 1)?;
    }
    Ok(())
}

fn write_reason(out: &mut dyn WriteColor, reason: &str, depth: usize) -> io::Result<()> {
    let pad = indent(depth);
    for line in reason.lines() {
        colored(out, Color::Red, |out| write!(out, "{pad}{line}"))?;
        writeln!(out)?;
    }
    Ok(())
}

fn glyph(out: &mut dyn WriteColor, passed: bool) -> io::Result<()> {
    if passed {
        colored(out, Color::Green, |out| write!(out, "{PASS}"))
    } else {
        colored(out, Color::Red, |out| write!(out, "{FAIL}"))
    }
}

fn colored<F>(out: &mut dyn WriteColor, color: Color, body: F) -> io::Result<()>
where
    F: FnOnce(&mut dyn WriteColor) -> io::Result<()>,
{
    out.set_color(ColorSpec::new().set_fg(Some(color)))?;
    body(out)?;
    out.reset()
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}
