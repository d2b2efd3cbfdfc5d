//! JUnit-style XML output.
//!
//! One `<testsuite>` element is written per top-level suite. Cases of nested
//! suites are flattened into their top-level element and keep their origin in
//! a dotted `classname` attribute.

use std::borrow::Cow;
use std::io::{self, Write};

use termcolor::WriteColor;

use super::Reporter;
use crate::model::{Case, RunReport, Suite};

#[derive(Debug, Clone, Copy, Default)]
pub struct XmlReporter;

impl Reporter for XmlReporter {
    fn report(&self, run: &RunReport, out: &mut dyn WriteColor) -> io::Result<()> {
        writeln!(out, r#"<?xml version="1.0"?>"#)?;
        let open = format!(
            r#"<testsuites tests="{}" failures="{}">"#,
            run.test_count(),
            run.failure_count()
        );
        if run.suites.is_empty() {
            return writeln!(out, "{open}</testsuites>");
        }
        writeln!(out, "{open}")?;
        for suite in &run.suites {
            write_suite(out, suite)?;
        }
        writeln!(out, "</testsuites>")
    }
}

fn write_suite(out: &mut dyn WriteColor, suite: &Suite) -> io::Result<()> {
    let open = format!(
        r#"  <testsuite name="{}" tests="{}" failures="{}" assertions="{}">"#,
        escape(&suite.name),
        suite.test_count,
        suite.failure_count,
        suite.assertion_count()
    );

    let mut cases: Vec<(String, &Case)> = Vec::new();
    suite.walk_cases(&mut |path, case| cases.push((path.join("."), case)));
    if cases.is_empty() {
        return writeln!(out, "{open}</testsuite>");
    }

    writeln!(out, "{open}")?;
    for (classname, case) in cases {
        let attrs = format!(
            r#"name="{}" classname="{}" assertions="{}""#,
            escape(&case.name),
            escape(&classname),
            case.assertions
        );
        match &case.failure {
            None => writeln!(out, "    <testcase {attrs}/>")?,
            Some(message) => {
                writeln!(out, "    <testcase {attrs}>")?;
                writeln!(out, r#"      <failure message="{}"/>"#, escape(message))?;
                writeln!(out, "    </testcase>")?;
            }
        }
    }
    writeln!(out, "  </testsuite>")
}

/// Escapes text for use inside a double-quoted attribute value. Line breaks
/// and tabs become character references so attribute normalization keeps them.
/// Code points XML 1.0 does not allow at all become U+FFFD.
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.chars().any(needs_escape) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            c if is_forbidden(c) => escaped.push(char::REPLACEMENT_CHARACTER),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

fn needs_escape(c: char) -> bool {
    matches!(c, '&' | '<' | '>' | '"' | '\'' | '\n' | '\r' | '\t') || is_forbidden(c)
}

/// Characters outside the XML 1.0 `Char` production.
fn is_forbidden(c: char) -> bool {
    matches!(
        c,
        '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}'
    )
}
