use std::io::{self, Write};

use termcolor::WriteColor;

use super::Reporter;
use crate::model::RunReport;

/// Writes the whole result tree as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn report(&self, run: &RunReport, out: &mut dyn WriteColor) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, run)?;
        writeln!(out)
    }
}
