//! Renderings of a finished run.
//!
//! Every reporter reads the same immutable [`RunReport`] and writes to a
//! [`WriteColor`] sink, so output goes equally well to a terminal, a pipe, or
//! an in-memory `termcolor::Buffer` in tests.

use std::io;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use termcolor::WriteColor;

use crate::model::RunReport;

pub mod console;
pub mod json;
pub mod xml;

pub use console::ConsoleReporter;
pub use json::JsonReporter;
pub use xml::XmlReporter;

/// Serializes a finished run to an output sink.
pub trait Reporter {
    fn report(&self, run: &RunReport, out: &mut dyn WriteColor) -> io::Result<()>;
}

/// Output format selectable from the command line or config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReporterKind {
    /// Colored, human-oriented tree.
    #[default]
    Console,
    /// JUnit-style XML document.
    Xml,
    /// The result tree as JSON.
    Json,
}

impl ReporterKind {
    pub fn reporter(self) -> Box<dyn Reporter> {
        match self {
            Self::Console => Box::new(ConsoleReporter),
            Self::Xml => Box::new(XmlReporter),
            Self::Json => Box::new(JsonReporter),
        }
    }
}
