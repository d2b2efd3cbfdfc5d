//! Command-line arguments for binaries built on the harness.
//!
//! Uses the `clap` derive API. Flags override whatever the config file sets.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{ColorMode, RunConfig};
use crate::errors::ConfigError;
use crate::report::ReporterKind;

#[derive(Debug, Default, Parser)]
#[command(
    name = "specunit",
    version,
    about = "Runs a tree of BDD-style test suites and reports the results."
)]
pub struct RunArgs {
    /// Child of the test tree to run. Unknown names fall back to `test`.
    pub root: Option<String>,

    /// Output format.
    #[arg(long, value_enum)]
    pub reporter: Option<ReporterKind>,

    /// When to use colors in console output.
    #[arg(long, value_enum)]
    pub color: Option<ColorMode>,

    /// YAML file with `root`, `reporter` and `color` settings.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl RunArgs {
    /// Loads the config file, if any, and applies the flags on top of it.
    pub fn resolve(&self) -> Result<RunConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)?,
            None => RunConfig::default(),
        };
        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(reporter) = self.reporter {
            config.reporter = reporter;
        }
        if let Some(color) = self.color {
            config.color = color;
        }
        Ok(config)
    }
}
