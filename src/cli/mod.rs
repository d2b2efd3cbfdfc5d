//! Command-line entry point.
//!
//! A test binary builds its [`TestTree`] and hands it to [`main_with`], which
//! parses the arguments, runs the tree, and maps the outcome to an exit code.

use std::process::ExitCode;

use clap::Parser;
use termcolor::StandardStream;
use tracing_subscriber::EnvFilter;

use crate::config::RunConfig;
use crate::driver::{self, TestTree};
use crate::model::RunReport;

pub mod args;

pub use args::RunArgs;

/// Environment variable holding the log filter, e.g. `SPECUNIT_LOG=debug`.
pub const LOG_ENV: &str = "SPECUNIT_LOG";

/// Exit code when every case passed.
pub const EXIT_OK: u8 = 0;
/// Exit code when at least one case failed.
pub const EXIT_FAILED: u8 = 1;
/// Exit code when the run could not be configured or reported.
pub const EXIT_USAGE: u8 = 2;

/// Parses the process arguments and runs `tree`.
pub fn main_with(tree: &TestTree) -> ExitCode {
    execute(tree, &RunArgs::parse())
}

/// Runs `tree` with already parsed arguments.
pub fn execute(tree: &TestTree, args: &RunArgs) -> ExitCode {
    init_logging();

    let config = match args.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let report = driver::run(tree, Some(&config.root));
    if let Err(e) = write_report(&report, &config) {
        tracing::error!(error = %e, "failed to write report");
        return ExitCode::from(EXIT_USAGE);
    }
    ExitCode::from(exit_code(&report))
}

pub fn exit_code(report: &RunReport) -> u8 {
    if report.is_success() {
        EXIT_OK
    } else {
        EXIT_FAILED
    }
}

/// Installs the stderr log subscriber. Safe to call more than once.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn write_report(report: &RunReport, config: &RunConfig) -> std::io::Result<()> {
    let mut stdout = StandardStream::stdout(config.color.choice());
    config.reporter.reporter().report(report, &mut stdout)
}
