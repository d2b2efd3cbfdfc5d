//! specunit Error Handling
//!
//! Every failure that can surface inside a test run is one of the enums below.
//! Assertion failures and user errors never escape a case: the runner converts
//! them into a recorded failure at the case boundary. Configuration errors are
//! the only errors that reach the command line.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

// ============================================================================
// ASSERTION ERRORS - raised by the matcher engine
// ============================================================================

/// Raised by the matcher engine when an expectation does not hold.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum AssertionError {
    /// The matcher's success condition (after negation) was not met.
    #[error("{message}")]
    #[diagnostic(code(specunit::assert::mismatch))]
    Mismatch {
        matcher: &'static str,
        message: String,
    },

    /// `toMatch` was given a pattern the regex engine rejects.
    #[error("Invalid regular expression /{pattern}/: {reason}")]
    #[diagnostic(
        code(specunit::assert::invalid_pattern),
        help("patterns use the syntax of the `regex` crate")
    )]
    InvalidPattern { pattern: String, reason: String },

    /// `toMatch` was applied to something that is not a string.
    #[error("Expected a string to match against /{pattern}/, got {actual}")]
    #[diagnostic(code(specunit::assert::not_a_string))]
    NotAString { pattern: String, actual: String },

    /// `toThrow` was applied to something that cannot be invoked.
    #[error("Expected a function for {matcher}, got {actual}")]
    #[diagnostic(code(specunit::assert::not_callable))]
    NotCallable {
        matcher: &'static str,
        actual: String,
    },
}

impl AssertionError {
    pub fn mismatch(matcher: &'static str, message: impl Into<String>) -> Self {
        Self::Mismatch {
            matcher,
            message: message.into(),
        }
    }

    /// Name of the matcher that produced this error.
    pub fn matcher(&self) -> &'static str {
        match self {
            Self::Mismatch { matcher, .. } | Self::NotCallable { matcher, .. } => matcher,
            Self::InvalidPattern { .. } | Self::NotAString { .. } => "toMatch",
        }
    }
}

// ============================================================================
// CASE ERRORS - anything that aborts a case body
// ============================================================================

/// Everything that can abort a case body. Caught at the case boundary.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum CaseError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Assertion(#[from] AssertionError),

    /// A user error returned from the body.
    #[error("{0}")]
    #[diagnostic(code(specunit::case::failed))]
    Failed(String),

    /// The body panicked.
    #[error("panicked: {0}")]
    #[diagnostic(code(specunit::case::panicked))]
    Panicked(String),
}

impl CaseError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Converts a `catch_unwind` payload into a case error.
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::Panicked(message)
    }

    pub fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion(_))
    }
}

impl From<String> for CaseError {
    fn from(message: String) -> Self {
        Self::Failed(message)
    }
}

impl From<&str> for CaseError {
    fn from(message: &str) -> Self {
        Self::Failed(message.to_string())
    }
}

impl From<std::io::Error> for CaseError {
    fn from(e: std::io::Error) -> Self {
        Self::Failed(e.to_string())
    }
}

impl From<std::num::ParseIntError> for CaseError {
    fn from(e: std::num::ParseIntError) -> Self {
        Self::Failed(e.to_string())
    }
}

impl From<std::num::ParseFloatError> for CaseError {
    fn from(e: std::num::ParseFloatError) -> Self {
        Self::Failed(e.to_string())
    }
}

/// Result type of case bodies and callables.
pub type CaseResult<T = ()> = Result<T, CaseError>;

// ============================================================================
// CONFIGURATION ERRORS
// ============================================================================

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{}'", path.display())]
    #[diagnostic(code(specunit::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}'", path.display())]
    #[diagnostic(
        code(specunit::config::parse),
        help("expected YAML with optional keys `root`, `reporter` and `color`")
    )]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
