//! Run configuration.
//!
//! Settings come from an optional YAML file and are then overridden by
//! command-line flags. Every key is optional:
//!
//! ```yaml
//! root: test        # child of the test tree to run
//! reporter: xml     # console | xml | json
//! color: never      # auto | always | never
//! ```

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use termcolor::ColorChoice;

use crate::driver::DEFAULT_ROOT;
use crate::errors::ConfigError;
use crate::report::ReporterKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub root: String,
    pub reporter: ReporterKind,
    pub color: ColorMode,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.to_string(),
            reporter: ReporterKind::default(),
            color: ColorMode::default(),
        }
    }
}

impl RunConfig {
    /// Reads a YAML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as null, not as an empty mapping.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }
}

/// When to emit ANSI colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color only when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn choice(self) -> ColorChoice {
        match self {
            Self::Auto if atty::is(atty::Stream::Stdout) => ColorChoice::Auto,
            Self::Auto | Self::Never => ColorChoice::Never,
            Self::Always => ColorChoice::Always,
        }
    }
}
