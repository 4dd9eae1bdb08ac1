//! Tracing/logging setup shared by binaries.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Logging initialization (filters, formatters).
pub mod logging;

pub use logging::init;

/// Deployment environment; selects the log format and default verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Human-readable output, debug level.
    #[default]
    Local,
    /// JSON output, debug level.
    Dev,
    /// JSON output, info level.
    Prod,
}

impl Environment {
    pub const ALL: [Environment; 3] = [Environment::Local, Environment::Dev, Environment::Prod];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }

    /// Filter used when `RUST_LOG` is not set.
    pub fn default_filter(&self) -> &'static str {
        match self {
            Environment::Local | Environment::Dev => "debug",
            Environment::Prod => "info",
        }
    }

    pub fn json_output(&self) -> bool {
        !matches!(self, Environment::Local)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid environment {0:?} (expected one of: local, dev, prod)")]
pub struct ParseEnvironmentError(String);

impl FromStr for Environment {
    type Err = ParseEnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Environment::ALL
            .into_iter()
            .find(|env| env.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnvironmentError(s.to_string()))
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
